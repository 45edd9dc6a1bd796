//! Declarations.
//!
//! - [`Declaration`] - What every declaration has: symbol, name, origin, visibility, parent, span
//! - [`DeclarationKind`] - Per-kind payload
//! - [`ClassDecl`], [`FunctionDecl`], [`PropertyDecl`], [`FieldDecl`],
//!   [`TypeParameterDecl`], [`InitializerDecl`] - The payloads
//!
//! Supporting types:
//! - [`DeclarationOrigin`] - Ordinary vs synthesized by partial linkage
//! - [`DeclarationParent`] - Owning scope
//! - [`ValueParameter`] - Parameters and receivers

mod class;
mod common;
mod function;
mod property;

pub use class::{ClassDecl, ClassKind, Modality};
pub use common::{DeclarationOrigin, DeclarationParent, InitializerDecl, TypeParameterDecl, ValueParameter};
pub use function::{FunctionDecl, FunctionFlags};
pub use property::{FieldDecl, PropertyDecl};

use crate::{Span, SymbolId, SymbolKind, Visibility};

/// Per-kind payload of a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Class(ClassDecl),
    Function(FunctionDecl),
    Constructor(FunctionDecl),
    Property(PropertyDecl),
    Field(FieldDecl),
    TypeParameter(TypeParameterDecl),
    AnonymousInitializer(InitializerDecl),
}

impl DeclarationKind {
    /// The symbol kind a declaration of this kind binds to.
    pub fn symbol_kind(&self) -> SymbolKind {
        match self {
            DeclarationKind::Class(_) => SymbolKind::Class,
            DeclarationKind::Function(_) => SymbolKind::Function,
            DeclarationKind::Constructor(_) => SymbolKind::Constructor,
            DeclarationKind::Property(_) => SymbolKind::Property,
            DeclarationKind::Field(_) => SymbolKind::Field,
            DeclarationKind::TypeParameter(_) => SymbolKind::TypeParameter,
            DeclarationKind::AnonymousInitializer(_) => SymbolKind::AnonymousInitializer,
        }
    }
}

/// A node of the program's structural tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The symbol this declaration is bound to.
    pub symbol: SymbolId,
    /// Simple name. Special names are written in angle brackets (`<init>`).
    pub name: String,
    pub origin: DeclarationOrigin,
    pub visibility: Visibility,
    pub parent: DeclarationParent,
    pub span: Span,
    pub kind: DeclarationKind,
}

impl Declaration {
    /// Create an ordinary public declaration with an undefined span.
    pub fn new(
        symbol: SymbolId,
        name: impl Into<String>,
        parent: DeclarationParent,
        kind: DeclarationKind,
    ) -> Self {
        Self {
            symbol,
            name: name.into(),
            origin: DeclarationOrigin::Defined,
            visibility: Visibility::Public,
            parent,
            span: Span::UNDEFINED,
            kind,
        }
    }

    // === Builder Methods ===

    /// Set the origin.
    pub fn with_origin(mut self, origin: DeclarationOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Set the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    // === Query Methods ===

    /// Symbol kind implied by the payload.
    pub fn symbol_kind(&self) -> SymbolKind {
        self.kind.symbol_kind()
    }

    /// Get as a class.
    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclarationKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Get as a mutable class.
    pub fn as_class_mut(&mut self) -> Option<&mut ClassDecl> {
        match &mut self.kind {
            DeclarationKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Get as a function or constructor.
    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclarationKind::Function(function) | DeclarationKind::Constructor(function) => {
                Some(function)
            }
            _ => None,
        }
    }

    /// Get as a mutable function or constructor.
    pub fn as_function_mut(&mut self) -> Option<&mut FunctionDecl> {
        match &mut self.kind {
            DeclarationKind::Function(function) | DeclarationKind::Constructor(function) => {
                Some(function)
            }
            _ => None,
        }
    }

    /// Get as a property.
    pub fn as_property(&self) -> Option<&PropertyDecl> {
        match &self.kind {
            DeclarationKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Get as a mutable property.
    pub fn as_property_mut(&mut self) -> Option<&mut PropertyDecl> {
        match &mut self.kind {
            DeclarationKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Get as a field.
    pub fn as_field(&self) -> Option<&FieldDecl> {
        match &self.kind {
            DeclarationKind::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Get as a mutable field.
    pub fn as_field_mut(&mut self) -> Option<&mut FieldDecl> {
        match &mut self.kind {
            DeclarationKind::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Get as a type parameter.
    pub fn as_type_parameter(&self) -> Option<&TypeParameterDecl> {
        match &self.kind {
            DeclarationKind::TypeParameter(type_parameter) => Some(type_parameter),
            _ => None,
        }
    }

    /// Get as a mutable type parameter.
    pub fn as_type_parameter_mut(&mut self) -> Option<&mut TypeParameterDecl> {
        match &mut self.kind {
            DeclarationKind::TypeParameter(type_parameter) => Some(type_parameter),
            _ => None,
        }
    }

    /// Get as an anonymous initializer.
    pub fn as_initializer(&self) -> Option<&InitializerDecl> {
        match &self.kind {
            DeclarationKind::AnonymousInitializer(initializer) => Some(initializer),
            _ => None,
        }
    }

    /// Get as a mutable anonymous initializer.
    pub fn as_initializer_mut(&mut self) -> Option<&mut InitializerDecl> {
        match &mut self.kind {
            DeclarationKind::AnonymousInitializer(initializer) => Some(initializer),
            _ => None,
        }
    }

    /// Overridden symbols of a function or property.
    pub fn overridden_symbols(&self) -> Option<&[SymbolId]> {
        match &self.kind {
            DeclarationKind::Function(function) => Some(&function.overridden_symbols),
            DeclarationKind::Property(property) => Some(&property.overridden_symbols),
            _ => None,
        }
    }

    /// Mutable overridden symbols of a function or property.
    pub fn overridden_symbols_mut(&mut self) -> Option<&mut Vec<SymbolId>> {
        match &mut self.kind {
            DeclarationKind::Function(function) => Some(&mut function.overridden_symbols),
            DeclarationKind::Property(property) => Some(&mut property.overridden_symbols),
            _ => None,
        }
    }
}
