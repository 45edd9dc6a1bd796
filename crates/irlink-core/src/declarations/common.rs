//! Small structures shared by the declaration kinds.

use crate::{Body, Expr, FileId, FragmentId, IrType, Span, SymbolId};

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeclarationOrigin {
    /// Written in source (or deserialized from a library).
    #[default]
    Defined,
    /// Synthesized inherited member.
    FakeOverride,
    /// Stub standing in for a declaration the linker could not find.
    MissingDeclaration,
    /// Placeholder for an abstract member a concrete class no longer implements.
    UnimplementedAbstractCallableMember,
}

impl DeclarationOrigin {
    /// Origins produced by partial linkage rather than by the program.
    pub fn is_partially_linked(self) -> bool {
        matches!(
            self,
            DeclarationOrigin::MissingDeclaration
                | DeclarationOrigin::UnimplementedAbstractCallableMember
        )
    }
}

/// The owning scope of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationParent {
    /// Top-level declaration of a file.
    File(FileId),
    /// Member of a class, accessor of a property, type parameter of a function...
    Declaration(SymbolId),
    /// Declaration without source: built-ins and stubs.
    ExternalFragment(FragmentId),
}

/// A value parameter or receiver of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParameter {
    pub name: String,
    pub ty: IrType,
    /// Element type when the parameter is a vararg.
    pub vararg_element_type: Option<IrType>,
    pub default_value: Option<Expr>,
    pub span: Span,
}

impl ValueParameter {
    /// Create a parameter.
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
            vararg_element_type: None,
            default_value: None,
            span: Span::UNDEFINED,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, default_value: Expr) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// Mark as vararg of `element_type`.
    pub fn with_vararg(mut self, element_type: IrType) -> Self {
        self.vararg_element_type = Some(element_type);
        self
    }
}

/// A type parameter of a class or function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeParameterDecl {
    /// Position in the owner's type parameter list.
    pub index: u32,
    /// Upper bounds.
    pub super_types: Vec<IrType>,
}

impl TypeParameterDecl {
    /// Create a type parameter with bounds.
    pub fn new(index: u32, super_types: Vec<IrType>) -> Self {
        Self { index, super_types }
    }
}

/// An `init { }` block of a class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InitializerDecl {
    pub body: Body,
}
