//! Property and field declarations.

use crate::{Expr, IrType, SymbolId};

/// Payload of a property: accessors and backing field are separate declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyDecl {
    pub getter: Option<SymbolId>,
    pub setter: Option<SymbolId>,
    pub backing_field: Option<SymbolId>,
    /// Symbols of the properties this one overrides.
    pub overridden_symbols: Vec<SymbolId>,
}

impl PropertyDecl {
    /// Set the getter.
    pub fn with_getter(mut self, getter: SymbolId) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Set the setter.
    pub fn with_setter(mut self, setter: SymbolId) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Set the backing field.
    pub fn with_backing_field(mut self, field: SymbolId) -> Self {
        self.backing_field = Some(field);
        self
    }

    /// Add an overridden symbol.
    pub fn with_overridden(mut self, overridden: SymbolId) -> Self {
        self.overridden_symbols.push(overridden);
        self
    }

    /// Accessors and backing field, in that order.
    pub fn parts(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.getter
            .into_iter()
            .chain(self.setter)
            .chain(self.backing_field)
    }
}

/// Payload of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: IrType,
    pub initializer: Option<Expr>,
    pub is_static: bool,
}

impl FieldDecl {
    /// Create an instance field without initializer.
    pub fn new(ty: IrType) -> Self {
        Self {
            ty,
            initializer: None,
            is_static: false,
        }
    }

    /// Set the initializer.
    pub fn with_initializer(mut self, initializer: Expr) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// Mark as static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}
