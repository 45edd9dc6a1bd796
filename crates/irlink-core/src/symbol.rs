//! Opaque handles into the symbol table.

use std::fmt;

/// A reference to a declaration slot in the symbol table.
///
/// A symbol may be bound (its slot holds a declaration) or unbound (something
/// refers to it by signature but no declaration was found while linking).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Create a handle from a raw slot index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        SymbolId(raw)
    }

    /// Slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of an [`IrFile`](crate::IrFile) in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of an [`ExternalPackageFragment`](crate::ExternalPackageFragment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(u32);

impl FragmentId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        FragmentId(raw)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of declaration a symbol stands for.
///
/// The kind is fixed when the symbol is created, before it is bound, so an
/// unbound symbol still knows what it was supposed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Constructor,
    Function,
    Property,
    Field,
    TypeParameter,
    AnonymousInitializer,
}

impl SymbolKind {
    /// Classes and type parameters can head a type.
    pub fn is_classifier(self) -> bool {
        matches!(self, SymbolKind::Class | SymbolKind::TypeParameter)
    }

    /// Functions and constructors.
    pub fn is_function(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Constructor)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Class => "class",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Function => "function",
            SymbolKind::Property => "property",
            SymbolKind::Field => "field",
            SymbolKind::TypeParameter => "type parameter",
            SymbolKind::AnonymousInitializer => "anonymous initializer",
        };
        f.write_str(name)
    }
}

/// A root handed to the tree patcher: usually every file of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootElement {
    File(FileId),
    Declaration(SymbolId),
}
