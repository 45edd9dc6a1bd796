//! SymbolTable - symbol slots, declarations, files and fragments of one link.
//!
//! Every symbol is a slot. A slot always knows its [`SymbolKind`] and, for
//! publicly addressable declarations, its [`IdSignature`]; it holds a
//! [`Declaration`] only once something binds one. References between
//! declarations are plain [`SymbolId`]s, so a reference to a declaration that
//! was never deserialized is simply a slot that stays unbound.
//!
//! # Example
//!
//! ```
//! use irlink_core::{IdSignature, SymbolKind};
//! use irlink_registry::SymbolTable;
//!
//! let mut table = SymbolTable::new();
//! let sig = IdSignature::common("lib", "Foo");
//!
//! // Referencing a signature twice yields the same symbol.
//! let a = table.declare(SymbolKind::Class, sig.clone());
//! let b = table.declare(SymbolKind::Class, sig);
//! assert_eq!(a, b);
//!
//! assert!(!table.is_bound(a));
//! assert_eq!(table.all_unbound(), vec![a]);
//! ```

use rustc_hash::FxHashMap;

use irlink_core::{
    ClassDecl, Declaration, DeclarationParent, ExternalPackageFragment, FieldDecl, FileId,
    FragmentId, FunctionDecl, IdSignature, InitializerDecl, IrFile, PropertyDecl, SymbolId,
    SymbolKind, TypeParameterDecl,
};

use crate::RegistryError;

#[derive(Debug)]
struct SymbolSlot {
    kind: SymbolKind,
    signature: Option<IdSignature>,
    declaration: Option<Declaration>,
}

/// Symbol storage for one link invocation.
///
/// Not thread-safe; a link owns its table exclusively.
#[derive(Debug, Default)]
pub struct SymbolTable {
    // === Symbols ===
    slots: Vec<SymbolSlot>,
    /// Public signature -> symbol.
    by_signature: FxHashMap<IdSignature, SymbolId>,

    // === Containers ===
    files: Vec<IrFile>,
    fragments: Vec<ExternalPackageFragment>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Symbol Creation
    // ==========================================================================

    /// Get or create the symbol for a signature.
    ///
    /// An existing symbol is returned as is, whatever `kind` says.
    pub fn declare(&mut self, kind: SymbolKind, signature: IdSignature) -> SymbolId {
        if let Some(&symbol) = self.by_signature.get(&signature) {
            return symbol;
        }
        let symbol = self.push_slot(kind, Some(signature.clone()));
        self.by_signature.insert(signature, symbol);
        symbol
    }

    /// Create a symbol that cannot be referenced by signature.
    pub fn create_private(&mut self, kind: SymbolKind) -> SymbolId {
        self.push_slot(kind, None)
    }

    /// Create (or reuse, for a known signature) a symbol and bind the
    /// declaration produced by `build` to it.
    pub fn define(
        &mut self,
        kind: SymbolKind,
        signature: Option<IdSignature>,
        build: impl FnOnce(SymbolId) -> Declaration,
    ) -> Result<SymbolId, RegistryError> {
        let symbol = match signature {
            Some(signature) => self.declare(kind, signature),
            None => self.create_private(kind),
        };
        self.bind(symbol, build(symbol))?;
        Ok(symbol)
    }

    fn push_slot(&mut self, kind: SymbolKind, signature: Option<IdSignature>) -> SymbolId {
        let symbol = SymbolId::new(self.slots.len() as u32);
        self.slots.push(SymbolSlot {
            kind,
            signature,
            declaration: None,
        });
        symbol
    }

    // ==========================================================================
    // Binding
    // ==========================================================================

    /// Bind a declaration to an unbound symbol.
    pub fn bind(&mut self, symbol: SymbolId, declaration: Declaration) -> Result<(), RegistryError> {
        if declaration.symbol != symbol {
            return Err(RegistryError::SymbolMismatch {
                symbol,
                declared: declaration.symbol,
            });
        }
        let slot = self
            .slots
            .get_mut(symbol.index())
            .ok_or(RegistryError::UnknownSymbol { symbol })?;
        if slot.declaration.is_some() {
            return Err(RegistryError::AlreadyBound { symbol });
        }
        let found = declaration.symbol_kind();
        if found != slot.kind {
            return Err(RegistryError::KindMismatch {
                symbol,
                expected: slot.kind,
                found,
            });
        }
        slot.declaration = Some(declaration);
        Ok(())
    }

    /// Remove the declaration of a symbol, leaving the symbol unbound.
    pub fn unbind(&mut self, symbol: SymbolId) -> Option<Declaration> {
        self.slots.get_mut(symbol.index())?.declaration.take()
    }

    /// Whether the symbol has a declaration.
    pub fn is_bound(&self, symbol: SymbolId) -> bool {
        self.declaration(symbol).is_some()
    }

    // ==========================================================================
    // Symbol Queries
    // ==========================================================================

    /// Number of symbols.
    pub fn symbol_count(&self) -> usize {
        self.slots.len()
    }

    /// Every symbol in creation order.
    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.slots.len()).map(|index| SymbolId::new(index as u32))
    }

    /// Kind of a symbol.
    pub fn kind(&self, symbol: SymbolId) -> Option<SymbolKind> {
        self.slots.get(symbol.index()).map(|slot| slot.kind)
    }

    /// Signature of a symbol, if it has one.
    pub fn signature(&self, symbol: SymbolId) -> Option<&IdSignature> {
        self.slots.get(symbol.index())?.signature.as_ref()
    }

    /// Symbol of a signature, if one was declared.
    pub fn lookup(&self, signature: &IdSignature) -> Option<SymbolId> {
        self.by_signature.get(signature).copied()
    }

    /// Snapshot of every unbound symbol, in creation order.
    ///
    /// Binding while iterating the snapshot is expected; re-check
    /// [`is_bound`](Self::is_bound) before acting on an entry.
    pub fn all_unbound(&self) -> Vec<SymbolId> {
        self.symbols().filter(|&symbol| !self.is_bound(symbol)).collect()
    }

    /// Symbols whose signature satisfies `predicate`, in creation order.
    pub fn symbols_with_signature(
        &self,
        predicate: impl Fn(&IdSignature) -> bool,
    ) -> Vec<SymbolId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.signature.as_ref().is_some_and(&predicate))
            .map(|(index, _)| SymbolId::new(index as u32))
            .collect()
    }

    // ==========================================================================
    // Declaration Access
    // ==========================================================================

    /// Declaration bound to a symbol.
    pub fn declaration(&self, symbol: SymbolId) -> Option<&Declaration> {
        self.slots.get(symbol.index())?.declaration.as_ref()
    }

    /// Mutable declaration bound to a symbol.
    pub fn declaration_mut(&mut self, symbol: SymbolId) -> Option<&mut Declaration> {
        self.slots.get_mut(symbol.index())?.declaration.as_mut()
    }

    pub fn class(&self, symbol: SymbolId) -> Option<&ClassDecl> {
        self.declaration(symbol)?.as_class()
    }

    pub fn class_mut(&mut self, symbol: SymbolId) -> Option<&mut ClassDecl> {
        self.declaration_mut(symbol)?.as_class_mut()
    }

    /// Function or constructor payload.
    pub fn function(&self, symbol: SymbolId) -> Option<&FunctionDecl> {
        self.declaration(symbol)?.as_function()
    }

    /// Mutable function or constructor payload.
    pub fn function_mut(&mut self, symbol: SymbolId) -> Option<&mut FunctionDecl> {
        self.declaration_mut(symbol)?.as_function_mut()
    }

    pub fn property(&self, symbol: SymbolId) -> Option<&PropertyDecl> {
        self.declaration(symbol)?.as_property()
    }

    pub fn property_mut(&mut self, symbol: SymbolId) -> Option<&mut PropertyDecl> {
        self.declaration_mut(symbol)?.as_property_mut()
    }

    pub fn field(&self, symbol: SymbolId) -> Option<&FieldDecl> {
        self.declaration(symbol)?.as_field()
    }

    pub fn field_mut(&mut self, symbol: SymbolId) -> Option<&mut FieldDecl> {
        self.declaration_mut(symbol)?.as_field_mut()
    }

    pub fn type_parameter(&self, symbol: SymbolId) -> Option<&TypeParameterDecl> {
        self.declaration(symbol)?.as_type_parameter()
    }

    pub fn type_parameter_mut(&mut self, symbol: SymbolId) -> Option<&mut TypeParameterDecl> {
        self.declaration_mut(symbol)?.as_type_parameter_mut()
    }

    pub fn initializer(&self, symbol: SymbolId) -> Option<&InitializerDecl> {
        self.declaration(symbol)?.as_initializer()
    }

    pub fn initializer_mut(&mut self, symbol: SymbolId) -> Option<&mut InitializerDecl> {
        self.declaration_mut(symbol)?.as_initializer_mut()
    }

    // ==========================================================================
    // Parents and Names
    // ==========================================================================

    /// The declaration owning `symbol`, if its parent is a declaration.
    pub fn parent_declaration(&self, symbol: SymbolId) -> Option<SymbolId> {
        match self.declaration(symbol)?.parent {
            DeclarationParent::Declaration(parent) => Some(parent),
            _ => None,
        }
    }

    /// Nearest enclosing class of `symbol`.
    pub fn parent_class(&self, symbol: SymbolId) -> Option<SymbolId> {
        let mut current = self.parent_declaration(symbol)?;
        for _ in 0..self.slots.len() {
            if self.class(current).is_some() {
                return Some(current);
            }
            current = self.parent_declaration(current)?;
        }
        None
    }

    /// File that (transitively) contains `symbol`.
    ///
    /// `None` for unbound symbols and declarations living in fragments.
    pub fn file_of(&self, symbol: SymbolId) -> Option<FileId> {
        let mut current = symbol;
        for _ in 0..=self.slots.len() {
            match self.declaration(current)?.parent {
                DeclarationParent::File(file) => return Some(file),
                DeclarationParent::Declaration(parent) => current = parent,
                DeclarationParent::ExternalFragment(_) => return None,
            }
        }
        None
    }

    /// Dotted name relative to the package: enclosing class names, then the
    /// declaration's own name.
    ///
    /// Unbound symbols fall back to their signature's declaration path.
    pub fn fq_name(&self, symbol: SymbolId) -> Option<String> {
        let Some(declaration) = self.declaration(symbol) else {
            return self
                .signature(symbol)?
                .declaration_fq_name()
                .map(str::to_owned);
        };

        let mut segments = vec![declaration.name.as_str()];
        let mut current = symbol;
        while let Some(class) = self.parent_class(current) {
            if segments.len() > self.slots.len() {
                break;
            }
            segments.push(self.declaration(class)?.name.as_str());
            current = class;
        }
        segments.reverse();
        Some(segments.join("."))
    }

    // ==========================================================================
    // Files and Fragments
    // ==========================================================================

    /// Add a file.
    pub fn add_file(&mut self, file: IrFile) -> FileId {
        let id = FileId::new(self.files.len() as u32);
        self.files.push(file);
        id
    }

    pub fn file(&self, id: FileId) -> Option<&IrFile> {
        self.files.get(id.index())
    }

    pub fn file_mut(&mut self, id: FileId) -> Option<&mut IrFile> {
        self.files.get_mut(id.index())
    }

    /// Every file with its id, in insertion order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &IrFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, file)| (FileId::new(index as u32), file))
    }

    /// Add a synthetic package fragment.
    pub fn add_fragment(&mut self, fragment: ExternalPackageFragment) -> FragmentId {
        let id = FragmentId::new(self.fragments.len() as u32);
        self.fragments.push(fragment);
        id
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&ExternalPackageFragment> {
        self.fragments.get(id.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irlink_core::{
        ClassKind, DeclarationKind, FileEntry, IrType, Modality, Visibility,
    };

    fn class_decl(symbol: SymbolId, name: &str, parent: DeclarationParent) -> Declaration {
        Declaration::new(
            symbol,
            name,
            parent,
            DeclarationKind::Class(ClassDecl::new(ClassKind::Class, Modality::Final)),
        )
    }

    fn table_with_file() -> (SymbolTable, FileId) {
        let mut table = SymbolTable::new();
        let file = table.add_file(IrFile::new("lib", "lib", FileEntry::from_source("Foo.kt", "")));
        (table, file)
    }

    #[test]
    fn declare_is_get_or_create() {
        let mut table = SymbolTable::new();
        let foo = table.declare(SymbolKind::Class, IdSignature::common("lib", "Foo"));
        let bar = table.declare(SymbolKind::Class, IdSignature::common("lib", "Bar"));
        assert_ne!(foo, bar);
        assert_eq!(
            table.declare(SymbolKind::Class, IdSignature::common("lib", "Foo")),
            foo
        );
        assert_eq!(table.symbol_count(), 2);
        assert_eq!(table.lookup(&IdSignature::common("lib", "Bar")), Some(bar));
    }

    #[test]
    fn private_symbols_have_no_signature() {
        let mut table = SymbolTable::new();
        let local = table.create_private(SymbolKind::Function);
        assert!(table.signature(local).is_none());
        assert_eq!(table.kind(local), Some(SymbolKind::Function));
    }

    #[test]
    fn bind_and_unbind() {
        let (mut table, file) = table_with_file();
        let foo = table.declare(SymbolKind::Class, IdSignature::common("lib", "Foo"));
        table
            .bind(foo, class_decl(foo, "Foo", DeclarationParent::File(file)))
            .unwrap();
        assert!(table.is_bound(foo));
        assert!(table.class(foo).is_some());
        assert!(table.function(foo).is_none());

        let removed = table.unbind(foo).unwrap();
        assert_eq!(removed.name, "Foo");
        assert!(!table.is_bound(foo));
    }

    #[test]
    fn bind_rejects_invalid_declarations() {
        let (mut table, file) = table_with_file();
        let foo = table.declare(SymbolKind::Class, IdSignature::common("lib", "Foo"));
        let other = table.create_private(SymbolKind::Class);
        let parent = DeclarationParent::File(file);

        assert_eq!(
            table.bind(foo, class_decl(other, "Foo", parent)),
            Err(RegistryError::SymbolMismatch {
                symbol: foo,
                declared: other
            })
        );

        let function = table.create_private(SymbolKind::Function);
        assert_eq!(
            table.bind(function, class_decl(function, "f", parent)),
            Err(RegistryError::KindMismatch {
                symbol: function,
                expected: SymbolKind::Function,
                found: SymbolKind::Class
            })
        );

        table.bind(foo, class_decl(foo, "Foo", parent)).unwrap();
        assert_eq!(
            table.bind(foo, class_decl(foo, "Foo", parent)),
            Err(RegistryError::AlreadyBound { symbol: foo })
        );

        let missing = SymbolId::new(99);
        assert_eq!(
            table.bind(missing, class_decl(missing, "X", parent)),
            Err(RegistryError::UnknownSymbol { symbol: missing })
        );
    }

    #[test]
    fn all_unbound_is_a_snapshot_in_creation_order() {
        let (mut table, file) = table_with_file();
        let a = table.declare(SymbolKind::Class, IdSignature::common("lib", "A"));
        let b = table.declare(SymbolKind::Class, IdSignature::common("lib", "B"));
        let c = table.declare(SymbolKind::Class, IdSignature::common("lib", "C"));
        table
            .bind(b, class_decl(b, "B", DeclarationParent::File(file)))
            .unwrap();

        let unbound = table.all_unbound();
        assert_eq!(unbound, vec![a, c]);

        table
            .bind(c, class_decl(c, "C", DeclarationParent::File(file)))
            .unwrap();
        assert_eq!(unbound, vec![a, c]);
        assert_eq!(table.all_unbound(), vec![a]);
    }

    #[test]
    fn symbols_with_signature_finds_accessors() {
        let mut table = SymbolTable::new();
        let property_sig = IdSignature::common("lib", "Foo.x");
        let property = table.declare(SymbolKind::Property, property_sig.clone());
        let getter = table.declare(
            SymbolKind::Function,
            IdSignature::accessor(
                property_sig.clone(),
                irlink_core::CommonSignature::new("lib", "Foo.<get-x>"),
            ),
        );
        let _unrelated = table.declare(SymbolKind::Function, IdSignature::common("lib", "f"));

        let accessors = table.symbols_with_signature(|sig| sig.is_accessor_of(&property_sig));
        assert_eq!(accessors, vec![getter]);
        assert_ne!(accessors[0], property);
    }

    #[test]
    fn fq_name_walks_enclosing_classes() {
        let (mut table, file) = table_with_file();
        let outer = table
            .define(SymbolKind::Class, Some(IdSignature::common("lib", "Outer")), |s| {
                class_decl(s, "Outer", DeclarationParent::File(file))
            })
            .unwrap();
        let inner = table
            .define(SymbolKind::Class, None, |s| {
                class_decl(s, "Inner", DeclarationParent::Declaration(outer))
            })
            .unwrap();
        let method = table
            .define(SymbolKind::Function, None, |s| {
                Declaration::new(
                    s,
                    "run",
                    DeclarationParent::Declaration(inner),
                    DeclarationKind::Function(FunctionDecl::new(IrType::simple(outer))),
                )
                .with_visibility(Visibility::Private)
            })
            .unwrap();

        assert_eq!(table.fq_name(method).as_deref(), Some("Outer.Inner.run"));
        assert_eq!(table.parent_class(method), Some(inner));
        assert_eq!(table.file_of(method), Some(file));
    }

    #[test]
    fn fq_name_of_unbound_symbol_uses_signature() {
        let mut table = SymbolTable::new();
        let bar = table.declare(
            SymbolKind::Function,
            IdSignature::member("lib", "Foo.bar", &[]),
        );
        assert_eq!(table.fq_name(bar).as_deref(), Some("Foo.bar"));
        assert!(table.file_of(bar).is_none());
    }

    #[test]
    fn fragments_have_no_file() {
        let mut table = SymbolTable::new();
        let fragment = table.add_fragment(ExternalPackageFragment::error_module());
        let stub = table
            .define(SymbolKind::Class, None, |s| {
                class_decl(s, "Stub", DeclarationParent::ExternalFragment(fragment))
            })
            .unwrap();
        assert!(table.file_of(stub).is_none());
        assert_eq!(
            table.fragment(fragment).map(|f| f.module_name.as_str()),
            Some("<error module>")
        );
    }
}
