//! IR fixtures for unit tests.

use irlink_core::{
    ClassDecl, ClassKind, Declaration, DeclarationKind, DeclarationParent, Diagnostics, FileEntry,
    FileId, FunctionDecl, IdSignature, IrFile, IrType, Modality, RootElement, Span, SymbolId,
    SymbolKind, ValueParameter,
};
use irlink_registry::{IrBuiltIns, SymbolTable};

use crate::{ClassifierExplorer, MarkerTypeHandler, MissingDeclarationStubGenerator, PatchOutput, TreePatcher};

/// Every line of the fixture file is 100 bytes wide.
const LINE_WIDTH: u32 = 100;

/// A table with built-ins and one file `main.kt` of module `app`.
pub(crate) struct Fixture {
    pub table: SymbolTable,
    pub builtins: IrBuiltIns,
    pub marker: MarkerTypeHandler,
    pub file: FileId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut table = SymbolTable::new();
        let builtins = IrBuiltIns::install(&mut table).unwrap();
        let marker = MarkerTypeHandler::new(&builtins);
        let entry = FileEntry::with_line_starts("main.kt", (0..64).map(|line| line * LINE_WIDTH).collect());
        let file = table.add_file(IrFile::new("app", "app", entry));
        Self {
            table,
            builtins,
            marker,
            file,
        }
    }

    /// Span starting at 0-based `line` and `column`.
    pub fn at(line: u32, column: u32) -> Span {
        let start = line * LINE_WIDTH + column;
        Span::new(start, start + 1)
    }

    pub fn explorer(&self) -> ClassifierExplorer {
        ClassifierExplorer::new(MissingDeclarationStubGenerator::new(&self.marker))
    }

    /// Open top-level class `app/<name>`.
    pub fn class(&mut self, name: &str, super_types: Vec<IrType>) -> SymbolId {
        let file = self.file;
        let class = self
            .table
            .define(SymbolKind::Class, Some(IdSignature::common("app", name)), |symbol| {
                let mut class = ClassDecl::new(ClassKind::Class, Modality::Open)
                    .with_this_receiver(ValueParameter::new("<this>", IrType::simple(symbol)));
                class.super_types = super_types;
                Declaration::new(symbol, name, DeclarationParent::File(file), DeclarationKind::Class(class))
            })
            .unwrap();
        self.table.file_mut(file).unwrap().declarations.push(class);
        class
    }

    /// Class `lib/<name>` that nothing binds.
    pub fn unbound_class(&mut self, name: &str) -> SymbolId {
        self.table.declare(SymbolKind::Class, IdSignature::common("lib", name))
    }

    /// Function in the file, or member of `owner`.
    pub fn function(
        &mut self,
        name: &str,
        owner: Option<SymbolId>,
        signature: IdSignature,
        function: FunctionDecl,
    ) -> SymbolId {
        let parent = match owner {
            Some(owner) => DeclarationParent::Declaration(owner),
            None => DeclarationParent::File(self.file),
        };
        let symbol = self
            .table
            .define(SymbolKind::Function, Some(signature), |symbol| {
                Declaration::new(symbol, name, parent, DeclarationKind::Function(function))
            })
            .unwrap();
        match owner {
            Some(owner) => self.table.class_mut(owner).unwrap().declarations.push(symbol),
            None => self.table.file_mut(self.file).unwrap().declarations.push(symbol),
        }
        symbol
    }

    /// Patch the fixture file with a fresh explorer.
    pub fn patch(&mut self) -> (PatchOutput, Diagnostics) {
        let mut explorer = self.explorer();
        let mut diagnostics = Diagnostics::new();
        let output = TreePatcher::new(
            &mut self.table,
            &self.builtins,
            &self.marker,
            &mut explorer,
            &mut diagnostics,
        )
        .patch_roots(&[RootElement::File(self.file)]);
        (output, diagnostics)
    }
}
