//! Stubs for declarations the linker could not find.
//!
//! Every stub has origin [`DeclarationOrigin::MissingDeclaration`], an
//! undefined span and the shared `<error module>` fragment as parent (property
//! accessors are parented to their property). Whatever type a stub cannot know
//! is the marker type, so every usage of a stub reads as unlinked.
//!
//! Run the generator only after fake overrides were built: a stub bound to a
//! symbol that override resolution would still have linked hides the real
//! declaration for good.

use rustc_hash::FxHashSet;

use irlink_core::{
    ClassDecl, ClassKind, Declaration, DeclarationKind, DeclarationOrigin, DeclarationParent,
    ExternalPackageFragment, FieldDecl, FragmentId, FunctionDecl, FunctionFlags, IdSignature,
    IrType, Modality, PropertyDecl, SymbolId, SymbolKind, ValueParameter,
};
use irlink_registry::{RegistryError, SymbolTable};

use crate::{LinkageError, MarkerTypeHandler};

/// Name given to stubs whose signature does not reveal one.
pub const UNKNOWN_NAME: &str = "<unknown name>";

/// Name of constructors.
pub const INIT_NAME: &str = "<init>";

/// Generates and memoizes stub declarations.
#[derive(Debug)]
pub struct MissingDeclarationStubGenerator {
    marker: IrType,
    common_parent: Option<FragmentId>,
    stubs: FxHashSet<SymbolId>,
}

impl MissingDeclarationStubGenerator {
    /// Create a generator using `marker` for unknown types.
    pub fn new(marker: &MarkerTypeHandler) -> Self {
        Self {
            marker: marker.marker_type(),
            common_parent: None,
            stubs: FxHashSet::default(),
        }
    }

    /// The stub declaration of `symbol`, generating it on first request.
    ///
    /// Asking again for a symbol that already has a stub returns that same
    /// declaration. Asking for any other bound symbol is an error.
    pub fn get_declaration<'t>(
        &mut self,
        table: &'t mut SymbolTable,
        symbol: SymbolId,
    ) -> Result<&'t Declaration, LinkageError> {
        if !self.stubs.contains(&symbol) {
            if table.is_bound(symbol) {
                return Err(LinkageError::StubForBoundSymbol { symbol });
            }
            self.generate(table, symbol)?;
        }
        table
            .declaration(symbol)
            .ok_or(LinkageError::Registry(RegistryError::UnknownSymbol { symbol }))
    }

    /// Whether `symbol` is bound to a stub from this generator.
    pub fn is_stub(&self, symbol: SymbolId) -> bool {
        self.stubs.contains(&symbol)
    }

    /// Number of stubs generated so far.
    pub fn stub_count(&self) -> usize {
        self.stubs.len()
    }

    fn generate(&mut self, table: &mut SymbolTable, symbol: SymbolId) -> Result<(), LinkageError> {
        let kind = table
            .kind(symbol)
            .ok_or(RegistryError::UnknownSymbol { symbol })?;
        let parent = DeclarationParent::ExternalFragment(self.common_parent(table));
        let name = guess_name(table.signature(symbol));

        let kind_payload = match kind {
            SymbolKind::Class => {
                let class = ClassDecl::new(ClassKind::Class, Modality::Open)
                    .with_this_receiver(ValueParameter::new("<this>", IrType::simple(symbol)));
                DeclarationKind::Class(class)
            }
            SymbolKind::Constructor => {
                // The empty body stays empty: calls of the stub are what gets rewritten.
                let constructor =
                    FunctionDecl::new(self.marker.clone()).with_flags(FunctionFlags::PRIMARY);
                return self.bind_stub(
                    table,
                    Declaration::new(symbol, INIT_NAME, parent, DeclarationKind::Constructor(constructor)),
                );
            }
            SymbolKind::Function => DeclarationKind::Function(FunctionDecl::new(self.marker.clone())),
            SymbolKind::Field => DeclarationKind::Field(FieldDecl::new(self.marker.clone())),
            SymbolKind::Property => DeclarationKind::Property(self.generate_accessors(table, symbol)?),
            SymbolKind::TypeParameter | SymbolKind::AnonymousInitializer => {
                tracing::error!(?symbol, %kind, "stub generation requested for unsupported symbol kind");
                return Err(LinkageError::UnsupportedStubKind { symbol, kind });
            }
        };

        self.bind_stub(table, Declaration::new(symbol, name, parent, kind_payload))
    }

    /// Binds stubs for still-unbound accessors of `property` and returns the
    /// property payload referring to them.
    fn generate_accessors(
        &mut self,
        table: &mut SymbolTable,
        property: SymbolId,
    ) -> Result<PropertyDecl, LinkageError> {
        let mut payload = PropertyDecl::default();
        let Some(property_signature) = table.signature(property).cloned() else {
            return Ok(payload);
        };

        for accessor in table.symbols_with_signature(|sig| sig.is_accessor_of(&property_signature)) {
            if table.is_bound(accessor) || table.kind(accessor) != Some(SymbolKind::Function) {
                continue;
            }
            let name = guess_name(table.signature(accessor));
            let slot = if name.starts_with("<set-") {
                &mut payload.setter
            } else {
                &mut payload.getter
            };
            if slot.is_some() {
                continue;
            }
            *slot = Some(accessor);

            let function = FunctionDecl::new(self.marker.clone());
            self.bind_stub(
                table,
                Declaration::new(
                    accessor,
                    name,
                    DeclarationParent::Declaration(property),
                    DeclarationKind::Function(function),
                ),
            )?;
        }

        Ok(payload)
    }

    fn bind_stub(&mut self, table: &mut SymbolTable, declaration: Declaration) -> Result<(), LinkageError> {
        let symbol = declaration.symbol;
        tracing::debug!(
            ?symbol,
            kind = %declaration.symbol_kind(),
            name = %declaration.name,
            "generated stub for missing declaration"
        );
        table.bind(symbol, declaration.with_origin(DeclarationOrigin::MissingDeclaration))?;
        self.stubs.insert(symbol);
        Ok(())
    }

    fn common_parent(&mut self, table: &mut SymbolTable) -> FragmentId {
        *self
            .common_parent
            .get_or_insert_with(|| table.add_fragment(ExternalPackageFragment::error_module()))
    }
}

/// Best-effort simple name of a signature.
pub fn guess_name(signature: Option<&IdSignature>) -> String {
    signature
        .and_then(guess_signature_name)
        .unwrap_or(UNKNOWN_NAME)
        .to_owned()
}

fn guess_signature_name(signature: &IdSignature) -> Option<&str> {
    match signature {
        IdSignature::Common(common) => Some(common.short_name()).filter(|name| !name.is_empty()),
        IdSignature::Composite { inner, .. } => guess_signature_name(inner),
        IdSignature::Accessor { accessor, .. } => {
            Some(accessor.short_name()).filter(|name| !name.is_empty())
        }
        IdSignature::FileLocal { .. } | IdSignature::Scoped { .. } | IdSignature::File { .. } => None,
    }
}
