//! Partial linkage support - the entry points a link pipeline calls.
//!
//! A pipeline creates one support object per link with
//! [`create_partial_linkage_support`] and calls it at two points:
//!
//! 1. Before fake overrides are built, [`explore_classifiers`] drops the
//!    classes that are partially linked from the fake override candidates.
//! 2. After everything that can be linked was linked,
//!    [`generate_stubs_and_patch_usages`] binds every remaining unbound symbol
//!    to a stub and rewrites the usages of unlinked symbols.
//!
//! [`explore_classifiers`]: PartialLinkageSupport::explore_classifiers
//! [`generate_stubs_and_patch_usages`]: PartialLinkageSupport::generate_stubs_and_patch_usages
//!
//! # Example
//!
//! ```
//! use irlink_core::{Diagnostics, RootElement};
//! use irlink_linker::{PartialLinkageConfig, create_partial_linkage_support};
//! use irlink_registry::{IrBuiltIns, SymbolTable};
//!
//! let mut table = SymbolTable::new();
//! let builtins = IrBuiltIns::install(&mut table).unwrap();
//! let mut support =
//!     create_partial_linkage_support(PartialLinkageConfig::default(), &builtins, Diagnostics::new());
//!
//! let output = support
//!     .generate_stubs_and_patch_usages(&mut table, &|table: &SymbolTable| {
//!         table.files().map(|(file, _)| RootElement::File(file)).collect()
//!     })
//!     .unwrap();
//! assert_eq!(output.stubs_generated, 0);
//! ```

use irlink_core::{MessageLogger, RootElement, SymbolId};
use irlink_registry::{IrBuiltIns, SymbolTable};

use crate::{
    ClassifierExplorer, FakeOverrideBuilder, LinkageError, MarkerTypeHandler,
    MissingDeclarationStubGenerator, PartialLinkageConfig, PatchOutput, TreePatcher,
};

/// Supplies the roots to patch, once stubs exist.
pub type RootsSupplier<'r> = dyn Fn(&SymbolTable) -> Vec<RootElement> + 'r;

/// Result of [`PartialLinkageSupport::generate_stubs_and_patch_usages`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkageOutput {
    /// Stub declarations bound during this call.
    pub stubs_generated: usize,
    pub patch: PatchOutput,
}

/// Partial linkage as seen by a link pipeline.
pub trait PartialLinkageSupport {
    /// Whether partial linkage does anything at all.
    fn partial_linkage_enabled(&self) -> bool;

    /// Remove every partially linked class from the fake override candidates.
    fn explore_classifiers(&mut self, table: &mut SymbolTable, fake_overrides: &mut FakeOverrideBuilder);

    /// Explore the classifiers used by an inline function that is
    /// deserialized lazily, after the patch pass has run.
    fn explore_classifiers_in_inline_lazy_function(&mut self, table: &mut SymbolTable, function: SymbolId);

    /// Bind all unbound symbols to stubs, then patch the roots.
    fn generate_stubs_and_patch_usages(
        &mut self,
        table: &mut SymbolTable,
        roots: &RootsSupplier<'_>,
    ) -> Result<LinkageOutput, LinkageError>;
}

/// Pick the implementation for `config`.
pub fn create_partial_linkage_support<'a, L>(
    config: PartialLinkageConfig,
    builtins: &IrBuiltIns,
    logger: L,
) -> Box<dyn PartialLinkageSupport + 'a>
where
    L: MessageLogger + 'a,
{
    if config.is_enabled() {
        Box::new(PartialLinkageSupportImpl::new(builtins, logger))
    } else {
        Box::new(DisabledPartialLinkageSupport)
    }
}

// ==========================================================================
// Enabled
// ==========================================================================

/// Partial linkage for one link. Owns the marker type and every memo table.
pub struct PartialLinkageSupportImpl<L: MessageLogger> {
    builtins: IrBuiltIns,
    marker: MarkerTypeHandler,
    explorer: ClassifierExplorer,
    logger: L,
}

impl<L: MessageLogger> PartialLinkageSupportImpl<L> {
    pub fn new(builtins: &IrBuiltIns, logger: L) -> Self {
        let marker = MarkerTypeHandler::new(builtins);
        let explorer = ClassifierExplorer::new(MissingDeclarationStubGenerator::new(&marker));
        Self {
            builtins: *builtins,
            marker,
            explorer,
            logger,
        }
    }

    pub fn marker(&self) -> &MarkerTypeHandler {
        &self.marker
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    pub fn into_logger(self) -> L {
        self.logger
    }

    fn generate_stubs(&mut self, table: &mut SymbolTable) -> Result<usize, LinkageError> {
        let before = self.explorer.stub_generator().stub_count();
        for symbol in table.all_unbound() {
            // Generating one stub may bind others, e.g. property accessors.
            if table.is_bound(symbol) {
                tracing::trace!(?symbol, "bound while generating other stubs");
                continue;
            }
            self.explorer.stub_generator_mut().get_declaration(table, symbol)?;
        }
        Ok(self.explorer.stub_generator().stub_count() - before)
    }
}

impl<L: MessageLogger> PartialLinkageSupport for PartialLinkageSupportImpl<L> {
    fn partial_linkage_enabled(&self) -> bool {
        true
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn explore_classifiers(&mut self, table: &mut SymbolTable, fake_overrides: &mut FakeOverrideBuilder) {
        if fake_overrides.is_empty() {
            return;
        }
        let _span = tracing::debug_span!("explore_classifiers", candidates = fake_overrides.len()).entered();

        let explorer = &mut self.explorer;
        let excluded = fake_overrides.retain(|class| !explorer.is_partially_linked_classifier(table, class));
        if !excluded.is_empty() {
            tracing::debug!(?excluded, "excluded partially linked classes from fake overrides");
        }
    }

    fn explore_classifiers_in_inline_lazy_function(&mut self, table: &mut SymbolTable, function: SymbolId) {
        let partially_linked = self.explorer.explore_declaration(table, function);
        tracing::trace!(?function, ?partially_linked, "explored lazy inline function");
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn generate_stubs_and_patch_usages(
        &mut self,
        table: &mut SymbolTable,
        roots: &RootsSupplier<'_>,
    ) -> Result<LinkageOutput, LinkageError> {
        let _span = tracing::debug_span!("generate_stubs_and_patch_usages").entered();

        let stubs_generated = self.generate_stubs(table)?;
        tracing::debug!(stubs_generated, "generated missing declaration stubs");

        let roots = roots(table);
        let patch = TreePatcher::new(
            table,
            &self.builtins,
            &self.marker,
            &mut self.explorer,
            &mut self.logger,
        )
        .patch_roots(&roots);

        Ok(LinkageOutput { stubs_generated, patch })
    }
}

// ==========================================================================
// Disabled
// ==========================================================================

/// Partial linkage turned off. Every operation is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPartialLinkageSupport;

impl PartialLinkageSupport for DisabledPartialLinkageSupport {
    fn partial_linkage_enabled(&self) -> bool {
        false
    }

    fn explore_classifiers(&mut self, _table: &mut SymbolTable, _fake_overrides: &mut FakeOverrideBuilder) {}

    fn explore_classifiers_in_inline_lazy_function(&mut self, _table: &mut SymbolTable, _function: SymbolId) {}

    fn generate_stubs_and_patch_usages(
        &mut self,
        _table: &mut SymbolTable,
        _roots: &RootsSupplier<'_>,
    ) -> Result<LinkageOutput, LinkageError> {
        Ok(LinkageOutput::default())
    }
}
