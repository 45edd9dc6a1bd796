//! Link session API.
//!
//! A [`LinkSession`] owns the symbol table of one link. Callers load the IR of
//! every module into it, queue fake override candidates, then call
//! [`link`](LinkSession::link) once.
//!
//! # Example
//!
//! ```
//! use irlink::prelude::*;
//!
//! let mut session = LinkSession::new()?;
//! let file = session.add_file(IrFile::new("app", "app", FileEntry::from_source("main.kt", "")))?;
//!
//! // A call of a function nobody defines.
//! let missing = session
//!     .table_mut()
//!     .declare(SymbolKind::Function, IdSignature::member("lib", "Foo.bar", &[]));
//! let unit = session.builtins().unit_type();
//! let main = session.table_mut().define(
//!     SymbolKind::Function,
//!     Some(IdSignature::common("app", "main")),
//!     |symbol| {
//!         let body = Body::new(vec![Expr::call(missing, unit.clone()).into()]);
//!         Declaration::new(
//!             symbol,
//!             "main",
//!             DeclarationParent::File(file),
//!             DeclarationKind::Function(FunctionDecl::new(unit.clone()).with_body(body)),
//!         )
//!     },
//! )?;
//! session.table_mut().file_mut(file).unwrap().declarations.push(main);
//!
//! let mut diagnostics = Diagnostics::new();
//! let output = session.link(&mut diagnostics)?;
//!
//! assert_eq!(output.patch.expressions_rewritten, 1);
//! assert_eq!(diagnostics.warning_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use irlink_core::{FileId, IrFile, MessageLogger, RootElement};
use irlink_linker::{
    FakeOverrideBuilder, LinkageError, LinkageOutput, PartialLinkageConfig, create_partial_linkage_support,
};
use irlink_registry::{IrBuiltIns, RegistryError, SymbolTable};

/// The IR of all modules taking part in one link.
pub struct LinkSession {
    table: SymbolTable,
    builtins: IrBuiltIns,
    config: PartialLinkageConfig,
    fake_overrides: FakeOverrideBuilder,
    is_linked: bool,
}

impl LinkSession {
    /// Create a session with partial linkage enabled.
    pub fn new() -> Result<Self, SessionError> {
        Self::with_config(PartialLinkageConfig::default())
    }

    /// Create a session with the given configuration.
    pub fn with_config(config: PartialLinkageConfig) -> Result<Self, SessionError> {
        let mut table = SymbolTable::new();
        let builtins = IrBuiltIns::install(&mut table)?;
        Ok(Self {
            table,
            builtins,
            config,
            fake_overrides: FakeOverrideBuilder::new(),
            is_linked: false,
        })
    }

    // === Accessors ===

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    pub fn builtins(&self) -> &IrBuiltIns {
        &self.builtins
    }

    pub fn config(&self) -> PartialLinkageConfig {
        self.config
    }

    /// Fake override candidates, narrowed by [`link`](Self::link).
    pub fn fake_overrides(&self) -> &FakeOverrideBuilder {
        &self.fake_overrides
    }

    pub fn fake_overrides_mut(&mut self) -> &mut FakeOverrideBuilder {
        &mut self.fake_overrides
    }

    /// Check if the session has been linked.
    pub fn is_linked(&self) -> bool {
        self.is_linked
    }

    // === Loading ===

    /// Add a file of some module.
    pub fn add_file(&mut self, file: IrFile) -> Result<FileId, SessionError> {
        if self.is_linked {
            return Err(SessionError::AlreadyLinked);
        }
        Ok(self.table.add_file(file))
    }

    // === Linking ===

    /// Run partial linkage over every file, reporting to `logger`.
    ///
    /// Drops partially linked classes from the fake override candidates, binds
    /// stubs for all unbound symbols and patches every file.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn link<L>(&mut self, logger: &mut L) -> Result<LinkageOutput, SessionError>
    where
        L: MessageLogger + ?Sized,
    {
        if self.is_linked {
            return Err(SessionError::AlreadyLinked);
        }

        let mut support = create_partial_linkage_support(self.config, &self.builtins, logger);
        if !support.partial_linkage_enabled() {
            tracing::debug!("partial linkage disabled");
        }

        support.explore_classifiers(&mut self.table, &mut self.fake_overrides);
        let output = support.generate_stubs_and_patch_usages(&mut self.table, &|table: &SymbolTable| {
            table.files().map(|(file, _)| RootElement::File(file)).collect()
        })?;

        self.is_linked = true;
        tracing::info!(
            stubs = output.stubs_generated,
            functions = output.patch.functions_patched,
            expressions = output.patch.expressions_rewritten,
            "link completed"
        );
        Ok(output)
    }
}

/// Errors that can occur in a link session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session has already been linked
    #[error("Session has already been linked")]
    AlreadyLinked,

    /// The symbol table rejected an operation
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Partial linkage hit a contract violation
    #[error(transparent)]
    Linkage(#[from] LinkageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use irlink_core::{Diagnostics, FileEntry, IdSignature, SymbolKind};

    fn empty_file(name: &str) -> IrFile {
        IrFile::new("app", "app", FileEntry::from_source(name, ""))
    }

    #[test]
    fn new_session_has_builtins() {
        let session = LinkSession::new().unwrap();
        assert!(session.table().is_bound(session.builtins().linkage_error_symbol));
        assert!(session.config().is_enabled());
        assert!(!session.is_linked());
    }

    #[test]
    fn link_twice_fails() {
        let mut session = LinkSession::new().unwrap();
        session.add_file(empty_file("a.kt")).unwrap();
        let mut diagnostics = Diagnostics::new();

        session.link(&mut diagnostics).unwrap();

        assert!(session.is_linked());
        assert_eq!(session.link(&mut diagnostics), Err(SessionError::AlreadyLinked));
        assert_eq!(session.add_file(empty_file("b.kt")), Err(SessionError::AlreadyLinked));
    }

    #[test]
    fn link_binds_stubs() {
        let mut session = LinkSession::new().unwrap();
        let missing = session
            .table_mut()
            .declare(SymbolKind::Class, IdSignature::common("lib", "Missing"));

        let output = session.link(&mut Diagnostics::new()).unwrap();

        assert_eq!(output.stubs_generated, 1);
        assert!(session.table().is_bound(missing));
    }

    #[test]
    fn disabled_session_leaves_table_alone() {
        let mut session = LinkSession::with_config(PartialLinkageConfig::disabled()).unwrap();
        let missing = session
            .table_mut()
            .declare(SymbolKind::Class, IdSignature::common("lib", "Missing"));

        let output = session.link(&mut Diagnostics::new()).unwrap();

        assert_eq!(output, LinkageOutput::default());
        assert!(!session.table().is_bound(missing));
    }

    #[test]
    fn error_display() {
        assert_eq!(SessionError::AlreadyLinked.to_string(), "Session has already been linked");
    }
}
