//! irlink - partial linkage for separately compiled IR modules.
//!
//! When a module is relinked against a newer version of a library that
//! dropped or changed declarations, irlink lets the link complete. Usages of
//! the missing pieces are rewritten into runtime linkage errors and reported
//! as warnings; everything else keeps working.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`ir`]: declaration, type and expression model
//! - [`registry`]: the symbol table and built-ins
//! - [`linker`]: the partial linkage engine
//!
//! [`LinkSession`] drives a whole link.

pub use irlink_core as ir;
pub use irlink_linker as linker;
pub use irlink_registry as registry;

mod session;

pub use session::{LinkSession, SessionError};

// Re-export main types
pub mod prelude {
    pub use crate::session::{LinkSession, SessionError};
    pub use irlink_core::{
        Body, ClassDecl, ClassKind, Declaration, DeclarationKind, DeclarationOrigin, DeclarationParent,
        Diagnostics, Expr, FieldDecl, FileEntry, FileId, FunctionDecl, IdSignature, IrFile, IrType,
        MessageLogger, Modality, RootElement, Severity, Statement, SymbolId, SymbolKind, ValueParameter,
        Variable, Visibility,
    };
    pub use irlink_linker::{
        FakeOverrideBuilder, LinkageError, LinkageOutput, PartialLinkageConfig, PartialLinkageMode,
        PartialLinkageSupport, PatchOutput, create_partial_linkage_support,
    };
    pub use irlink_registry::{IrBuiltIns, RegistryError, SymbolTable};
}
