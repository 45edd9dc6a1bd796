//! irlink core model.
//!
//! The declaration, type and expression model consumed by the partial linkage
//! engine. Everything here is plain data: storage and binding of symbols lives
//! in `irlink-registry`, the rewriting passes live in `irlink-linker`.
//!
//! ## Modules
//!
//! - [`signature`]: Cross-module [`IdSignature`]s and deterministic [`SignatureHash`]es
//! - [`symbol`]: Opaque handles ([`SymbolId`], [`FileId`], [`FragmentId`]) and [`SymbolKind`]
//! - [`declarations`]: [`Declaration`] and its per-kind payloads
//! - [`types`]: [`IrType`] including the identity-compared [`MarkerType`]
//! - [`expr`]: Expressions, statements and bodies
//! - [`file`]: Files, file entries and synthetic package fragments
//! - [`span`]: Byte-offset source spans
//! - [`diagnostics`]: The [`MessageLogger`] sink and a collecting implementation

pub mod declarations;
pub mod diagnostics;
pub mod expr;
pub mod file;
pub mod signature;
pub mod span;
pub mod symbol;
pub mod types;
mod visibility;

pub use declarations::{
    ClassDecl, ClassKind, Declaration, DeclarationKind, DeclarationOrigin, DeclarationParent,
    FieldDecl, FunctionDecl, FunctionFlags, InitializerDecl, Modality, PropertyDecl,
    TypeParameterDecl, ValueParameter,
};
pub use diagnostics::{Diagnostic, Diagnostics, Location, MessageLogger, Severity, TracingMessageLogger};
pub use expr::{
    Body, ConstValue, Expr, ExprKind, MemberAccess, MemberAccessKind, Statement, StatementOrigin,
    TypeOperator, TypeOperatorCall, Variable, WhenBranch,
};
pub use file::{ExternalPackageFragment, FileEntry, IrFile};
pub use signature::{CommonSignature, IdSignature, SignatureHash};
pub use span::Span;
pub use symbol::{FileId, FragmentId, RootElement, SymbolId, SymbolKind};
pub use types::{IrType, MarkerType, SimpleType, TypeArgument, Variance};
pub use visibility::Visibility;
