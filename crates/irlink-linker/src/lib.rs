//! Partial linkage engine.
//!
//! Modules compiled against an older version of a library may refer to
//! declarations that no longer exist or changed shape. Instead of failing the
//! link, this crate lets it complete:
//!
//! - [`MissingDeclarationStubGenerator`] binds every unbound symbol to a stub
//!   declaration.
//! - [`ClassifierExplorer`] decides which classes and type parameters are
//!   partially linked.
//! - [`TreePatcher`] rewrites every usage of an unlinked symbol into a call of
//!   the runtime linkage-error intrinsic and reports it as a warning.
//!
//! [`PartialLinkageSupport`] ties these together for a link pipeline; obtain
//! one with [`create_partial_linkage_support`].

mod config;
mod error;
mod explorer;
mod fake_override;
mod location;
mod marker;
mod patcher;
mod render;
mod stub_generator;
mod support;

#[cfg(test)]
mod test_support;

pub use config::{PartialLinkageConfig, PartialLinkageMode};
pub use error::LinkageError;
pub use explorer::ClassifierExplorer;
pub use fake_override::FakeOverrideBuilder;
pub use marker::MarkerTypeHandler;
pub use patcher::{PatchOutput, TreePatcher};
pub use stub_generator::{INIT_NAME, MissingDeclarationStubGenerator, UNKNOWN_NAME, guess_name};
pub use support::{
    DisabledPartialLinkageSupport, LinkageOutput, PartialLinkageSupport, PartialLinkageSupportImpl,
    RootsSupplier, create_partial_linkage_support,
};
