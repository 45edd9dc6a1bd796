//! Linkage errors.
//!
//! Unlinked usages are never errors: they are rewritten and reported as
//! warnings. A [`LinkageError`] means the calling pipeline broke a contract of
//! the engine.

use thiserror::Error;

use irlink_core::{SymbolId, SymbolKind};
use irlink_registry::RegistryError;

/// Contract violations surfaced by the partial linkage engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkageError {
    /// No stub can be synthesized for symbols of this kind.
    #[error("generation of stubs for {kind} symbol {symbol:?} is not supported")]
    UnsupportedStubKind { symbol: SymbolId, kind: SymbolKind },

    /// Stubs are only generated for unbound symbols.
    #[error("symbol {symbol:?} is already bound to a declaration")]
    StubForBoundSymbol { symbol: SymbolId },

    /// The symbol table rejected an operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl LinkageError {
    /// The symbol the error is about.
    pub fn symbol(&self) -> SymbolId {
        match self {
            LinkageError::UnsupportedStubKind { symbol, .. }
            | LinkageError::StubForBoundSymbol { symbol } => *symbol,
            LinkageError::Registry(error) => match error {
                RegistryError::AlreadyBound { symbol }
                | RegistryError::KindMismatch { symbol, .. }
                | RegistryError::SymbolMismatch { symbol, .. }
                | RegistryError::UnknownSymbol { symbol } => *symbol,
            },
        }
    }
}
