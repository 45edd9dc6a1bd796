//! Registry errors.

use irlink_core::{SymbolId, SymbolKind};
use thiserror::Error;

/// Errors from binding declarations to symbols.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The symbol already has a declaration.
    #[error("symbol {symbol:?} is already bound")]
    AlreadyBound { symbol: SymbolId },

    /// The declaration kind does not match the symbol kind.
    #[error("cannot bind a {found} declaration to {expected} symbol {symbol:?}")]
    KindMismatch {
        symbol: SymbolId,
        expected: SymbolKind,
        found: SymbolKind,
    },

    /// The declaration names a different symbol than the one it is bound to.
    #[error("declaration of {declared:?} cannot be bound to symbol {symbol:?}")]
    SymbolMismatch { symbol: SymbolId, declared: SymbolId },

    /// No such symbol in this table.
    #[error("unknown symbol {symbol:?}")]
    UnknownSymbol { symbol: SymbolId },
}
