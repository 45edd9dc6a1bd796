//! irlink registry crate.
//!
//! Holds the [`SymbolTable`], the single store of symbols, declarations,
//! files and package fragments for one link, and the [`IrBuiltIns`] every
//! pass needs (root class, bottom type, the linkage-error intrinsic).

mod builtins;
mod error;
mod table;

pub use builtins::IrBuiltIns;
pub use error::RegistryError;
pub use table::SymbolTable;
