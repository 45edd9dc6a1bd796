//! Source locations of patched elements.

use irlink_core::{DeclarationParent, FileId, Location, Span, SymbolId};
use irlink_registry::SymbolTable;

/// Location of `span` in `file`: `"<module> @ <path>"` with 1-based line and
/// column, or without coordinates when the span is undefined.
///
/// `None` when there is no file.
pub fn location_in(table: &SymbolTable, file: Option<FileId>, span: Span) -> Option<Location> {
    let file = table.file(file?)?;
    let path = format!("{} @ {}", file.module_name, file.entry.name);
    if span.is_undefined() {
        return Some(Location::new(path, None, None));
    }
    Some(Location::new(
        path,
        Some(file.entry.line_number(span.start) + 1),
        Some(file.entry.column_number(span.start) + 1),
    ))
}

/// Location of a declaration in its own file.
pub fn declaration_location(table: &SymbolTable, symbol: SymbolId) -> Option<Location> {
    location_in(table, table.file_of(symbol), denotable_span(table, symbol))
}

/// Span of the nearest declaration, starting at `symbol`, that exists in the
/// source. Declarations synthesized by partial linkage defer to their parent.
fn denotable_span(table: &SymbolTable, symbol: SymbolId) -> Span {
    let mut current = symbol;
    for _ in 0..=table.symbol_count() {
        let Some(declaration) = table.declaration(current) else {
            return Span::UNDEFINED;
        };
        if !declaration.origin.is_partially_linked() {
            return declaration.span;
        }
        match declaration.parent {
            DeclarationParent::Declaration(parent) => current = parent,
            DeclarationParent::File(_) | DeclarationParent::ExternalFragment(_) => {
                return Span::UNDEFINED;
            }
        }
    }
    Span::UNDEFINED
}
