//! Rendering of linkage error messages.
//!
//! Messages read `"<element> uses unlinked symbols[: <symbol>, ...]"`, where
//! the element is the patched declaration or expression and the symbols are
//! rendered by signature when they have one.

use irlink_core::{
    ClassKind, DeclarationOrigin, Expr, ExprKind, MemberAccessKind, SymbolId, TypeOperator,
};
use irlink_registry::SymbolTable;

use crate::stub_generator::UNKNOWN_NAME;

/// `"<element> uses unlinked symbols[: ...]"`.
pub fn unlinked_symbols_message(element: &str, table: &SymbolTable, symbols: &[SymbolId]) -> String {
    let mut message = capitalize(element);
    message.push_str(" uses unlinked symbols");
    if !symbols.is_empty() {
        message.push_str(": ");
        let rendered: Vec<String> = symbols.iter().map(|&symbol| symbol_reference(table, symbol)).collect();
        message.push_str(&rendered.join(", "));
    }
    message
}

/// `"Abstract <function> is not implemented in non-abstract <class>"`.
pub fn abstract_not_implemented_message(table: &SymbolTable, function: SymbolId) -> String {
    let class = table
        .parent_class(function)
        .map(|class| declaration(table, class))
        .unwrap_or_else(|| format!("class '{}'", UNKNOWN_NAME));
    format!(
        "Abstract {} is not implemented in non-abstract {}",
        declaration(table, function),
        class
    )
}

/// `"<kind> '<name>'"`, e.g. `function 'Foo.bar'`.
pub fn declaration(table: &SymbolTable, symbol: SymbolId) -> String {
    format!("{} '{}'", kind_name(table, symbol), display_name(table, symbol))
}

/// Describes an expression for a message, e.g. `Call of function 'Foo.bar'`.
pub fn expression(table: &SymbolTable, expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::MemberAccess(access) => {
            let label = match access.access {
                MemberAccessKind::Call => "Call",
                MemberAccessKind::ConstructorCall => "Constructor call",
                MemberAccessKind::DelegatingConstructorCall => "Delegating constructor call",
                MemberAccessKind::FunctionReference | MemberAccessKind::PropertyReference => {
                    "Reference"
                }
            };
            format!("{} of {}", label, declaration(table, access.symbol))
        }
        ExprKind::GetField { symbol, .. } => format!("Read of {}", declaration(table, *symbol)),
        ExprKind::SetField { symbol, .. } => format!("Write of {}", declaration(table, *symbol)),
        ExprKind::ClassReference { symbol } => format!("Reference of {}", declaration(table, *symbol)),
        ExprKind::TypeOperator(call) => {
            let label = match call.operator {
                TypeOperator::Cast | TypeOperator::ImplicitCast | TypeOperator::SafeCast => "Cast to",
                TypeOperator::InstanceOf | TypeOperator::NotInstanceOf => "Type check against",
            };
            match call.type_operand_classifier() {
                Some(classifier) => format!("{} '{}'", label, display_name(table, classifier)),
                None => "Type operator".to_owned(),
            }
        }
        _ => "Expression".to_owned(),
    }
}

/// Fully qualified name for messages.
///
/// Stubs and unbound symbols are named after their signature, which still
/// carries the path the referencing module expected.
pub fn display_name(table: &SymbolTable, symbol: SymbolId) -> String {
    let stubbed = table
        .declaration(symbol)
        .is_none_or(|declaration| declaration.origin == DeclarationOrigin::MissingDeclaration);
    if stubbed {
        let from_signature = table
            .signature(symbol)
            .and_then(|signature| signature.declaration_fq_name())
            .filter(|name| !name.is_empty());
        if let Some(name) = from_signature {
            return name.to_owned();
        }
    }
    table
        .fq_name(symbol)
        .unwrap_or_else(|| UNKNOWN_NAME.to_owned())
}

fn symbol_reference(table: &SymbolTable, symbol: SymbolId) -> String {
    match table.signature(symbol) {
        Some(signature) => signature.render(),
        None => declaration(table, symbol),
    }
}

fn kind_name(table: &SymbolTable, symbol: SymbolId) -> String {
    if let Some(class) = table.class(symbol) {
        let name = match class.class_kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Object => "object",
            ClassKind::EnumClass => "enum class",
        };
        return name.to_owned();
    }
    table
        .kind(symbol)
        .map(|kind| kind.to_string())
        .unwrap_or_else(|| "symbol".to_owned())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use irlink_core::{FunctionDecl, IdSignature, SymbolKind};

    #[test]
    fn declaration_and_messages() {
        let mut fx = Fixture::new();
        let foo = fx.class("Foo", vec![]);
        let unit = fx.builtins.unit_type();
        let run = fx.function(
            "run",
            Some(foo),
            IdSignature::member("app", "Foo.run", &[]),
            FunctionDecl::new(unit),
        );
        let missing = fx.unbound_class("Missing");

        assert_eq!(declaration(&fx.table, run), "function 'Foo.run'");
        assert_eq!(
            unlinked_symbols_message(&declaration(&fx.table, run), &fx.table, &[missing]),
            "Function 'Foo.run' uses unlinked symbols: lib/Missing|null[0]"
        );
        assert_eq!(
            unlinked_symbols_message("class 'Foo'", &fx.table, &[]),
            "Class 'Foo' uses unlinked symbols"
        );
        assert_eq!(
            abstract_not_implemented_message(&fx.table, run),
            "Abstract function 'Foo.run' is not implemented in non-abstract class 'Foo'"
        );
    }

    #[test]
    fn unbound_callee_is_named_by_signature() {
        let mut fx = Fixture::new();
        let bar = fx
            .table
            .declare(SymbolKind::Function, IdSignature::member("lib", "Foo.bar", &[]));
        let call = Expr::call(bar, fx.builtins.unit_type());

        assert_eq!(expression(&fx.table, &call), "Call of function 'Foo.bar'");
    }

    #[test]
    fn expression_labels() {
        let mut fx = Fixture::new();
        let foo = fx.class("Foo", vec![]);
        let any = fx.builtins.any_type();

        let check = Expr::type_operator(
            TypeOperator::InstanceOf,
            irlink_core::IrType::simple(foo),
            Expr::get_value("x", any.clone()),
            any.clone(),
        );
        assert_eq!(expression(&fx.table, &check), "Type check against 'Foo'");
        assert_eq!(
            expression(&fx.table, &Expr::class_reference(foo, any.clone())),
            "Reference of class 'Foo'"
        );
        assert_eq!(expression(&fx.table, &Expr::int(1, any)), "Expression");
    }
}
