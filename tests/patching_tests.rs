//! Patching of individual usage kinds across a relink.

mod common;

use common::{Evaluator, Failure, Program, Value, at};
use irlink::ir::TypeOperator;
use irlink::prelude::*;

#[test]
fn operands_of_a_removed_call_run_left_to_right() {
    let mut program = Program::new();
    let unit = program.unit();
    let foo = program.class(program.lib, "Foo", vec![]);
    let constructor = program.constructor(foo);
    let bar = program.method(foo, "bar", unit.clone(), vec![]);
    let a = program.function(program.app, "a", unit.clone(), vec![]);
    let b = program.function(program.app, "b", unit.clone(), vec![]);

    let call = Expr::call(bar, unit.clone())
        .with_dispatch_receiver(Expr::constructor_call(constructor, IrType::simple(foo)))
        .with_argument(Expr::call(a, unit.clone()))
        .with_argument(Expr::call(b, unit.clone()));
    let main = program.function(program.app, "main", unit, vec![call.into()]);
    program.remove(bar);

    program.link();

    let mut evaluator = Evaluator::new(&program);
    assert!(matches!(evaluator.run(main), Err(Failure::Linkage(_))));
    assert_eq!(evaluator.trace, vec!["main", "Foo.<init>", "a", "b"]);
}

#[test]
fn read_of_removed_field() {
    let mut program = Program::new();
    let unit = program.unit();
    let any = program.builtins().any_type();
    let foo = program.class(program.lib, "Foo", vec![]);
    let constructor = program.constructor(foo);
    let size = program.field(foo, "size", any.clone());

    let read = Expr::get_field(size, Some(Expr::constructor_call(constructor, IrType::simple(foo))), any)
        .with_span(at(5, 0));
    let main = program.function(program.app, "main", unit, vec![read.into()]);
    program.remove(size);

    let (_, diagnostics) = program.link();

    let message = "Read of field 'Foo.size' uses unlinked symbols: lib/Foo.size|null[0]";
    assert_eq!(diagnostics.warnings().map(|d| d.message.as_str()).collect::<Vec<_>>(), vec![message]);

    let mut evaluator = Evaluator::new(&program);
    assert_eq!(evaluator.run(main), Err(Failure::Linkage(message.into())));
    assert_eq!(evaluator.trace, vec!["main", "Foo.<init>"]);
}

#[test]
fn removed_class_as_variable_type_and_type_check() {
    let mut program = Program::new();
    let unit = program.unit();
    let any = program.builtins().any_type();
    let gone = program.class(program.lib, "Gone", vec![]);
    let constructor = program.constructor(gone);

    let variable = Variable::new(
        "g",
        IrType::simple(gone),
        Some(Expr::constructor_call(constructor, IrType::simple(gone))),
    )
    .with_span(at(1, 4));
    let check = Expr::type_operator(
        TypeOperator::InstanceOf,
        IrType::simple(gone),
        Expr::get_value("g", any.clone()),
        any,
    );
    let main = program.function(program.app, "main", unit, vec![variable.into(), check.into()]);
    program.remove(constructor);
    program.remove(gone);

    let (output, diagnostics) = program.link();

    assert_eq!(output.stubs_generated, 2);
    assert_eq!(output.patch.variables_patched, 1);
    assert_eq!(output.patch.expressions_rewritten, 1);
    let messages: Vec<_> = diagnostics.warnings().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Variable 'g' uses unlinked symbols: lib/Gone|null[0]",
            "Type check against 'Gone' uses unlinked symbols: lib/Gone|null[0]",
        ]
    );
    let first = diagnostics.warnings().next().unwrap();
    assert_eq!(first.location.as_ref().unwrap().to_string(), "app @ main.kt:2:5");

    // The initializer was dropped, so `Gone()` never runs.
    let mut evaluator = Evaluator::new(&program);
    assert_eq!(
        evaluator.run(main),
        Err(Failure::Linkage(
            "Type check against 'Gone' uses unlinked symbols: lib/Gone|null[0]".into()
        ))
    );
    assert_eq!(evaluator.trace, vec!["main"]);
}

#[test]
fn abstract_member_added_to_library_class() {
    let mut program = Program::new();
    let unit = program.unit();
    let api = program.class(program.lib, "Api", vec![]);
    let implementation = program.class(program.app, "Impl", vec![IrType::simple(api)]);
    let constructor = program.constructor(implementation);
    // What fake override construction leaves behind for an abstract member
    // the client does not implement.
    let run = program.method(implementation, "run", unit.clone(), vec![]);
    program.table_mut().declaration_mut(run).unwrap().origin =
        DeclarationOrigin::UnimplementedAbstractCallableMember;

    let call = Expr::call(run, unit.clone())
        .with_dispatch_receiver(Expr::constructor_call(constructor, IrType::simple(implementation)));
    let main = program.function(program.app, "main", unit, vec![call.into()]);

    let (output, diagnostics) = program.link();

    assert_eq!(output.patch.functions_patched, 1);
    let message = "Abstract function 'Impl.run' is not implemented in non-abstract class 'Impl'";
    assert_eq!(diagnostics.warnings().map(|d| d.message.as_str()).collect::<Vec<_>>(), vec![message]);

    let mut evaluator = Evaluator::new(&program);
    assert_eq!(evaluator.run(main), Err(Failure::Linkage(message.into())));
    assert_eq!(evaluator.trace, vec!["main", "Impl.<init>", "Impl.run"]);
}

#[test]
fn override_of_method_that_became_private_is_dropped() {
    let mut program = Program::new();
    let unit = program.unit();
    let base = program.class(program.lib, "Base", vec![]);
    let hook = program.method(base, "hook", unit.clone(), vec![]);
    let derived = program.class(program.app, "Derived", vec![IrType::simple(base)]);
    let override_hook = program.method(derived, "hook", unit, vec![]);
    program
        .table_mut()
        .function_mut(override_hook)
        .unwrap()
        .overridden_symbols
        .push(hook);

    // The library made `Base.hook` private.
    program.table_mut().declaration_mut(hook).unwrap().visibility = Visibility::Private;

    let (output, diagnostics) = program.link();

    assert!(diagnostics.is_empty());
    assert_eq!(output.patch.overridden_symbols_dropped, 1);
    assert!(
        program
            .table()
            .function(override_hook)
            .unwrap()
            .overridden_symbols
            .is_empty()
    );
}

#[test]
fn override_of_removed_method_is_dropped() {
    let mut program = Program::new();
    let unit = program.unit();
    let base = program.class(program.lib, "Base", vec![]);
    let hook = program.method(base, "hook", unit.clone(), vec![]);
    let kept = program.method(base, "kept", unit.clone(), vec![]);
    let derived = program.class(program.app, "Derived", vec![IrType::simple(base)]);
    let override_hook = program.method(derived, "hook", unit, vec![]);
    let overridden = &mut program.table_mut().function_mut(override_hook).unwrap().overridden_symbols;
    overridden.push(hook);
    overridden.push(kept);
    program.remove(hook);

    let (output, diagnostics) = program.link();

    // `Base.hook` is bound to a stub by now; the override must not point at it.
    assert_eq!(
        program.table().declaration(hook).unwrap().origin,
        DeclarationOrigin::MissingDeclaration
    );
    assert_eq!(output.patch.overridden_symbols_dropped, 1);
    assert_eq!(
        program.table().function(override_hook).unwrap().overridden_symbols,
        vec![kept]
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn function_with_removed_parameter_type() {
    let mut program = Program::new();
    let unit = program.unit();
    let gone = program.class(program.lib, "Gone", vec![]);
    let a = program.function(program.app, "a", unit.clone(), vec![]);
    let take = program.function(program.app, "take", unit.clone(), vec![]);
    program
        .table_mut()
        .function_mut(take)
        .unwrap()
        .value_parameters
        .push(ValueParameter::new("value", IrType::simple(gone)));

    let call = Expr::call(take, unit.clone()).with_argument(Expr::call(a, unit.clone()));
    let main = program.function(program.app, "main", unit, vec![call.into()]);
    program.remove(gone);

    let (output, diagnostics) = program.link();

    assert_eq!(output.patch.functions_patched, 1);
    assert_eq!(output.patch.expressions_rewritten, 1);
    let messages: Vec<_> = diagnostics.warnings().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Function 'take' uses unlinked symbols: lib/Gone|null[0]",
            "Call of function 'take' uses unlinked symbols",
        ]
    );

    let mut evaluator = Evaluator::new(&program);
    assert!(evaluator.run(main).is_err());
    assert_eq!(evaluator.trace, vec!["main", "a"]);
}

#[test]
fn untouched_paths_keep_their_values() {
    let mut program = Program::new();
    let any = program.builtins().any_type();
    let unit = program.unit();
    let gone = program.class(program.lib, "Gone", vec![]);
    let answer = program.function(
        program.app,
        "answer",
        any.clone(),
        vec![
            Variable::new("x", any.clone(), Some(Expr::int(42, any.clone()))).into(),
            Expr::get_value("x", any.clone()).into(),
        ],
    );
    program.function(
        program.app,
        "broken",
        unit,
        vec![Expr::class_reference(gone, any).into()],
    );
    program.remove(gone);

    let (_, diagnostics) = program.link();

    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(Evaluator::new(&program).run(answer), Ok(Value::Int(42)));
}
