//! Tests for runtime errors the validator does not (or cannot) rule out

use super::super::*;
use super::helpers::{dumped_text, parse_script_and_build_vm, parse_script_without_validation};
use crate::executor::errors;

/// Run unvalidated source and return the escaped throw
fn run_to_fault(source: &str) -> (VM, ErrorInfo) {
    let (mut vm, _) = parse_script_without_validation(source, &[]);
    run_until_done(&mut vm);
    let info = match &vm.control {
        Control::Throw(Val::Error(info)) => info.clone(),
        other => panic!("Expected an uncaught error, got {:?}", other),
    };
    (vm, info)
}

#[test]
fn test_undefined_variable() {
    let (_, err) = run_to_fault("return missing + 1");
    assert_eq!(err.code, errors::UNDEFINED_VARIABLE);
    assert!(err.message.contains("missing"), "{}", err.message);
}

#[test]
fn test_assignment_to_undeclared_variable() {
    let (_, err) = run_to_fault("ghost = 1");
    assert_eq!(err.code, errors::UNDEFINED_VARIABLE);
    assert_eq!(err.message, "Assignment to undeclared variable 'ghost'");
}

#[test]
fn test_const_reassignment() {
    let (_, err) = run_to_fault("const x = 1\nx = 2");
    assert_eq!(err.code, errors::CONST_ASSIGNMENT);
}

#[test]
fn test_division_by_zero() {
    let (_, err) = run_to_fault("let a = 0\nreturn 10 / a");
    assert_eq!(err.code, errors::DIVISION_BY_ZERO);
    assert_eq!(err.message, "Division by zero");

    let (_, err) = run_to_fault("return 10 % 0");
    assert_eq!(err.code, errors::DIVISION_BY_ZERO);
}

#[test]
fn test_property_not_found() {
    let (_, err) = run_to_fault("const o = {a: 1}\nreturn o.b");
    assert_eq!(err.code, errors::PROPERTY_NOT_FOUND);
    assert_eq!(err.message, "Property 'b' not found");
}

#[test]
fn test_property_on_scalar_is_type_error() {
    let (_, err) = run_to_fault("return (5).size");
    assert_eq!(err.code, errors::TYPE_ERROR);
}

#[test]
fn test_index_out_of_range() {
    let (_, err) = run_to_fault("const xs = [1]\nreturn xs[3]");
    assert_eq!(err.code, errors::INDEX_OUT_OF_RANGE);
}

#[test]
fn test_comparison_type_error() {
    let (_, err) = run_to_fault("return 1 < 'a'");
    assert_eq!(err.code, errors::TYPE_ERROR);
    assert!(err.message.starts_with("Operator '<' cannot be applied"), "{}", err.message);
}

#[test]
fn test_calling_a_non_function() {
    let (_, err) = run_to_fault("const n = 3\nn()");
    assert_eq!(err.code, errors::NOT_CALLABLE);
}

#[test]
fn test_iterating_a_number() {
    let (_, err) = run_to_fault("for (const x of 5) {}");
    assert_eq!(err.code, errors::NOT_ITERABLE);
}

#[test]
fn test_unknown_record_and_field() {
    let (_, err) = run_to_fault("return new Nope {}");
    assert_eq!(err.code, errors::UNKNOWN_RECORD);

    let (_, err) = run_to_fault("record P { x }\nreturn new P { y: 1 }");
    assert_eq!(err.code, errors::UNKNOWN_FIELD);
}

#[test]
fn test_break_outside_loop() {
    let (vm, err) = run_to_fault("Cauldron.dump(1)\nbreak");
    assert_eq!(err.code, errors::LOOP_CONTROL);
    assert_eq!(err.message, "'break' outside of a loop");
    assert!(vm.frames.is_empty());
}

#[test]
fn test_fault_stops_later_statements() {
    let source = "Cauldron.dump('before')\nthrow 'stop'\nCauldron.dump('after')";
    let (mut vm, dumps) = parse_script_without_validation(source, &[]);
    run_until_done(&mut vm);

    assert_eq!(vm.control, Control::Throw(Val::from("stop")));
    assert_eq!(dumped_text(&dumps), vec!["before"]);
}

#[test]
fn test_fault_span_points_at_statement() {
    let source = "let ok = 1\n  let bad = ok / 0";
    let (vm, _) = run_to_fault(source);

    let span = vm.fault_span.expect("fault span");
    assert_eq!(span.start_line, 1);
    assert_eq!(span.start_col, 2);
}

#[test]
fn test_describe_fault() {
    let (vm, _) = run_to_fault("let ok = 1\n  let bad = ok / 0");
    let Control::Throw(thrown) = &vm.control else {
        unreachable!();
    };
    assert_eq!(
        vm.describe_fault(thrown),
        "DivisionByZero: Division by zero (line 2, column 3)"
    );
}

#[test]
fn test_describe_thrown_value() {
    let (mut vm, _) = parse_script_and_build_vm("throw {reason: 'bad'}", &[]);
    run_until_done(&mut vm);

    let Control::Throw(thrown) = &vm.control else {
        panic!("Expected a throw, got {:?}", vm.control);
    };
    assert_eq!(
        vm.describe_fault(thrown),
        r#"Uncaught exception: { reason: "bad" } (line 1, column 1)"#
    );
}

#[test]
fn test_error_values_expose_code_and_message() {
    let source = r#"
try {
    const xs = []
    Cauldron.dump(xs[0])
} catch (e) {
    return [e.code, e.message]
}
"#;
    let (mut vm, _) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);

    let Control::Return(Val::List(parts)) = &vm.control else {
        panic!("Expected a list, got {:?}", vm.control);
    };
    assert_eq!(parts[0], Val::from(errors::INDEX_OUT_OF_RANGE));
}
