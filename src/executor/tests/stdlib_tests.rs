//! Tests for the importable stdlib modules

use super::super::*;
use super::helpers::{dumped_text, parse_script_and_build_vm};

const ALL: &[&str] = &["math", "text", "list", "time"];

fn eval(source: &str) -> Val {
    let (mut vm, _) = parse_script_and_build_vm(source, ALL);
    run_until_done(&mut vm);
    match vm.control {
        Control::Return(v) => v,
        other => panic!("Expected Control::Return, got {:?}", other),
    }
}

/// Run `call` inside try/catch and return the caught `code: message`
fn caught(call: &str) -> String {
    let source = format!(
        "try {{\n{}\n}} catch (e) {{\nreturn e.code + \": \" + e.message\n}}\nreturn \"no error\"",
        call
    );
    match eval(&source) {
        Val::Str(s) => s,
        other => panic!("Expected a string, got {:?}", other),
    }
}

/* ===================== math ===================== */

#[test]
fn test_math_functions() {
    assert_eq!(eval("return math.floor(2.7)"), Val::Num(2.0));
    assert_eq!(eval("return math.ceil(2.1)"), Val::Num(3.0));
    assert_eq!(eval("return math.abs(-4)"), Val::Num(4.0));
    assert_eq!(eval("return math.round(2.5)"), Val::Num(3.0));
    assert_eq!(eval("return math.sqrt(16)"), Val::Num(4.0));
    assert_eq!(eval("return math.pow(2, 10)"), Val::Num(1024.0));
    assert_eq!(eval("return math.min(3, 1, 2)"), Val::Num(1.0));
    assert_eq!(eval("return math.max(3, 1, 2)"), Val::Num(3.0));
}

#[test]
fn test_math_argument_errors() {
    assert_eq!(
        caught("math.floor('x')"),
        "WrongArgumentType: Argument 1 must be a number, got string"
    );
    assert_eq!(
        caught("math.pow(2)"),
        "WrongArgumentCount: Expected 2 arguments, got 1"
    );
    assert_eq!(
        caught("math.max()"),
        "WrongArgumentCount: Expected at least 1 argument, got 0"
    );
}

/* ===================== text ===================== */

#[test]
fn test_text_functions() {
    assert_eq!(eval("return text.upper('abc')"), Val::from("ABC"));
    assert_eq!(eval("return text.lower('ABC')"), Val::from("abc"));
    assert_eq!(eval("return text.trim('  x ')"), Val::from("x"));
    assert_eq!(eval("return text.contains('cauldron', 'ul')"), Val::Bool(true));
    assert_eq!(eval("return text.repeat('ab', 3)"), Val::from("ababab"));
    assert_eq!(eval("return text.len('héllo')"), Val::Num(5.0));
}

#[test]
fn test_text_split_and_join() {
    assert_eq!(
        eval("return text.split('a,b,,c', ',')"),
        Val::List(vec![
            Val::from("a"),
            Val::from("b"),
            Val::from(""),
            Val::from("c")
        ])
    );
    assert_eq!(
        eval("return text.split('ab', '')"),
        Val::List(vec![Val::from("a"), Val::from("b")])
    );
    assert_eq!(
        eval("return text.join([1, 'two', true], '-')"),
        Val::from("1-two-true")
    );
}

#[test]
fn test_text_repeat_rejects_fractional_count() {
    assert_eq!(
        caught("text.repeat('a', 1.5)"),
        "WrongArgumentType: Argument 2 must be a non-negative whole number, got 1.5"
    );
}

/* ===================== list ===================== */

#[test]
fn test_list_functions() {
    assert_eq!(eval("return list.len([1, 2, 3])"), Val::Num(3.0));
    assert_eq!(
        eval("return list.range(3)"),
        Val::List(vec![Val::Num(0.0), Val::Num(1.0), Val::Num(2.0)])
    );
    assert_eq!(
        eval("return list.range(2, 4)"),
        Val::List(vec![Val::Num(2.0), Val::Num(3.0)])
    );
    assert_eq!(
        eval("return list.reverse([1, 2])"),
        Val::List(vec![Val::Num(2.0), Val::Num(1.0)])
    );
}

#[test]
fn test_list_push_returns_copy() {
    let source = r#"
const xs = [1]
const ys = list.push(xs, 2)
return [xs, ys]
"#;
    assert_eq!(
        eval(source),
        Val::List(vec![
            Val::List(vec![Val::Num(1.0)]),
            Val::List(vec![Val::Num(1.0), Val::Num(2.0)])
        ])
    );
}

#[test]
fn test_list_argument_type_error() {
    assert_eq!(
        caught("list.len('abc')"),
        "WrongArgumentType: Argument 1 must be a list, got string"
    );
}

/* ===================== time ===================== */

#[test]
fn test_time_now_is_rfc3339() {
    let Val::Str(now) = eval("return time.now()") else {
        panic!("time.now() should return a string");
    };
    assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok(), "{}", now);
    assert!(now.ends_with('Z'));
}

#[test]
fn test_time_sleep_returns_null() {
    assert_eq!(eval("return time.sleep(1)"), Val::Null);
}

/* ===================== Cauldron ===================== */

#[test]
fn test_dump_requires_one_argument() {
    assert_eq!(
        caught("Cauldron.dump(1, 2)"),
        "WrongArgumentCount: Expected 1 argument, got 2"
    );
}

#[test]
fn test_dump_returns_null() {
    let (mut vm, dumps) = parse_script_and_build_vm("return Cauldron.dump('x')", &[]);
    run_until_done(&mut vm);
    assert_eq!(vm.control, Control::Return(Val::Null));
    assert_eq!(dumped_text(&dumps), vec!["x"]);
}

#[test]
fn test_functions_are_values() {
    let source = r#"
const f = math.abs
return [f(-1), f]
"#;
    assert_eq!(
        eval(source),
        Val::List(vec![
            Val::Num(1.0),
            Val::NativeFunc(StdlibFunc::MathAbs)
        ])
    );
}

#[test]
fn test_stdlib_globals_follow_imports() {
    let globals = stdlib::globals(&["text".to_string(), "bogus".to_string(), "text".to_string()]);
    let names: Vec<_> = globals.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Cauldron", "text"]);
    assert_eq!(StdlibFunc::TextSplit.name(), "text.split");
    assert_eq!(StdlibFunc::Dump.name(), "Cauldron.dump");
}
