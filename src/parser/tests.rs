//! Parser tests - verify parsing and AST structure
//!
//! These tests do NOT execute the code; that's covered by the executor tests.

use super::*;
use crate::executor::types::ast::{BinaryOp, Expr, ForLoopKind, MemberAccess, Stmt, UnaryOp};

/// Parse and return the single top-level statement
fn parse_one(source: &str) -> Stmt {
    match parse(source).expect("Should parse") {
        Stmt::Block { mut body, .. } => {
            assert_eq!(body.len(), 1, "expected one statement in {:?}", body);
            body.remove(0)
        }
        other => panic!("Expected top-level block, got {:?}", other),
    }
}

/// Parse `source` as the expression of a single expression statement
fn parse_expr(source: &str) -> Expr {
    match parse_one(source) {
        Stmt::Expr { expr, .. } => expr,
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

/* ===================== Statements ===================== */

#[test]
fn test_parse_empty_script() {
    let script = parse_script("").expect("Should parse");
    assert!(script.records.is_empty());
    assert!(matches!(script.body, Stmt::Block { ref body, .. } if body.is_empty()));
}

#[test]
fn test_parse_declarations() {
    match parse_one("let answer = 42") {
        Stmt::Declare {
            var_kind: VarKind::Let,
            name,
            init: Some(Expr::LitNum { v, .. }),
            ..
        } => {
            assert_eq!(name, "answer");
            assert_eq!(v, 42.0);
        }
        other => panic!("Expected let declaration, got {:?}", other),
    }

    assert!(matches!(
        parse_one("const name = 'cauldron'"),
        Stmt::Declare {
            var_kind: VarKind::Const,
            ..
        }
    ));
}

#[test]
fn test_parse_const_requires_initializer() {
    let err = parse("const x").unwrap_err();
    assert!(matches!(err, ParseError::BuildError(..)));
    assert!(err.message().contains("'x'"));
}

#[test]
fn test_parse_semicolons_optional() {
    let with = parse("let a = 1; let b = 2;").unwrap();
    let without = parse("let a = 1\nlet b = 2").unwrap();

    let count = |stmt: &Stmt| match stmt {
        Stmt::Block { body, .. } => body.len(),
        _ => 0,
    };
    assert_eq!(count(&with), 2);
    assert_eq!(count(&without), 2);
}

#[test]
fn test_parse_keyword_prefixed_identifiers() {
    // `letter`, `returned` and `newValue` are identifiers, not keywords
    let ast = parse("letter = returned + newValue").unwrap();
    let Stmt::Block { body, .. } = ast else {
        panic!("Expected block");
    };
    match &body[0] {
        Stmt::Assign { var, value, .. } => {
            assert_eq!(var, "letter");
            assert!(matches!(value, Expr::BinaryOp { op: BinaryOp::Add, .. }));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_assignment_path() {
    match parse_one("grid[0].cells[i + 1] = 'x'") {
        Stmt::Assign { var, path, .. } => {
            assert_eq!(var, "grid");
            assert_eq!(path.len(), 3);
            assert!(matches!(path[0], MemberAccess::Index { .. }));
            assert!(matches!(&path[1], MemberAccess::Prop { property, .. } if property == "cells"));
            assert!(matches!(path[2], MemberAccess::Index { .. }));
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else() {
    match parse_one("if (a) { b() } else if (c) { d() } else { e() }") {
        Stmt::If {
            else_s: Some(else_s),
            ..
        } => assert!(matches!(*else_s, Stmt::If { else_s: Some(_), .. })),
        other => panic!("Expected if/else chain, got {:?}", other),
    }
}

#[test]
fn test_parse_for_loops() {
    match parse_one("for (let x of items) { Cauldron.dump(x) }") {
        Stmt::ForLoop {
            kind, binding, ..
        } => {
            assert_eq!(kind, ForLoopKind::Of);
            assert_eq!(binding, "x");
        }
        other => panic!("Expected for-of, got {:?}", other),
    }

    assert!(matches!(
        parse_one("for (const key in obj) {}"),
        Stmt::ForLoop {
            kind: ForLoopKind::In,
            var_kind: VarKind::Const,
            ..
        }
    ));
}

#[test]
fn test_parse_control_statements() {
    let ast = parse("while (true) { break; continue }\nreturn\nthrow 'oops'").unwrap();
    let Stmt::Block { body, .. } = ast else {
        panic!("Expected block");
    };
    assert!(matches!(body[0], Stmt::While { .. }));
    assert!(matches!(body[1], Stmt::Return { value: None, .. }));
    assert!(matches!(body[2], Stmt::Throw { .. }));
}

#[test]
fn test_parse_try_catch() {
    match parse_one("try { risky() } catch (err) { Cauldron.dump(err) }") {
        Stmt::Try { catch_var, .. } => assert_eq!(catch_var, "err"),
        other => panic!("Expected try/catch, got {:?}", other),
    }
}

/* ===================== Expressions ===================== */

#[test]
fn test_parse_precedence() {
    // 1 + 2 * 3 == 7 && !done
    match parse_expr("1 + 2 * 3 == 7 && !done") {
        Expr::BinaryOp {
            op: BinaryOp::And,
            left,
            right,
            ..
        } => {
            match *left {
                Expr::BinaryOp {
                    op: BinaryOp::Eq,
                    left: sum,
                    ..
                } => assert!(matches!(
                    *sum,
                    Expr::BinaryOp { op: BinaryOp::Add, ref right, .. }
                        if matches!(**right, Expr::BinaryOp { op: BinaryOp::Mul, .. })
                )),
                other => panic!("Expected equality, got {:?}", other),
            }
            assert!(matches!(*right, Expr::UnaryOp { op: UnaryOp::Not, .. }));
        }
        other => panic!("Expected &&, got {:?}", other),
    }
}

#[test]
fn test_parse_left_associative() {
    // (10 - 3) - 2
    match parse_expr("10 - 3 - 2") {
        Expr::BinaryOp {
            op: BinaryOp::Sub,
            left,
            right,
            ..
        } => {
            assert!(matches!(*left, Expr::BinaryOp { op: BinaryOp::Sub, .. }));
            assert!(matches!(*right, Expr::LitNum { v, .. } if v == 2.0));
        }
        other => panic!("Expected subtraction, got {:?}", other),
    }
}

#[test]
fn test_parse_ternary_and_nullish() {
    match parse_expr("a ?? b ? 1 : -1") {
        Expr::Ternary {
            condition,
            alternate,
            ..
        } => {
            assert!(matches!(*condition, Expr::BinaryOp { op: BinaryOp::Nullish, .. }));
            assert!(matches!(*alternate, Expr::UnaryOp { op: UnaryOp::Neg, .. }));
        }
        other => panic!("Expected ternary, got {:?}", other),
    }
}

#[test]
fn test_parse_postfix_chain() {
    match parse_expr("text.split(line, ',')[0]") {
        Expr::Index { object, index, .. } => {
            assert!(matches!(*index, Expr::LitNum { v, .. } if v == 0.0));
            match *object {
                Expr::Call { callee, args, .. } => {
                    assert_eq!(args.len(), 2);
                    assert!(matches!(*callee, Expr::Member { ref property, .. } if property == "split"));
                }
                other => panic!("Expected call, got {:?}", other),
            }
        }
        other => panic!("Expected index, got {:?}", other),
    }
}

#[test]
fn test_parse_literals() {
    match parse_expr(r#"[1, "two\n", true, null, {a: 1, "b c": 2, d}]"#) {
        Expr::LitList { elements, .. } => {
            assert_eq!(elements.len(), 5);
            assert!(matches!(&elements[1], Expr::LitStr { v, .. } if v == "two\n"));
            match &elements[4] {
                Expr::LitObj { properties, .. } => {
                    let keys: Vec<_> = properties.iter().map(|(k, _, _)| k.as_str()).collect();
                    assert_eq!(keys, vec!["a", "b c", "d"]);
                    assert!(matches!(&properties[2].2, Expr::Ident { name, .. } if name == "d"));
                }
                other => panic!("Expected object, got {:?}", other),
            }
        }
        other => panic!("Expected list, got {:?}", other),
    }
}

#[test]
fn test_parse_new_record() {
    match parse_expr("new Person { name: 'Ada', age: 36 }") {
        Expr::New { record, fields, .. } => {
            assert_eq!(record, "Person");
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[1].0, "age");
        }
        other => panic!("Expected new, got {:?}", other),
    }
}

#[test]
fn test_parse_comments_ignored() {
    let ast = parse("// leading\nlet a = 1 /* inline */ + 2\n// trailing").unwrap();
    let Stmt::Block { body, .. } = ast else {
        panic!("Expected block");
    };
    assert_eq!(body.len(), 1);
}

/* ===================== Records ===================== */

#[test]
fn test_parse_record_declaration() {
    let script = parse_script(
        r#"
record Person {
    name,
    age as "Age (years)",
    hidden secret,
}
Cauldron.dump(1)
"#,
    )
    .expect("Should parse");

    assert_eq!(script.records.len(), 1);
    let person = script.record("Person").unwrap();
    assert_eq!(person.fields.len(), 3);
    assert_eq!(person.fields[1].display_name.as_deref(), Some("Age (years)"));
    assert!(!person.fields[1].hidden);
    assert!(person.fields[2].hidden);
    assert_eq!(person.fields[2].name, "secret");
}

#[test]
fn test_parse_hidden_prefixed_field_is_plain() {
    let script = parse_script("record R { hiddenValue }").unwrap();
    let field = &script.records[0].fields[0];
    assert_eq!(field.name, "hiddenValue");
    assert!(!field.hidden);
}

/* ===================== Spans and Errors ===================== */

#[test]
fn test_spans_are_byte_offsets() {
    let source = "let a = 1\nlet bee = a";
    match parse(source).unwrap() {
        Stmt::Block { body, .. } => match &body[1] {
            Stmt::Declare {
                name_span, span, ..
            } => {
                assert_eq!(&source[name_span.start..name_span.end], "bee");
                assert_eq!(name_span.start_line, 1);
                assert_eq!(name_span.start_col, 4);
                assert_eq!(&source[span.start..span.end], "let bee = a");
            }
            other => panic!("Expected declaration, got {:?}", other),
        },
        other => panic!("Expected block, got {:?}", other),
    }
}

#[test]
fn test_syntax_error_reports_position() {
    let source = "let x = (1 + \nlet y = 2";
    let err = parse_script(source).unwrap_err();

    assert!(matches!(err, ParseError::PestError(..)));
    assert!(err.message().starts_with("Syntax error"));
    let span = err.span().expect("span");
    assert!(span.start <= source.len());
    assert_eq!(span.start_line, 1);
}

#[test]
fn test_syntax_error_to_diagnostic() {
    let diagnostic = parse_script("let = 5").unwrap_err().to_diagnostic();
    assert_eq!(diagnostic.code, codes::SYNTAX_ERROR);
    assert!(diagnostic.is_error());
}

#[test]
fn test_recovering_parse_of_valid_source() {
    let script = parse_script_recovering("let a = 1\nCauldron.dump(a)").expect("valid");
    assert!(matches!(script.body, Stmt::Block { ref body, .. } if body.len() == 2));
}

#[test]
fn test_recovery_resumes_after_each_failing_statement() {
    let source = "let = 5\nlet y = 1\nlet = 6";
    let errors = parse_script_recovering(source).unwrap_err();

    let lines: Vec<_> = errors
        .iter()
        .map(|e| e.span().expect("span").start_line)
        .collect();
    assert_eq!(lines, vec![0, 2]);
    assert!(errors.iter().all(|e| e.message().starts_with("Syntax error")));
}

#[test]
fn test_recovery_reports_unclosed_block_once() {
    let errors = parse_script_recovering("if (true) {\n  let a = 1\n").unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_recovery_skips_stray_closing_brace() {
    let source = "let a = 1\n}\nlet = 2";
    let errors = parse_script_recovering(source).unwrap_err();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].span().unwrap().start, source.find('}').unwrap());
    assert_eq!(errors[1].span().unwrap().start_line, 2);
}

#[test]
fn test_recovery_keeps_byte_offsets_after_multibyte_text() {
    let source = "let = 'é'\nlet = 2";
    let errors = parse_script_recovering(source).unwrap_err();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[1].span().unwrap().start, source.find("= 2").unwrap());
}

#[test]
fn test_script_serializes() {
    let script = parse_script("record P { x }\nlet p = new P { x: 1 }").unwrap();
    let json = serde_json::to_string(&script).expect("serialize");
    let back: ScriptDef = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.records, script.records);
    assert_eq!(back.body, script.body);
}
