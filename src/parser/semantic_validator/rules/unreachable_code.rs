//! Rule: Unreachable Code
//!
//! Reports a warning for statements that follow one that always transfers
//! control away (`return`, `throw`, `break`, `continue`, or an `if`/`try`
//! whose every branch does). One warning covers the whole unreachable tail
//! of a block.
//!
//! # Examples
//!
//! ```text
//! return 1
//! Cauldron.dump("never")   // Warning: unreachable
//! ```

use crate::executor::types::ast::Stmt;
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct UnreachableCodeRule;

impl ValidationRule for UnreachableCodeRule {
    fn id(&self) -> &'static str {
        "unreachable-code"
    }

    fn description(&self) -> &'static str {
        "Code after return, throw, break or continue never runs"
    }

    fn validate(&self, script: &ScriptDef, _ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_stmt(&script.body, &mut errors, self.id());
        errors
    }
}

fn check_stmt(stmt: &Stmt, errors: &mut Vec<ValidationError>, rule_id: &'static str) {
    match stmt {
        Stmt::Block { body, .. } => {
            for s in body {
                check_stmt(s, errors, rule_id);
            }

            if let Some(exit) = body.iter().position(always_exits) {
                let tail = &body[exit + 1..];
                if let (Some(first), Some(last)) = (tail.first(), tail.last()) {
                    errors.push(ValidationError::warning(
                        first.span().merge(&last.span()),
                        codes::UNREACHABLE_CODE,
                        "Unreachable code detected",
                        rule_id,
                    ));
                }
            }
        }

        Stmt::If { then_s, else_s, .. } => {
            check_stmt(then_s, errors, rule_id);
            if let Some(else_s) = else_s {
                check_stmt(else_s, errors, rule_id);
            }
        }

        Stmt::While { body, .. } | Stmt::ForLoop { body, .. } => check_stmt(body, errors, rule_id),

        Stmt::Try {
            body, catch_body, ..
        } => {
            check_stmt(body, errors, rule_id);
            check_stmt(catch_body, errors, rule_id);
        }

        _ => {}
    }
}

/// Whether control can never fall through to the next statement
fn always_exits(stmt: &Stmt) -> bool {
    match stmt {
        s if s.is_terminator() => true,
        Stmt::Block { body, .. } => body.iter().any(always_exits),
        Stmt::If {
            then_s,
            else_s: Some(else_s),
            ..
        } => always_exits(then_s) && always_exits(else_s),
        Stmt::Try {
            body, catch_body, ..
        } => always_exits(body) && always_exits(catch_body),
        _ => false,
    }
}
