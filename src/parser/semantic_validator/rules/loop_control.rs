//! Rule: Loop Control
//!
//! Reports an error for `break` or `continue` that is not inside a `while`
//! or `for` body.

use crate::executor::types::ast::Stmt;
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct LoopControlRule;

impl ValidationRule for LoopControlRule {
    fn id(&self) -> &'static str {
        "loop-control"
    }

    fn description(&self) -> &'static str {
        "break and continue are only valid inside loops"
    }

    fn validate(&self, script: &ScriptDef, _ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_stmt(&script.body, false, &mut errors, self.id());
        errors
    }
}

fn check_stmt(
    stmt: &Stmt,
    in_loop: bool,
    errors: &mut Vec<ValidationError>,
    rule_id: &'static str,
) {
    match stmt {
        Stmt::Break { span } | Stmt::Continue { span } if !in_loop => {
            let keyword = if matches!(stmt, Stmt::Break { .. }) {
                "break"
            } else {
                "continue"
            };
            errors.push(ValidationError::error(
                *span,
                codes::LOOP_CONTROL_OUTSIDE_LOOP,
                format!("'{}' outside of a loop", keyword),
                rule_id,
            ));
        }

        Stmt::Block { body, .. } => {
            for s in body {
                check_stmt(s, in_loop, errors, rule_id);
            }
        }

        Stmt::If { then_s, else_s, .. } => {
            check_stmt(then_s, in_loop, errors, rule_id);
            if let Some(else_s) = else_s {
                check_stmt(else_s, in_loop, errors, rule_id);
            }
        }

        Stmt::While { body, .. } | Stmt::ForLoop { body, .. } => {
            check_stmt(body, true, errors, rule_id);
        }

        Stmt::Try {
            body, catch_body, ..
        } => {
            check_stmt(body, in_loop, errors, rule_id);
            check_stmt(catch_body, in_loop, errors, rule_id);
        }

        _ => {}
    }
}
