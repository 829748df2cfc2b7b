//! Rule: Const Assignment
//!
//! Reports an error when a `const` binding is reassigned, or when a global
//! or imported module is assigned at all (including through a member path).
//! Mutating the contents of a const list or object is allowed.

use crate::executor::types::ast::Span;
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::scope::{walk_script, Binding, BindingKind, ScopeVisitor};
use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct ConstAssignRule;

impl ValidationRule for ConstAssignRule {
    fn id(&self) -> &'static str {
        "const-assign"
    }

    fn description(&self) -> &'static str {
        "Constants and globals cannot be reassigned"
    }

    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut visitor = ConstAssign {
            errors: Vec::new(),
            rule_id: self.id(),
        };
        walk_script(script, ctx, &mut visitor);
        visitor.errors
    }
}

struct ConstAssign {
    errors: Vec<ValidationError>,
    rule_id: &'static str,
}

impl ScopeVisitor for ConstAssign {
    fn assign(&mut self, name: &str, span: Span, has_path: bool, binding: Option<Binding>) {
        let message = match binding.map(|b| b.kind) {
            Some(BindingKind::Const) if !has_path => {
                format!("Cannot assign to '{}' because it is a constant", name)
            }
            Some(BindingKind::Global) => format!("Cannot assign to global '{}'", name),
            _ => return,
        };
        self.errors.push(ValidationError::error(
            span,
            codes::CONST_ASSIGNMENT,
            message,
            self.rule_id,
        ));
    }
}
