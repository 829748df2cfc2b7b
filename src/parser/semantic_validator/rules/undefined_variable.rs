//! Rule: Undefined Variable
//!
//! Reports an error when a variable is used or assigned before it's declared.
//!
//! # Examples
//!
//! ```text
//! // Error: 'x' is used before declaration
//! let y = x + 1
//! let x = 5
//! ```
//!
//! ```text
//! // OK: 'x' is declared before use
//! let x = 5
//! let y = x + 1
//! ```

use crate::executor::types::ast::Span;
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::scope::{walk_script, Binding, ScopeVisitor};
use super::super::{ValidationContext, ValidationError, ValidationRule};

/// Rule that checks for undefined variable usage.
pub struct UndefinedVariableRule;

impl ValidationRule for UndefinedVariableRule {
    fn id(&self) -> &'static str {
        "undefined-variable"
    }

    fn description(&self) -> &'static str {
        "Variables must be declared before use"
    }

    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut visitor = Undefined {
            errors: Vec::new(),
            rule_id: self.id(),
        };
        walk_script(script, ctx, &mut visitor);
        visitor.errors
    }
}

struct Undefined {
    errors: Vec<ValidationError>,
    rule_id: &'static str,
}

impl ScopeVisitor for Undefined {
    fn reference(&mut self, name: &str, span: Span, binding: Option<Binding>) {
        if binding.is_none() {
            self.errors.push(ValidationError::error(
                span,
                codes::UNDEFINED_VARIABLE,
                format!("Undefined variable '{}'", name),
                self.rule_id,
            ));
        }
    }

    fn assign(&mut self, name: &str, span: Span, _has_path: bool, binding: Option<Binding>) {
        if binding.is_none() {
            self.errors.push(ValidationError::error(
                span,
                codes::UNDEFINED_VARIABLE,
                format!("Assignment to undeclared variable '{}'", name),
                self.rule_id,
            ));
        }
    }
}
