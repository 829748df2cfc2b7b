//! Rule: Unused Variable
//!
//! Reports a warning when a variable is declared but never read.
//!
//! # Examples
//!
//! ```text
//! // Warning: 'x' is declared but never used
//! let x = 5
//! let y = 10
//! Cauldron.dump(y)
//! ```
//!
//! # Notes
//!
//! - Variables starting with `_` are exempt (convention for intentionally unused)
//! - Assigning to a variable does not count as using it
//! - Loop bindings and catch variables are declarations too

use std::collections::HashSet;

use crate::executor::types::ast::Span;
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::scope::{walk_script, Binding, ScopeVisitor};
use super::super::{ValidationContext, ValidationError, ValidationRule};

/// Rule that checks for unused variable declarations.
pub struct UnusedVariableRule;

impl ValidationRule for UnusedVariableRule {
    fn id(&self) -> &'static str {
        "unused-variable"
    }

    fn description(&self) -> &'static str {
        "Variables should be used after declaration"
    }

    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut usage = Usage::default();
        walk_script(script, ctx, &mut usage);

        usage
            .declarations
            .into_iter()
            .filter(|(id, name, _)| !name.starts_with('_') && !usage.used.contains(id))
            .map(|(_, name, span)| {
                ValidationError::warning(
                    span,
                    codes::UNUSED_VARIABLE,
                    format!("Variable '{}' is declared but never used", name),
                    self.id(),
                )
            })
            .collect()
    }
}

#[derive(Default)]
struct Usage {
    /// (binding id, name, span) in declaration order
    declarations: Vec<(usize, String, Span)>,
    used: HashSet<usize>,
}

impl ScopeVisitor for Usage {
    fn declare(&mut self, binding: Binding, name: &str, span: Span, _shadowed: Option<Binding>) {
        self.declarations.push((binding.id, name.to_string(), span));
    }

    fn reference(&mut self, _name: &str, _span: Span, binding: Option<Binding>) {
        if let Some(binding) = binding {
            self.used.insert(binding.id);
        }
    }

    fn assign(&mut self, _name: &str, _span: Span, has_path: bool, binding: Option<Binding>) {
        // `xs[0] = 1` reads xs to reach the element
        if let (true, Some(binding)) = (has_path, binding) {
            self.used.insert(binding.id);
        }
    }
}
