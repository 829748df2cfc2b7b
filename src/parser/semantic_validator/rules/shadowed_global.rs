//! Rule: Shadowed Global
//!
//! Reports an informational note when a declaration hides an injected global
//! or an imported module, e.g. `let math = 3`.

use crate::executor::types::ast::Span;
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::scope::{walk_script, Binding, BindingKind, ScopeVisitor};
use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct ShadowedGlobalRule;

impl ValidationRule for ShadowedGlobalRule {
    fn id(&self) -> &'static str {
        "shadowed-global"
    }

    fn description(&self) -> &'static str {
        "Declarations should not hide globals or imported modules"
    }

    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut visitor = Shadowed {
            errors: Vec::new(),
            rule_id: self.id(),
        };
        walk_script(script, ctx, &mut visitor);
        visitor.errors
    }
}

struct Shadowed {
    errors: Vec<ValidationError>,
    rule_id: &'static str,
}

impl ScopeVisitor for Shadowed {
    fn declare(&mut self, _binding: Binding, name: &str, span: Span, shadowed: Option<Binding>) {
        if shadowed.map(|b| b.kind) == Some(BindingKind::Global) {
            self.errors.push(ValidationError::info(
                span,
                codes::SHADOWED_GLOBAL,
                format!("'{}' shadows a global of the same name", name),
                self.rule_id,
            ));
        }
    }
}
