//! Rule: Unknown Member
//!
//! Reports an error when code reads a member that a global or an imported
//! module doesn't expose, e.g. `math.flor(1.5)` or `Cauldron.print(x)`.
//! Locals that shadow the global are not checked.

use crate::executor::types::ast::Span;
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::scope::{walk_script, Binding, BindingKind, ScopeVisitor};
use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct UnknownMemberRule;

impl ValidationRule for UnknownMemberRule {
    fn id(&self) -> &'static str {
        "unknown-member"
    }

    fn description(&self) -> &'static str {
        "Members of globals and modules must exist"
    }

    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut visitor = UnknownMember {
            ctx,
            errors: Vec::new(),
            rule_id: self.id(),
        };
        walk_script(script, ctx, &mut visitor);
        visitor.errors
    }
}

struct UnknownMember<'c> {
    ctx: &'c ValidationContext,
    errors: Vec<ValidationError>,
    rule_id: &'static str,
}

impl ScopeVisitor for UnknownMember<'_> {
    fn member(&mut self, binding: Binding, name: &str, property: &str, property_span: Span) {
        if binding.kind != BindingKind::Global {
            return;
        }
        let Some(global) = self.ctx.globals.get(binding.id) else {
            return;
        };
        if !global.members.iter().any(|m| m == property) {
            self.errors.push(ValidationError::error(
                property_span,
                codes::UNKNOWN_MEMBER,
                format!("'{}' has no member '{}'", name, property),
                self.rule_id,
            ));
        }
    }
}
