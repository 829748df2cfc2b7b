//! Rule: Unknown Field
//!
//! Reports an error when `new T { f: ... }` initializes a field `f` that
//! record `T` doesn't declare. Unknown record types are left to
//! `unknown-record`. Fields that are not initialized default to `null`.

use crate::executor::types::ast::{Expr, Span};
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::scope::{walk_script, ScopeVisitor};
use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct UnknownFieldRule;

impl ValidationRule for UnknownFieldRule {
    fn id(&self) -> &'static str {
        "unknown-field"
    }

    fn description(&self) -> &'static str {
        "Record construction may only set declared fields"
    }

    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut visitor = UnknownField {
            script,
            errors: Vec::new(),
            rule_id: self.id(),
        };
        walk_script(script, ctx, &mut visitor);
        visitor.errors
    }
}

struct UnknownField<'s> {
    script: &'s ScriptDef,
    errors: Vec<ValidationError>,
    rule_id: &'static str,
}

impl ScopeVisitor for UnknownField<'_> {
    fn construct(&mut self, record: &str, _record_span: Span, fields: &[(String, Span, Expr)]) {
        let Some(decl) = self.script.record(record) else {
            return;
        };
        for (field, span, _) in fields {
            if !decl.fields.iter().any(|f| &f.name == field) {
                self.errors.push(ValidationError::error(
                    *span,
                    codes::UNKNOWN_FIELD,
                    format!("Record '{}' has no field '{}'", record, field),
                    self.rule_id,
                ));
            }
        }
    }
}
