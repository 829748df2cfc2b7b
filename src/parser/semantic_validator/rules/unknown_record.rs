//! Rule: Unknown Record
//!
//! Reports an error when `new T { ... }` names a record type that the script
//! never declares. Record declarations are hoisted, so construction may
//! appear before the declaration.

use crate::executor::types::ast::{Expr, Span};
use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::scope::{walk_script, ScopeVisitor};
use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct UnknownRecordRule;

impl ValidationRule for UnknownRecordRule {
    fn id(&self) -> &'static str {
        "unknown-record"
    }

    fn description(&self) -> &'static str {
        "Constructed record types must be declared"
    }

    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut visitor = UnknownRecord {
            script,
            errors: Vec::new(),
            rule_id: self.id(),
        };
        walk_script(script, ctx, &mut visitor);
        visitor.errors
    }
}

struct UnknownRecord<'s> {
    script: &'s ScriptDef,
    errors: Vec<ValidationError>,
    rule_id: &'static str,
}

impl ScopeVisitor for UnknownRecord<'_> {
    fn construct(&mut self, record: &str, record_span: Span, _fields: &[(String, Span, Expr)]) {
        if self.script.record(record).is_none() {
            self.errors.push(ValidationError::error(
                record_span,
                codes::UNKNOWN_RECORD,
                format!("Unknown record type '{}'", record),
                self.rule_id,
            ));
        }
    }
}
