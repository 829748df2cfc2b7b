//! Rule: Record Declaration
//!
//! Reports an error for a record type declared twice, and for a field
//! declared twice within one record. The later occurrence is reported.

use std::collections::HashSet;

use crate::parser::codes;
use crate::parser::ScriptDef;

use super::super::{ValidationContext, ValidationError, ValidationRule};

pub struct RecordDeclarationRule;

impl ValidationRule for RecordDeclarationRule {
    fn id(&self) -> &'static str {
        "record-declaration"
    }

    fn description(&self) -> &'static str {
        "Record types and their fields must have unique names"
    }

    fn validate(&self, script: &ScriptDef, _ctx: &ValidationContext) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut records = HashSet::new();

        for record in &script.records {
            if !records.insert(record.name.as_str()) {
                errors.push(ValidationError::error(
                    record.name_span,
                    codes::DUPLICATE_DECLARATION,
                    format!("Record '{}' is already declared", record.name),
                    self.id(),
                ));
            }

            let mut fields = HashSet::new();
            for field in &record.fields {
                if !fields.insert(field.name.as_str()) {
                    errors.push(ValidationError::error(
                        field.span,
                        codes::DUPLICATE_DECLARATION,
                        format!(
                            "Field '{}' is declared more than once in record '{}'",
                            field.name, record.name
                        ),
                        self.id(),
                    ));
                }
            }
        }

        errors
    }
}
