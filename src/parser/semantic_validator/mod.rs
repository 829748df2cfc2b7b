//! Semantic validation for cauldron scripts
//!
//! This module provides an extensible rule-based validation system that runs
//! after parsing to catch semantic errors that the grammar can't enforce.
//!
//! # Usage
//!
//! ```ignore
//! use cauldron::parser::{parse_script, semantic_validator::{validate_script, ValidationContext}};
//!
//! let script = parse_script(source)?;
//! let errors = validate_script(&script, &ValidationContext::default());
//! ```
//!
//! # Architecture
//!
//! 1. **ValidationRule trait** - Each rule implements this trait
//! 2. **Validator** - Collects and runs all rules, in registration order
//! 3. **ValidationError** - The output of validation, convertible to a [`Diagnostic`]
//!
//! Rules that care about name resolution share one scope-aware walk
//! (`scope.rs`) and only implement the callbacks they need.
//!
//! # Adding a New Rule
//!
//! 1. Create a new file in `semantic_validator/rules/`
//! 2. Implement `ValidationRule` for your struct
//! 3. Add it to the `Validator::new()` constructor

pub mod rules;
mod scope;

use std::fmt;

use crate::diagnostics::{Diagnostic, Severity, SourceSpan};
use crate::executor::types::ast::Span;

use super::ScriptDef;

// ============================================================================
// Validation Context
// ============================================================================

/// A name visible to the script before its first statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalBinding {
    pub name: String,
    /// Members reachable through `name.member`
    pub members: Vec<String>,
}

impl GlobalBinding {
    pub fn new(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// What the script can see besides its own declarations: injected globals
/// followed by imported modules
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub globals: Vec<GlobalBinding>,
}

impl ValidationContext {
    pub fn new(globals: Vec<GlobalBinding>) -> Self {
        Self { globals }
    }
}

// ============================================================================
// Validation Error Types
// ============================================================================

/// A validation error produced by semantic analysis.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The source location of the issue
    pub span: Span,
    /// Human-readable message
    pub message: String,
    pub severity: Severity,
    /// Diagnostic code, see [`super::codes`]
    pub code: &'static str,
    /// Which rule produced this error
    pub rule_id: &'static str,
}

impl ValidationError {
    pub fn new(
        severity: Severity,
        span: Span,
        code: &'static str,
        message: impl Into<String>,
        rule_id: &'static str,
    ) -> Self {
        Self {
            span,
            message: message.into(),
            severity,
            code,
            rule_id,
        }
    }

    pub fn error(
        span: Span,
        code: &'static str,
        message: impl Into<String>,
        rule_id: &'static str,
    ) -> Self {
        Self::new(Severity::Error, span, code, message, rule_id)
    }

    pub fn warning(
        span: Span,
        code: &'static str,
        message: impl Into<String>,
        rule_id: &'static str,
    ) -> Self {
        Self::new(Severity::Warning, span, code, message, rule_id)
    }

    pub fn info(
        span: Span,
        code: &'static str,
        message: impl Into<String>,
        rule_id: &'static str,
    ) -> Self {
        Self::new(Severity::Info, span, code, message, rule_id)
    }

    /// Check if this is an error (not a warning or info)
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, col {}: {} [{}]",
            self.severity,
            self.span.start_line + 1,
            self.span.start_col + 1,
            self.message,
            self.rule_id
        )
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Diagnostic {
    fn from(err: ValidationError) -> Self {
        Diagnostic::new(
            err.severity,
            err.code,
            err.message,
            SourceSpan::new(err.span.start, err.span.end),
        )
    }
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Trait that all validation rules must implement.
///
/// Each rule checks one aspect of the script and reports in source order.
/// Rules don't depend on each other's results.
pub trait ValidationRule: Send + Sync {
    /// Unique identifier for this rule (e.g., "undefined-variable")
    fn id(&self) -> &'static str;

    /// Human-readable description of what this rule checks
    fn description(&self) -> &'static str;

    /// Run the validation and return any errors found.
    fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError>;
}

// ============================================================================
// Validator - Runs All Rules
// ============================================================================

/// The main validator that orchestrates all validation rules.
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Create a new validator with all built-in rules.
    pub fn new() -> Self {
        Self {
            rules: vec![
                // Error rules
                Box::new(rules::RecordDeclarationRule),
                Box::new(rules::UndefinedVariableRule),
                Box::new(rules::UnknownRecordRule),
                Box::new(rules::UnknownFieldRule),
                Box::new(rules::LoopControlRule),
                Box::new(rules::ConstAssignRule),
                Box::new(rules::UnknownMemberRule),
                // Warning rules
                Box::new(rules::UnusedVariableRule),
                Box::new(rules::UnreachableCodeRule),
                // Information
                Box::new(rules::ShadowedGlobalRule),
            ],
        }
    }

    /// Run all validation rules and collect errors.
    pub fn validate(&self, script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
        self.rules
            .iter()
            .flat_map(|rule| rule.validate(script, ctx))
            .collect()
    }

    /// Get a list of all registered rules
    pub fn rules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.rules.iter().map(|r| (r.id(), r.description()))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Validate a script and return everything the rules found.
pub fn validate_script(script: &ScriptDef, ctx: &ValidationContext) -> Vec<ValidationError> {
    Validator::new().validate(script, ctx)
}

/// Check if a script has any validation errors (not just warnings).
pub fn has_errors(script: &ScriptDef, ctx: &ValidationContext) -> bool {
    validate_script(script, ctx).iter().any(|e| e.is_error())
}

#[cfg(test)]
mod tests;
