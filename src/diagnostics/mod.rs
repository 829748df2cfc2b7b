//! Compiler diagnostics as plain data
//!
//! Everything the engine reports about a script at compile time flows through
//! [`Diagnostic`]. Diagnostics are never raised as errors: a build returns the
//! full ordered list (engine emission order) and the editor decides how to show
//! them.
//!
//! - [`Severity`] buckets diagnostics for underline colour and badge counts
//! - [`SourceSpan`] is a byte range into the script that produced them
//! - [`normalize_span`] guarantees every diagnostic covers at least one character
//! - [`DiagnosticReport`] is the bundle handed to the editor surface

mod report;
mod span;

pub use report::{DiagnosticGroup, DiagnosticReport, GroupEntry};
pub use span::{line_col, normalize_span, SourceSpan};

use serde::{Deserialize, Serialize};
use std::fmt;

/* ===================== Severity ===================== */

/// Severity bucket of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// All severities in display order
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Heading used when diagnostics are listed grouped by severity
    pub fn heading(&self) -> &'static str {
        match self {
            Severity::Error => "Errors",
            Severity::Warning => "Warnings",
            Severity::Info => "Information",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/* ===================== Diagnostic ===================== */

/// One compiler-reported issue tied to a source range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable identifier, e.g. `CS0100`
    pub code: String,
    pub message: String,
    pub span: SourceSpan,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
        span: SourceSpan,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            span,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Warning, code, message, span)
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Info, code, message, span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Hover text shown over the underlined range
    pub fn tooltip(&self) -> String {
        format!("{} {}", self.code, self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/* ===================== Counts ===================== */

/// Per-severity totals for badge display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl SeverityCounts {
    pub fn tally(diagnostics: &[Diagnostic]) -> Self {
        let mut counts = Self::default();
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Info => counts.infos += 1,
            }
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.errors,
            Severity::Warning => self.warnings,
            Severity::Info => self.infos,
        }
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

impl fmt::Display for SeverityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s), {} info",
            self.errors, self.warnings, self.infos
        )
    }
}

#[cfg(test)]
mod tests;
