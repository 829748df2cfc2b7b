//! Diagnostics bundled with the script they were produced from

use serde::Serialize;
use std::fmt;

use super::{line_col, normalize_span, Diagnostic, Severity, SeverityCounts, SourceSpan};

/// Result of one build, ready for the editor surface.
///
/// `ranges[i]` is the normalized highlight range of `diagnostics[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
    pub ranges: Vec<SourceSpan>,
    pub counts: SeverityCounts,
    /// 0-indexed (line, column) of each range start
    locations: Vec<(usize, usize)>,
}

/// Diagnostics of one severity, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticGroup {
    pub severity: Severity,
    pub heading: &'static str,
    pub entries: Vec<GroupEntry>,
}

/// One line of a diagnostics listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEntry {
    /// `"{code} {message}"`
    pub label: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Range to select when the entry is picked
    pub range: SourceSpan,
}

impl DiagnosticReport {
    pub fn new(source: &str, diagnostics: Vec<Diagnostic>) -> Self {
        let ranges: Vec<SourceSpan> = diagnostics
            .iter()
            .map(|d| normalize_span(d.span, source))
            .collect();
        let locations = ranges.iter().map(|r| line_col(source, r.start)).collect();
        let counts = SeverityCounts::tally(&diagnostics);

        Self {
            diagnostics,
            ranges,
            counts,
            locations,
        }
    }

    pub fn empty() -> Self {
        Self::new("", Vec::new())
    }

    pub fn has_errors(&self) -> bool {
        self.counts.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate diagnostics together with their highlight range
    pub fn highlights(&self) -> impl Iterator<Item = (&Diagnostic, SourceSpan)> + '_ {
        self.diagnostics.iter().zip(self.ranges.iter().copied())
    }

    /// Diagnostics bucketed under Errors / Warnings / Information.
    ///
    /// Every bucket is present even when empty.
    pub fn groups(&self) -> Vec<DiagnosticGroup> {
        Severity::ALL
            .iter()
            .map(|&severity| DiagnosticGroup {
                severity,
                heading: severity.heading(),
                entries: self
                    .diagnostics
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.severity == severity)
                    .map(|(i, d)| {
                        let (line, col) = self.locations[i];
                        GroupEntry {
                            label: d.tooltip(),
                            line: line + 1,
                            column: col + 1,
                            range: self.ranges[i],
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            let (line, col) = self.locations[i];
            writeln!(f, "{}:{}: {}", line + 1, col + 1, diagnostic)?;
        }
        write!(f, "{}", self.counts)
    }
}
