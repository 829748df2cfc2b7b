//! Collaborators the coordinator drives
//!
//! Both traits are only ever called from the coordinator's own task, so
//! implementations need no synchronization of their own.

use crate::diagnostics::DiagnosticReport;
use crate::render::Section;

/// The text editor hosting the script
pub trait Editor: Send + 'static {
    fn current_text(&self) -> String;

    /// Selected byte range; empty when nothing is selected
    fn selection(&self) -> (usize, usize);

    /// Replace the diagnostics shown for the current text
    fn report_diagnostics(&mut self, report: &DiagnosticReport);

    fn set_run_enabled(&mut self, enabled: bool);
}

/// The output panel
pub trait OutputSurface: Send + 'static {
    /// Start a fresh output for a new run
    fn reset(&mut self);

    fn append(&mut self, section: &Section);
}
