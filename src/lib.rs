pub mod cli;
pub mod config;
pub mod coordinator;
pub mod diagnostics;
pub mod executor;
pub mod host;
pub mod parser;
pub mod render;

// Re-export the embedding surface
pub use coordinator::{spawn, CoordinatorConfig, CoordinatorHandle, Editor, OutputSurface};
pub use diagnostics::{Diagnostic, DiagnosticReport, Severity, SourceSpan};
pub use executor::Interpreter;
pub use host::{ExecutionFault, RunOutcome, Script, ScriptEngine, ScriptHost};
