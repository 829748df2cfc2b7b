//! The seam between the host and a language engine

use tokio_util::sync::CancellationToken;

use super::writer::{Globals, GlobalsShape};
use crate::diagnostics::Diagnostic;

/// Output of a compile-only pass
#[derive(Debug)]
pub struct Compilation<P> {
    /// Present only when the script can run (no Error diagnostics)
    pub program: Option<P>,
    /// Everything the compiler reported, in emission order
    pub diagnostics: Vec<Diagnostic>,
}

/// How an execution ended, as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Completed,
    /// User code raised an error that nothing caught
    Threw { description: String },
    /// The engine observed the cancellation token and stopped
    Cancelled,
}

/// A language engine the host can drive
///
/// `compile` must report invalid input as diagnostics and never fail.
/// `execute` runs on a blocking worker thread; it should check `cancel`
/// between units of work but is not required to interrupt native calls.
pub trait ScriptEngine: Send + Sync + 'static {
    type Program: Send + 'static;

    fn compile(
        &self,
        code: &str,
        imports: &[String],
        shape: &GlobalsShape,
    ) -> Compilation<Self::Program>;

    fn execute(
        &self,
        program: &Self::Program,
        globals: Globals,
        cancel: &CancellationToken,
    ) -> Termination;
}
