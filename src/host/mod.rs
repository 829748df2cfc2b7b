//! Thin façade over a language engine
//!
//! [`ScriptHost`] exposes the two operations the rest of the crate needs:
//!
//! - [`ScriptHost::build`] compiles without executing and returns diagnostics
//! - [`ScriptHost::run`] compiles and executes on a blocking worker, streaming
//!   dumped values through the run's [`Writer`]
//!
//! Neither operation fails. Compile problems are diagnostics; every failure
//! during a run (a compile error found at run time, an uncaught script error,
//! an engine panic) comes back as [`RunOutcome::Faulted`].

mod engine;
mod writer;

pub use engine::{Compilation, ScriptEngine, Termination};
pub use writer::{GlobalSignature, Globals, GlobalsShape, Writer, DUMP, GLOBAL_NAME};

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::diagnostics::{line_col, normalize_span, Diagnostic};

/// Code of the diagnostic reported when the engine panics while compiling
pub const INTERNAL_COMPILER_ERROR: &str = "CS9000";

/* ===================== Script ===================== */

/// Immutable snapshot of the source text
///
/// Cloning shares the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script(Arc<str>);

impl Script {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Snapshot of `start..end`, clamped to the text and to char boundaries
    pub fn slice(&self, start: usize, end: usize) -> Script {
        let text = self.text();
        let clamp = |mut i: usize| {
            i = i.min(text.len());
            while i > 0 && !text.is_char_boundary(i) {
                i -= 1;
            }
            i
        };
        let (start, end) = (clamp(start), clamp(end));
        Script::new(&text[start.min(end)..end.max(start)])
    }
}

impl Deref for Script {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Script {
    fn from(text: &str) -> Self {
        Script::new(text)
    }
}

impl From<String> for Script {
    fn from(text: String) -> Self {
        Script::new(text)
    }
}

/* ===================== Outcomes ===================== */

/// Why a run ended abnormally
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionFault {
    /// The script had Error diagnostics, so nothing ran
    #[error("Compilation failed:\n{listing}")]
    Compilation {
        diagnostics: Vec<Diagnostic>,
        /// One `line:col: diagnostic` line per error
        listing: String,
    },

    /// User code raised an error that was not caught
    #[error("{0}")]
    Script(String),

    /// The engine panicked
    #[error("Engine panicked: {0}")]
    Panic(String),

    /// The worker running the engine was lost
    #[error("Execution worker failed: {0}")]
    Worker(String),
}

impl ExecutionFault {
    fn compilation(source: &str, diagnostics: Vec<Diagnostic>) -> Self {
        let listing = diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| {
                let range = normalize_span(d.span, source);
                let (line, col) = line_col(source, range.start);
                format!("{}:{}: {}", line + 1, col + 1, d)
            })
            .collect::<Vec<_>>()
            .join("\n");
        ExecutionFault::Compilation {
            diagnostics,
            listing,
        }
    }
}

/// Terminal result of [`ScriptHost::run`]
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed,
    Faulted(ExecutionFault),
    Cancelled,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/* ===================== ScriptHost ===================== */

/// Compile-only and compile-and-run access to an engine
pub struct ScriptHost<E> {
    engine: Arc<E>,
}

impl<E> Clone for ScriptHost<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E: ScriptEngine> ScriptHost<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Compile `script` without running it
    ///
    /// Returns every diagnostic in emission order. An engine panic is reported
    /// as a single [`INTERNAL_COMPILER_ERROR`] diagnostic.
    pub fn build(&self, script: &Script, imports: &[String]) -> Vec<Diagnostic> {
        let shape = Globals::shape();
        let compiled = panic::catch_unwind(AssertUnwindSafe(|| {
            self.engine.compile(script.text(), imports, &shape)
        }));

        match compiled {
            Ok(compilation) => {
                debug!(
                    diagnostics = compilation.diagnostics.len(),
                    "build finished"
                );
                compilation.diagnostics
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(%message, "engine panicked during build");
                vec![Diagnostic::error(
                    INTERNAL_COMPILER_ERROR,
                    format!("Internal compiler error: {}", message),
                    Default::default(),
                )]
            }
        }
    }

    /// Compile and execute `script` on a blocking worker thread
    ///
    /// Cancellation is cooperative: the engine stops at its next checkpoint
    /// after `cancel` fires, which may be never for code stuck in a native call.
    pub async fn run(
        &self,
        script: Script,
        imports: Vec<String>,
        globals: Globals,
        cancel: CancellationToken,
    ) -> RunOutcome {
        let engine = Arc::clone(&self.engine);

        let worker = tokio::task::spawn_blocking(move || {
            let compilation = engine.compile(script.text(), &imports, &Globals::shape());
            let Some(program) = compilation.program else {
                return RunOutcome::Faulted(ExecutionFault::compilation(
                    script.text(),
                    compilation.diagnostics,
                ));
            };

            match engine.execute(&program, globals, &cancel) {
                Termination::Completed => RunOutcome::Completed,
                Termination::Cancelled => RunOutcome::Cancelled,
                Termination::Threw { description } => {
                    RunOutcome::Faulted(ExecutionFault::Script(description))
                }
            }
        });

        match worker.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => {
                let message = panic_message(err.into_panic().as_ref());
                warn!(%message, "engine panicked during run");
                RunOutcome::Faulted(ExecutionFault::Panic(message))
            }
            Err(err) => RunOutcome::Faulted(ExecutionFault::Worker(err.to_string())),
        }
    }
}
