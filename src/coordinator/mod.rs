//! Session lifecycle for one editor
//!
//! [`spawn`] starts the coordinator task and returns a [`CoordinatorHandle`].
//! The task owns all editor-visible state and serializes every change to it:
//!
//! - **Builds**: each [`CoordinatorHandle::text_changed`] re-arms a single
//!   deferred build; it fires after the idle interval with no further change.
//!   A build result older than the last reported one is dropped.
//! - **Runs**: [`CoordinatorHandle::run`] cancels the active session (if any),
//!   snapshots the text and starts a new session. Output is tagged with its
//!   session id, and only the active session's output reaches the surface.
//! - **Cancel**: [`CoordinatorHandle::cancel`] signals the active session and
//!   returns at once. The engine stops at its next checkpoint; a run blocked in
//!   a native call is not interrupted, but its later output is discarded.

mod debounce;
mod event_loop;
mod session;
mod surface;

pub use debounce::BuildScheduler;
pub use session::{ExecutionSession, SessionLog, SessionRecord, SessionState};
pub use surface::{Editor, OutputSurface};

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::diagnostics::DiagnosticReport;
use crate::host::{ScriptEngine, ScriptHost};
use event_loop::{Command, Coordinator};

/// Knobs of one coordinator
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Quiet time after the last text change before a build fires
    pub idle_interval: Duration,
    /// Modules every build and run imports
    pub imports: Vec<String>,
    /// Finished sessions kept in snapshots
    pub session_history: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            idle_interval: Duration::from_millis(1000),
            imports: vec!["math".to_string(), "text".to_string(), "list".to_string()],
            session_history: 16,
        }
    }
}

/// Point-in-time view of the coordinator state
#[derive(Debug, Clone)]
pub struct CoordinatorSnapshot {
    /// Session currently running, if any
    pub active: Option<Uuid>,
    /// Recent sessions, oldest first
    pub sessions: Vec<SessionRecord>,
    /// Last reported build
    pub diagnostics: Option<DiagnosticReport>,
    pub build_pending: bool,
    pub builds_dispatched: u64,
}

impl CoordinatorSnapshot {
    pub fn latest(&self) -> Option<&SessionRecord> {
        self.sessions.last()
    }
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Coordinator has shut down")]
    Closed,
}

/* ===================== Handle ===================== */

/// Cheap, cloneable access to a running coordinator
///
/// Every method only enqueues a command; none of them waits for a run.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    fn send(&self, command: Command) -> Result<(), CoordinatorError> {
        self.commands
            .send(command)
            .map_err(|_| CoordinatorError::Closed)
    }

    /// The user typed; (re)schedule the idle build
    pub fn text_changed(&self) -> Result<(), CoordinatorError> {
        self.send(Command::TextChanged)
    }

    /// Run the whole text, superseding any running session
    pub fn run(&self) -> Result<(), CoordinatorError> {
        self.send(Command::Run {
            selection_only: false,
            done: None,
        })
    }

    /// Run the selection if there is one, otherwise the whole text
    pub fn run_selection(&self) -> Result<(), CoordinatorError> {
        self.send(Command::Run {
            selection_only: true,
            done: None,
        })
    }

    /// Start a run and wait until its session is terminal
    ///
    /// Resolves when the run ends or is superseded by a newer one.
    pub async fn run_to_end(&self, selection_only: bool) -> Result<SessionRecord, CoordinatorError> {
        let (done, finished) = oneshot::channel();
        self.send(Command::Run {
            selection_only,
            done: Some(done),
        })?;
        finished.await.map_err(|_| CoordinatorError::Closed)
    }

    /// Request cancellation of the active session
    pub fn cancel(&self) -> Result<(), CoordinatorError> {
        self.send(Command::Cancel)
    }

    pub async fn snapshot(&self) -> Result<CoordinatorSnapshot, CoordinatorError> {
        let (reply, snapshot) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        snapshot.await.map_err(|_| CoordinatorError::Closed)
    }

    /// Stop the coordinator, cancelling the active session
    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        let (ack, stopped) = oneshot::channel();
        self.send(Command::Shutdown(ack))?;
        stopped.await.map_err(|_| CoordinatorError::Closed)
    }
}

/// Start a coordinator task for one editor and output surface
///
/// Must be called from within a tokio runtime.
pub fn spawn<E, D, O>(
    host: ScriptHost<E>,
    editor: D,
    output: O,
    config: CoordinatorConfig,
) -> CoordinatorHandle
where
    E: ScriptEngine,
    D: Editor,
    O: OutputSurface,
{
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let coordinator = Coordinator::new(host, editor, output, config, events_tx);
    tokio::spawn(coordinator.run(commands_rx, events_rx));

    CoordinatorHandle {
        commands: commands_tx,
    }
}
