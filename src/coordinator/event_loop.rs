//! The coordinator task
//!
//! One task owns the editor, the output surface, the session log and the build
//! scheduler. Handles talk to it through a command channel; build and run
//! workers report back through an event channel. Nothing else touches that
//! state, so the surfaces only ever see mutations from this task.

use std::future;
use std::ops::ControlFlow;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::debounce::BuildScheduler;
use super::session::{ExecutionSession, SessionLog, SessionRecord, SessionState};
use super::surface::{Editor, OutputSurface};
use super::{CoordinatorConfig, CoordinatorSnapshot};
use crate::diagnostics::DiagnosticReport;
use crate::host::{Globals, RunOutcome, Script, ScriptEngine, ScriptHost, Writer};
use crate::render::{RenderNode, Section};

/* ===================== Messages ===================== */

/// Requests from a `CoordinatorHandle`
#[derive(Debug)]
pub(super) enum Command {
    TextChanged,
    Run {
        selection_only: bool,
        /// Resolved with the session record once the session is terminal
        done: Option<oneshot::Sender<SessionRecord>>,
    },
    Cancel,
    Snapshot(oneshot::Sender<CoordinatorSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Reports from build and run workers
#[derive(Debug)]
pub(super) enum Event {
    Dumped {
        session: Uuid,
        node: RenderNode,
    },
    RunFinished {
        session: Uuid,
        outcome: RunOutcome,
    },
    Built {
        generation: u64,
        report: DiagnosticReport,
    },
}

/* ===================== Coordinator ===================== */

pub(super) struct Coordinator<E: ScriptEngine, D, O> {
    host: ScriptHost<E>,
    editor: D,
    output: O,
    config: CoordinatorConfig,
    builds: BuildScheduler,
    builds_dispatched: u64,
    diagnostics: Option<DiagnosticReport>,
    active: Option<ExecutionSession>,
    log: SessionLog,
    /// Callers waiting for a session to become terminal
    waiters: Vec<(Uuid, oneshot::Sender<SessionRecord>)>,
    events: mpsc::UnboundedSender<Event>,
}

impl<E, D, O> Coordinator<E, D, O>
where
    E: ScriptEngine,
    D: Editor,
    O: OutputSurface,
{
    pub(super) fn new(
        host: ScriptHost<E>,
        editor: D,
        output: O,
        config: CoordinatorConfig,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            host,
            editor,
            output,
            builds: BuildScheduler::new(config.idle_interval),
            log: SessionLog::new(config.session_history),
            config,
            builds_dispatched: 0,
            diagnostics: None,
            active: None,
            waiters: Vec::new(),
            events,
        }
    }

    /// Serve commands and worker events until shutdown or until every handle is gone
    pub(super) async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        debug!(
            idle_interval_ms = self.config.idle_interval.as_millis() as u64,
            "coordinator started"
        );

        loop {
            let deadline = self.builds.deadline();

            tokio::select! {
                // Worker events first, so a command never overtakes output already sent
                biased;

                Some(event) = events.recv() => self.handle_event(event),

                command = commands.recv() => {
                    let flow = match command {
                        Some(command) => self.handle_command(command),
                        None => ControlFlow::Break(None),
                    };
                    if let ControlFlow::Break(ack) = flow {
                        self.shutdown();
                        // Handles must see Closed once the ack arrives
                        commands.close();
                        if let Some(ack) = ack {
                            let _ = ack.send(());
                        }
                        return;
                    }
                }

                _ = wait_until(deadline) => self.dispatch_build(),
            }
        }
    }

    /// Breaks with the shutdown acknowledgement when the loop should stop
    fn handle_command(&mut self, command: Command) -> ControlFlow<Option<oneshot::Sender<()>>> {
        match command {
            Command::TextChanged => {
                let generation = self.builds.text_changed(Instant::now());
                debug!(generation, "build scheduled");
            }
            Command::Run {
                selection_only,
                done,
            } => self.start_run(selection_only, done),
            Command::Cancel => self.cancel_active(),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Shutdown(ack) => return ControlFlow::Break(Some(ack)),
        }
        ControlFlow::Continue(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Dumped { session, node } => self.append_dump(session, node),
            Event::RunFinished { session, outcome } => self.finish_run(session, outcome),
            Event::Built { generation, report } => {
                if !self.builds.accept(generation) {
                    warn!(generation, "dropping stale build result");
                    return;
                }
                debug!(
                    generation,
                    errors = report.counts.errors,
                    warnings = report.counts.warnings,
                    "build finished"
                );
                self.editor.report_diagnostics(&report);
                self.diagnostics = Some(report);
            }
        }
    }

    /* ===================== Builds ===================== */

    fn dispatch_build(&mut self) {
        let Some(generation) = self.builds.fire(Instant::now()) else {
            return;
        };
        self.builds_dispatched += 1;

        let script = Script::new(self.editor.current_text());
        let imports = self.config.imports.clone();
        let host = self.host.clone();
        let events = self.events.clone();
        debug!(generation, "dispatching build");

        tokio::spawn(async move {
            let built = tokio::task::spawn_blocking(move || {
                let diagnostics = host.build(&script, &imports);
                DiagnosticReport::new(&script, diagnostics)
            })
            .await;

            match built {
                Ok(report) => {
                    let _ = events.send(Event::Built { generation, report });
                }
                Err(err) => warn!(generation, error = %err, "build worker failed"),
            }
        });
    }

    /* ===================== Runs ===================== */

    fn start_run(&mut self, selection_only: bool, done: Option<oneshot::Sender<SessionRecord>>) {
        if let Some(mut previous) = self.active.take() {
            previous.request_cancel();
            self.log.finish(previous.id, SessionState::Cancelled);
            info!(session = %previous.id, "session superseded");
            self.resolve_waiters(previous.id);
        }

        let script = self.capture_script(selection_only);
        let session = ExecutionSession::new();
        let id = session.id;

        self.output.reset();
        self.log.start(id);
        self.editor.set_run_enabled(false);
        if let Some(done) = done {
            self.waiters.push((id, done));
        }
        info!(session = %id, bytes = script.len(), selection_only, "session started");

        let writer = {
            let events = self.events.clone();
            Writer::new(move |node| {
                let _ = events.send(Event::Dumped { session: id, node });
            })
        };
        let host = self.host.clone();
        let imports = self.config.imports.clone();
        let cancel = session.cancel.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = host.run(script, imports, Globals::new(writer), cancel).await;
            let _ = events.send(Event::RunFinished {
                session: id,
                outcome,
            });
        });

        self.active = Some(session);
    }

    /// Snapshot the editor text, or only the selection when asked and non-empty
    fn capture_script(&self, selection_only: bool) -> Script {
        let script = Script::new(self.editor.current_text());
        if !selection_only {
            return script;
        }
        match self.editor.selection() {
            (start, end) if start != end => script.slice(start, end),
            _ => script,
        }
    }

    fn cancel_active(&mut self) {
        match self.active.as_mut() {
            Some(session) if !session.cancel_requested => {
                info!(session = %session.id, "cancel requested");
                session.request_cancel();
            }
            Some(_) => {}
            None => debug!("cancel requested with no active session"),
        }
    }

    /// Accept a dump only from the active session, and only until a cancel
    fn append_dump(&mut self, session: Uuid, node: RenderNode) {
        let accepting = self
            .active
            .as_ref()
            .is_some_and(|active| active.id == session && !active.cancel_requested);
        if !accepting {
            debug!(%session, "dropping output of inactive session");
            return;
        }

        let section = Section::Value(node);
        self.output.append(&section);
        self.log.append(session, section);
    }

    fn finish_run(&mut self, session: Uuid, outcome: RunOutcome) {
        let is_active = self.active.as_ref().is_some_and(|a| a.id == session);
        if !is_active {
            debug!(%session, ?outcome, "superseded session finished");
            return;
        }
        let Some(active) = self.active.take() else {
            return;
        };

        let state = if active.cancel_requested {
            SessionState::Cancelled
        } else {
            SessionState::from(&outcome)
        };

        match (&outcome, state) {
            (RunOutcome::Faulted(fault), SessionState::Faulted) => {
                warn!(%session, %fault, "session faulted");
                let section = Section::Error(fault.to_string());
                self.output.append(&section);
                self.log.append(session, section);
            }
            _ => info!(%session, ?state, "session finished"),
        }

        self.log.finish(session, state);
        self.editor.set_run_enabled(true);
        self.resolve_waiters(session);
    }

    fn resolve_waiters(&mut self, session: Uuid) {
        let Some(record) = self.log.get(session).cloned() else {
            return;
        };
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.waiters)
            .into_iter()
            .partition(|(id, _)| *id == session);
        self.waiters = waiting;
        for (_, done) in ready {
            let _ = done.send(record.clone());
        }
    }

    /* ===================== Lifecycle ===================== */

    fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            active: self.active.as_ref().map(|s| s.id),
            sessions: self.log.records().cloned().collect(),
            diagnostics: self.diagnostics.clone(),
            build_pending: self.builds.is_pending(),
            builds_dispatched: self.builds_dispatched,
        }
    }

    fn shutdown(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.request_cancel();
            self.log.finish(session.id, SessionState::Cancelled);
            self.resolve_waiters(session.id);
        }
        info!(sessions = self.log.len(), "coordinator stopped");
    }
}

/// Sleep until `deadline`, or forever when there is none
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
