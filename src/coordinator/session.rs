//! Execution sessions and the per-session output log

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::host::RunOutcome;
use crate::render::Section;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Running,
    Completed,
    Faulted,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Running)
    }
}

impl From<&RunOutcome> for SessionState {
    fn from(outcome: &RunOutcome) -> Self {
        match outcome {
            RunOutcome::Completed => SessionState::Completed,
            RunOutcome::Faulted(_) => SessionState::Faulted,
            RunOutcome::Cancelled => SessionState::Cancelled,
        }
    }
}

/// The one run that may currently be in flight
#[derive(Debug)]
pub struct ExecutionSession {
    pub id: Uuid,
    pub cancel: CancellationToken,
    /// Set once a cancel was requested; the session's output is closed from then on
    pub cancel_requested: bool,
}

impl ExecutionSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            cancel_requested: false,
        }
    }

    /// Signal cancellation without waiting for the run to stop
    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
        self.cancel.cancel();
    }
}

impl Default for ExecutionSession {
    fn default() -> Self {
        Self::new()
    }
}

/* ===================== SessionLog ===================== */

/// Everything one session produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub state: SessionState,
    /// Dumped values, then at most one error section
    pub sections: Vec<Section>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn error(&self) -> Option<&str> {
        self.sections.iter().find_map(|section| match section {
            Section::Error(text) => Some(text.as_str()),
            Section::Value(_) => None,
        })
    }
}

/// Ordered sections of recent sessions, newest last
///
/// Only the newest session can receive sections; older records are frozen.
#[derive(Debug, Clone)]
pub struct SessionLog {
    records: VecDeque<SessionRecord>,
    capacity: usize,
}

impl SessionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn start(&mut self, id: Uuid) {
        self.records.push_back(SessionRecord {
            id,
            state: SessionState::Running,
            sections: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        });
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    /// Append to the newest session; returns false if `id` is not the newest
    pub fn append(&mut self, id: Uuid, section: Section) -> bool {
        match self.records.back_mut() {
            Some(record) if record.id == id && !record.state.is_terminal() => {
                record.sections.push(section);
                true
            }
            _ => false,
        }
    }

    /// Move a running session to a terminal state; later calls are ignored
    pub fn finish(&mut self, id: Uuid, state: SessionState) -> Option<&SessionRecord> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        if !record.state.is_terminal() {
            record.state = state;
            record.finished_at = Some(Utc::now());
        }
        Some(record)
    }

    pub fn get(&self, id: Uuid) -> Option<&SessionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn latest(&self) -> Option<&SessionRecord> {
        self.records.back()
    }

    pub fn records(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
