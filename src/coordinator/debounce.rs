//! Build-on-idle scheduling
//!
//! Every text change (re)arms a single deferred build: the deadline moves to
//! `now + interval` and the build generation increases. Only the latest
//! generation is ever dispatched, and a build result is applied only if no
//! newer result was applied before it.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct BuildScheduler {
    interval: Duration,
    deadline: Option<Instant>,
    /// Generation of the newest text change
    generation: u64,
    /// Generation of the newest build whose diagnostics were reported
    applied: u64,
}

impl BuildScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            generation: 0,
            applied: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record a text change at `now`, replacing any pending build
    pub fn text_changed(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.deadline = Some(now + self.interval);
        self.generation
    }

    /// When the pending build should fire, if one is pending
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Take the pending build once its deadline has passed
    pub fn fire(&mut self, now: Instant) -> Option<u64> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                Some(self.generation)
            }
            _ => None,
        }
    }

    /// Whether a finished build may report its diagnostics
    ///
    /// Accepting a generation rejects every older one from then on.
    pub fn accept(&mut self, generation: u64) -> bool {
        if generation <= self.applied {
            return false;
        }
        self.applied = generation;
        true
    }
}
