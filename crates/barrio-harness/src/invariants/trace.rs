//! Recorded session history for invariant checking.
//!
//! Invariants operate on a trace rather than on the live machine so that
//! properties spanning several transitions (like "loading is left once") can
//! be checked after the fact.

use barrio_core::{SessionEvent, SessionSnapshot};

/// One recorded step.
#[derive(Debug, Clone)]
pub struct TraceStep {
    /// Name of the event fed to the machine.
    pub event: &'static str,
    /// `true` if the machine accepted the event.
    pub applied: bool,
    /// Snapshot observed after the event.
    pub snapshot: SessionSnapshot,
}

/// Initial snapshot followed by every recorded step.
#[derive(Debug, Clone)]
pub struct SessionTrace {
    /// Snapshot before the first event.
    pub initial: SessionSnapshot,
    /// Steps in application order.
    pub steps: Vec<TraceStep>,
}

impl SessionTrace {
    /// Start a trace at `initial`.
    pub fn new(initial: SessionSnapshot) -> Self {
        Self { initial, steps: Vec::new() }
    }

    /// Record an event and the snapshot that followed it.
    pub fn record(&mut self, event: &SessionEvent, applied: bool, snapshot: SessionSnapshot) {
        self.steps.push(TraceStep { event: event.name(), applied, snapshot });
    }

    /// Every snapshot, starting with the initial one.
    pub fn snapshots(&self) -> impl Iterator<Item = &SessionSnapshot> {
        std::iter::once(&self.initial).chain(self.steps.iter().map(|s| &s.snapshot))
    }
}
