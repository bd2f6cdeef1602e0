//! Session invariants checked over recorded traces.
//!
//! Scenario tests pin down what happens for one chosen event order. The
//! checks here instead state what every trace must look like, so property
//! tests and the fuzzer can feed the machine any event order and still know
//! when it went wrong.
//!
//! A test records each event, whether the machine applied it, and the
//! snapshot that followed into a [`SessionTrace`]. [`InvariantRegistry`]
//! then runs each registered [`Invariant`] over the whole trace.
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let mut trace = SessionTrace::new(machine.snapshot());
//! let applied = machine.handle(event.clone()).is_ok();
//! trace.record(&event, applied, machine.snapshot());
//! registry.check_all(&trace)?;
//! ```

mod checks;
mod trace;

use std::fmt;

pub use checks::{ErrorOnlyAfterFailure, LoadingLeftOnce, ModeMatchesState, RevisionMonotonicity};
pub use trace::{SessionTrace, TraceStep};

/// Outcome of one invariant over one trace.
pub type InvariantResult = Result<(), Violation>;

/// A trace that broke an invariant.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Invariant that failed.
    pub invariant: &'static str,
    /// Where in the trace it failed and what was seen.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property every session trace must satisfy.
pub trait Invariant: Send + Sync {
    /// Short snake_case name used in violation reports.
    fn name(&self) -> &'static str;

    /// Inspect the whole trace and report the first offending step.
    fn check(&self, trace: &SessionTrace) -> InvariantResult;
}

/// Set of session invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with no invariants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four session invariants:
    /// [`ModeMatchesState`], [`ErrorOnlyAfterFailure`], [`LoadingLeftOnce`]
    /// and [`RevisionMonotonicity`].
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(ModeMatchesState);
        registry.add(ErrorOnlyAfterFailure);
        registry.add(LoadingLeftOnce);
        registry.add(RevisionMonotonicity);
        registry
    }

    /// Register one more invariant.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every invariant over `trace`.
    ///
    /// Each invariant reports at most one violation; all of them are
    /// collected rather than stopping at the first.
    pub fn check_all(&self, trace: &SessionTrace) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> =
            self.invariants.iter().filter_map(|invariant| invariant.check(trace).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Like [`InvariantRegistry::check_all`], but fails the calling test.
    ///
    /// The panic message names `context`, the number of steps recorded and
    /// every violation.
    #[allow(clippy::panic, reason = "Test assertion helper")]
    pub fn assert_all(&self, trace: &SessionTrace, context: &str) {
        let Err(violations) = self.check_all(trace) else {
            return;
        };

        let report: Vec<String> = violations.iter().map(Violation::to_string).collect();
        panic!(
            "session invariants broken {context} after {} steps:\n  {}",
            trace.steps.len(),
            report.join("\n  ")
        );
    }

    /// Registered invariant count.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
