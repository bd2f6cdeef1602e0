//! The four invariants of [`InvariantRegistry::standard`](super::InvariantRegistry::standard).

use barrio_core::Mode;

use super::{Invariant, InvariantResult, SessionTrace, Violation};

/// Mode, loading flag and token must agree in every snapshot.
///
/// `loading` iff mode is `Loading`; a token iff mode is `SignedIn`; no token
/// and no error while loading.
pub struct ModeMatchesState;

impl Invariant for ModeMatchesState {
    fn name(&self) -> &'static str {
        "mode_matches_state"
    }

    fn check(&self, trace: &SessionTrace) -> InvariantResult {
        for snapshot in trace.snapshots() {
            let mode = snapshot.mode();
            let consistent = snapshot.is_loading() == (mode == Mode::Loading)
                && snapshot.token().is_some() == (mode == Mode::SignedIn)
                && !(snapshot.is_loading() && snapshot.last_error().is_some());

            if !consistent {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "revision {}: mode {mode} with loading={} token={} error={:?}",
                        snapshot.revision(),
                        snapshot.is_loading(),
                        snapshot.token().is_some(),
                        snapshot.last_error()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// An error message is only visible right after a failed sign-in.
///
/// Any other applied transition clears it; rejected events leave the
/// snapshot exactly as it was.
pub struct ErrorOnlyAfterFailure;

impl Invariant for ErrorOnlyAfterFailure {
    fn name(&self) -> &'static str {
        "error_only_after_failure"
    }

    fn check(&self, trace: &SessionTrace) -> InvariantResult {
        if trace.initial.last_error().is_some() {
            return Err(Violation {
                invariant: self.name(),
                message: "initial snapshot carries an error".to_string(),
            });
        }

        let mut previous = &trace.initial;
        for (index, step) in trace.steps.iter().enumerate() {
            let error = step.snapshot.last_error();

            if !step.applied && step.snapshot != *previous {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("step {index}: rejected {} changed the snapshot", step.event),
                });
            }

            if step.applied && step.event != "sign_in_failed" && error.is_some() {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("step {index}: {} left error {error:?}", step.event),
                });
            }

            previous = &step.snapshot;
        }
        Ok(())
    }
}

/// Bootstrap completes at most once.
///
/// After the first non-loading snapshot, `Loading` never comes back.
pub struct LoadingLeftOnce;

impl Invariant for LoadingLeftOnce {
    fn name(&self) -> &'static str {
        "loading_left_once"
    }

    fn check(&self, trace: &SessionTrace) -> InvariantResult {
        let mut left_at = None;
        for snapshot in trace.snapshots() {
            match (snapshot.is_loading(), left_at) {
                (false, None) => left_at = Some(snapshot.revision()),
                (true, Some(revision)) => {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "loading again at revision {} after leaving at {revision}",
                            snapshot.revision()
                        ),
                    });
                },
                _ => {},
            }
        }
        Ok(())
    }
}

/// Revisions advance by one per applied event and never otherwise.
pub struct RevisionMonotonicity;

impl Invariant for RevisionMonotonicity {
    fn name(&self) -> &'static str {
        "revision_monotonicity"
    }

    fn check(&self, trace: &SessionTrace) -> InvariantResult {
        let mut previous = trace.initial.revision();
        for (index, step) in trace.steps.iter().enumerate() {
            let expected = if step.applied { previous + 1 } else { previous };
            let actual = step.snapshot.revision();

            if actual != expected {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "step {index} ({}): revision {previous} → {actual}, expected {expected}",
                        step.event
                    ),
                });
            }
            previous = actual;
        }
        Ok(())
    }
}
