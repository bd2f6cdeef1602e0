//! Fuzz target for the session reducer
//!
//! # Strategy
//!
//! - Arbitrary operation streams, including restores after bootstrap
//! - Both persistence policies and both sign-in orderings
//! - Stale tickets: optionally issue extra tickets before each result
//!
//! # Invariants
//!
//! - Standard invariant registry holds after every step
//! - Rejected events leave the snapshot untouched
//! - ReadOnly never requests a store write

#![no_main]

use arbitrary::Arbitrary;
use barrio_core::{
    SessionAction, SessionConfig, SessionMachine, SignInOrdering, TokenPersistence,
};
use barrio_harness::{InvariantRegistry, Operation, SessionTrace};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    read_write: bool,
    latest_issued: bool,
    steps: Vec<Step>,
}

#[derive(Debug, Arbitrary)]
struct Step {
    op: Operation,
    /// Tickets issued and abandoned before this step
    overtaken_by: u8,
}

fuzz_target!(|input: Input| {
    let config = SessionConfig {
        persistence: if input.read_write {
            TokenPersistence::ReadWrite
        } else {
            TokenPersistence::ReadOnly
        },
        ordering: if input.latest_issued {
            SignInOrdering::LatestIssued
        } else {
            SignInOrdering::CompletionOrder
        },
        ..SessionConfig::default()
    };
    let mut machine = SessionMachine::new(config);
    let mut trace = SessionTrace::new(machine.snapshot());
    let invariants = InvariantRegistry::standard();

    for step in input.steps {
        let event = step.op.to_event(&mut machine);
        for _ in 0..step.overtaken_by % 4 {
            let _ = machine.begin_sign_in();
        }

        let before = machine.snapshot();
        let result = machine.handle(event.clone());

        match &result {
            Ok(actions) => {
                if !input.read_write {
                    assert!(
                        !actions.iter().any(SessionAction::is_store_write),
                        "read-only machine requested a store write: {actions:?}"
                    );
                }
            }
            Err(_) => assert_eq!(machine.snapshot(), before, "rejected event changed state"),
        }

        trace.record(&event, result.is_ok(), machine.snapshot());
        invariants.assert_all(&trace, "session_reducer_fuzzer");
    }
});
