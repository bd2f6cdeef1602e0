//! Simulation harness for Barrio session testing.
//!
//! In-process implementations of the external collaborators, so the
//! controller and runtime can be exercised deterministically.
//!
//! # Model-Based Testing
//!
//! The `model` module holds a flag-based reference session. Operations are
//! applied to both the model and the real [`barrio_core::SessionMachine`],
//! and their observable states are compared.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties over a
//! [`SessionTrace`]. Use [`InvariantRegistry::standard()`] for the session
//! invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod sim_driver;
pub mod sim_provider;

pub use barrio_store::MemoryTokenStore;
pub use invariants::{
    ErrorOnlyAfterFailure, Invariant, InvariantRegistry, InvariantResult, LoadingLeftOnce,
    ModeMatchesState, RevisionMonotonicity, SessionTrace, TraceStep, Violation,
};
pub use model::{ModelSession, ObservableState, Operation};
pub use sim_driver::{RenderLog, RenderedFrame, SimDriver, SimDriverError};
pub use sim_provider::{
    GatedIdentityProvider, INVALID_PASSWORD, PendingSignIn, ScriptedIdentityProvider, SignInGate,
    UNKNOWN_ACCOUNT,
};
