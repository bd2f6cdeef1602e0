//! Application layer for Barrio
//!
//! Drives the pure [`barrio_core::SessionMachine`] against real collaborators
//! and decides which screens the client mounts.
//!
//! # Components
//!
//! - [`SessionController`]: Runs the bootstrap and credential protocols and
//!   publishes snapshots
//! - [`route`]: Presentation router (snapshot to [`ScreenSet`])
//! - [`Driver`]: Trait for platform-specific input and rendering
//! - [`Runtime`]: Generic loop tying driver, router and controller together

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod controller;
mod driver;
mod intent;
mod router;
mod runtime;

pub use controller::SessionController;
pub use driver::Driver;
pub use intent::UserIntent;
pub use router::{Screen, ScreenSet, route};
pub use runtime::Runtime;
