//! Terminal front end for the Barrio session controller.
//!
//! Wires a [`ConsoleDriver`] reading line commands, a Redb-backed token
//! store, and a [`LocalIdentityProvider`] into the generic
//! [`barrio_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
pub mod console;
mod error;

pub use account::{AccountSpec, LocalIdentityProvider};
pub use console::{ConsoleDriver, parse_command};
pub use error::{AccountSpecError, CommandError, ConsoleError};
