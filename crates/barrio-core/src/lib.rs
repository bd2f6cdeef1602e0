//! Session core
//!
//! Pure state machine deciding which of the three UI modes (splash,
//! signed-out, signed-in) the client is in. Follows the action pattern: the
//! [`SessionMachine`] consumes [`SessionEvent`]s, never performs I/O, and
//! returns [`SessionAction`]s for the caller to execute.
//!
//! # Components
//!
//! - [`SessionMachine`]: The reducer and sign-in ticket issuer
//! - [`SessionState`]: Tagged session state (`Loading | SignedOut | SignedIn`)
//! - [`SessionSnapshot`]: Read-only view handed to presentation code
//! - [`env`]: Contracts of the external collaborators (token store, identity
//!   provider)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
pub mod env;
mod error;
mod event;
mod machine;
mod state;
mod token;

pub use action::SessionAction;
pub use config::{DEFAULT_TOKEN_KEY, SessionConfig, SignInOrdering, TokenPersistence};
pub use error::{CredentialError, SessionError, StorageError};
pub use event::{SessionEvent, SignInTicket};
pub use machine::SessionMachine;
pub use state::{Mode, SessionSnapshot, SessionState};
pub use token::{Credentials, SessionToken};
