//! Error types for the session core.
//!
//! One enum per concern: [`StorageError`] for the token store,
//! [`CredentialError`] for the identity provider, and [`SessionError`] for
//! events the machine refuses to apply. None of them is fatal to the session;
//! the controller classifies and recovers from each.

use thiserror::Error;

use crate::{Mode, SignInTicket};

/// Errors returned by a token store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Underlying storage system failed (file system, database, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Stored value could not be decoded
    #[error("corrupt value: {0}")]
    Corrupt(String),
}

/// Errors returned by an identity provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Provider rejected the credentials (wrong password, unknown account)
    #[error("{message}")]
    Rejected {
        /// Provider message, shown to the user
        message: String,
    },

    /// Provider could not be reached or failed internally
    #[error("{message}")]
    Unavailable {
        /// Provider message, shown to the user
        message: String,
    },
}

impl CredentialError {
    /// Rejection with the given provider message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected { message: message.into() }
    }

    /// Provider failure with the given message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    /// Human-readable message, passed through unmodified for display.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message } | Self::Unavailable { message } => message,
        }
    }

    /// Returns true if retrying the same credentials may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Events the session machine refuses to apply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Event is not valid in the current mode
    #[error("invalid transition: cannot {event} while {mode}")]
    InvalidTransition {
        /// Mode when the event arrived
        mode: Mode,
        /// Name of the rejected event
        event: &'static str,
    },

    /// Sign-in result from an attempt that is no longer the latest
    #[error("stale sign-in result: ticket {} superseded by {}", ticket.seq(), latest.seq())]
    StaleSignIn {
        /// Ticket of the discarded result
        ticket: SignInTicket,
        /// Latest ticket issued
        latest: SignInTicket,
    },
}
