//! Session events.
//!
//! Inputs to [`crate::SessionMachine::handle`]. The bootstrap and credential
//! protocols produce these after their external call resolves; sign-out is
//! produced directly by the user.

use crate::SessionToken;

/// Sequence number issued for each sign-in attempt.
///
/// Tickets increase monotonically per machine. Under
/// [`crate::SignInOrdering::LatestIssued`] only the latest ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignInTicket(u64);

impl SignInTicket {
    pub(crate) fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Raw sequence number.
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Events processed by the session machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Bootstrap finished reading the token store.
    Restore {
        /// Stored token. `None` if absent or the read failed.
        token: Option<SessionToken>,
    },

    /// Identity provider accepted the credentials.
    SignInSucceeded {
        /// Ticket of the attempt that produced this result.
        ticket: SignInTicket,
        /// Token issued by the provider.
        token: SessionToken,
    },

    /// Identity provider rejected the credentials or failed.
    SignInFailed {
        /// Ticket of the attempt that produced this result.
        ticket: SignInTicket,
        /// Provider message, shown to the user unmodified.
        message: String,
    },

    /// User asked to sign out.
    SignOut,
}

impl SessionEvent {
    /// Short event name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Restore { .. } => "restore",
            Self::SignInSucceeded { .. } => "sign_in_succeeded",
            Self::SignInFailed { .. } => "sign_in_failed",
            Self::SignOut => "sign_out",
        }
    }

    /// Ticket carried by sign-in results. `None` for other events.
    pub fn sign_in_ticket(&self) -> Option<SignInTicket> {
        match self {
            Self::SignInSucceeded { ticket, .. } | Self::SignInFailed { ticket, .. } => {
                Some(*ticket)
            },
            Self::Restore { .. } | Self::SignOut => None,
        }
    }
}
