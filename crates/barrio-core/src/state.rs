//! Session state and its observable view.
//!
//! [`SessionState`] is the single source of truth owned by the machine. It is
//! a tagged variant, so a token can only exist in `SignedIn` and an error
//! message only in `SignedOut`. [`SessionSnapshot`] is the copy handed to
//! presentation code; every field it exposes is derived from the state.

use std::fmt;

use crate::SessionToken;

/// Which screen set the application shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Bootstrap has not finished; show the splash placeholder.
    Loading,
    /// No session; show the credential form.
    SignedOut,
    /// Authenticated; show the application.
    SignedIn,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::SignedOut => "signed-out",
            Self::SignedIn => "signed-in",
        };
        f.write_str(name)
    }
}

/// Session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the bootstrap protocol to restore from storage.
    Loading,
    /// Signed out, possibly after a failed sign-in.
    SignedOut {
        /// Provider message from the most recent failed sign-in.
        last_error: Option<String>,
    },
    /// Signed in with the given token.
    SignedIn {
        /// Token returned by the identity provider or restored from storage.
        token: SessionToken,
    },
}

impl SessionState {
    /// Mode derived from the variant.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Loading => Mode::Loading,
            Self::SignedOut { .. } => Mode::SignedOut,
            Self::SignedIn { .. } => Mode::SignedIn,
        }
    }

    /// Current token. `None` unless signed in.
    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Self::SignedIn { token } => Some(token),
            Self::Loading | Self::SignedOut { .. } => None,
        }
    }

    /// Message from the last failed sign-in. `None` if the last transition
    /// was anything else.
    pub fn last_error(&self) -> Option<&str> {
        match self {
            Self::SignedOut { last_error } => last_error.as_deref(),
            Self::Loading | Self::SignedIn { .. } => None,
        }
    }
}

/// Point-in-time view of the session for presentation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    state: SessionState,
    revision: u64,
}

impl SessionSnapshot {
    pub(crate) fn new(state: SessionState, revision: u64) -> Self {
        Self { state, revision }
    }

    /// Snapshot of a machine that has not been bootstrapped yet.
    pub fn initial() -> Self {
        Self::new(SessionState::Loading, 0)
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// `true` only before bootstrap completes.
    pub fn is_loading(&self) -> bool {
        self.mode() == Mode::Loading
    }

    /// Current token. `None` unless signed in.
    pub fn token(&self) -> Option<&SessionToken> {
        self.state.token()
    }

    /// Message from the last failed sign-in, for display on the form.
    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    /// Number of transitions applied before this snapshot was taken.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Underlying session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_is_loading() {
        let snapshot = SessionSnapshot::initial();
        assert_eq!(snapshot.mode(), Mode::Loading);
        assert!(snapshot.is_loading());
        assert!(snapshot.token().is_none());
        assert!(snapshot.last_error().is_none());
        assert_eq!(snapshot.revision(), 0);
    }

    #[test]
    fn fields_follow_variant() {
        let signed_in = SessionState::SignedIn { token: SessionToken::new("tok") };
        assert_eq!(signed_in.mode(), Mode::SignedIn);
        assert_eq!(signed_in.token().map(SessionToken::as_str), Some("tok"));
        assert!(signed_in.last_error().is_none());

        let failed = SessionState::SignedOut { last_error: Some("nope".into()) };
        assert_eq!(failed.mode(), Mode::SignedOut);
        assert!(failed.token().is_none());
        assert_eq!(failed.last_error(), Some("nope"));
    }
}
