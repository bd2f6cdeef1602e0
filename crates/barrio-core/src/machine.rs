//! Session state machine.
//!
//! Pure reducer over [`SessionState`]. Takes [`SessionEvent`]s and returns
//! [`SessionAction`]s for the controller to execute. No I/O, no clocks, no
//! async: the same event sequence always yields the same states.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────┐  Restore(None)   ┌───────────┐
//! │ Loading │─────────────────>│ SignedOut │
//! └─────────┘                  └───────────┘
//!      │                         │       ↑
//!      │ Restore(tok)            │       │ SignInFailed / SignOut
//!      ↓         SignInSucceeded │       │ (from any mode)
//! ┌──────────┐ <─────────────────┘       │
//! │ SignedIn │───────────────────────────┘
//! └──────────┘
//! ```
//!
//! `Loading` is left at most once. Every successful transition bumps the
//! snapshot revision and starts its action list with
//! [`SessionAction::Publish`].

use crate::{
    Mode, SessionAction, SessionConfig, SessionError, SessionEvent, SessionSnapshot, SessionState,
    SessionToken, SignInOrdering, SignInTicket, TokenPersistence,
};

/// Session state machine
///
/// Owns the session state exclusively. Callers only observe it through
/// [`SessionMachine::snapshot`] and only change it through
/// [`SessionMachine::handle`].
#[derive(Debug, Clone)]
pub struct SessionMachine {
    /// Current state
    state: SessionState,
    /// Configuration
    config: SessionConfig,
    /// Transitions applied so far
    revision: u64,
    /// Latest sign-in ticket issued (0 = none)
    issued: u64,
    /// Tickets at or below this were superseded by a sign-out
    superseded_through: u64,
}

impl SessionMachine {
    /// Create a machine in [`SessionState::Loading`].
    pub fn new(config: SessionConfig) -> Self {
        Self { state: SessionState::Loading, config, revision: 0, issued: 0, superseded_through: 0 }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// Configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Copy of the current state for observers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.state.clone(), self.revision)
    }

    /// Issue a ticket for a new sign-in attempt.
    ///
    /// The result of the attempt must carry this ticket. Issuing does not
    /// change the observable state.
    pub fn begin_sign_in(&mut self) -> SignInTicket {
        self.issued += 1;
        SignInTicket::new(self.issued)
    }

    /// Apply an event.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidTransition` if `Restore` arrives outside
    ///   `Loading`
    /// - `SessionError::StaleSignIn` if a sign-in result was superseded
    ///   (only with [`SignInOrdering::LatestIssued`])
    ///
    /// State is unchanged when an error is returned.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Vec<SessionAction>, SessionError> {
        if let Some(ticket) = event.sign_in_ticket() {
            self.check_ticket(ticket)?;
        }

        match event {
            SessionEvent::Restore { token } => {
                if self.state != SessionState::Loading {
                    return Err(SessionError::InvalidTransition {
                        mode: self.mode(),
                        event: "restore",
                    });
                }

                self.state = match token {
                    Some(token) => SessionState::SignedIn { token },
                    None => SessionState::SignedOut { last_error: None },
                };
                Ok(self.commit(None))
            },
            SessionEvent::SignInSucceeded { token, .. } => {
                let write = self.persist(&token);
                self.state = SessionState::SignedIn { token };
                Ok(self.commit(write))
            },
            SessionEvent::SignInFailed { message, .. } => {
                self.state = SessionState::SignedOut { last_error: Some(message) };
                let write = self.clear();
                Ok(self.commit(write))
            },
            SessionEvent::SignOut => {
                if self.config.ordering == SignInOrdering::LatestIssued {
                    self.superseded_through = self.issued;
                }
                self.state = SessionState::SignedOut { last_error: None };
                let write = self.clear();
                Ok(self.commit(write))
            },
        }
    }

    fn check_ticket(&self, ticket: SignInTicket) -> Result<(), SessionError> {
        if self.config.ordering == SignInOrdering::CompletionOrder {
            return Ok(());
        }

        let seq = ticket.seq();
        if seq != self.issued || seq <= self.superseded_through {
            return Err(SessionError::StaleSignIn {
                ticket,
                latest: SignInTicket::new(self.issued),
            });
        }
        Ok(())
    }

    fn persist(&self, token: &SessionToken) -> Option<SessionAction> {
        match self.config.persistence {
            TokenPersistence::ReadOnly => None,
            TokenPersistence::ReadWrite => Some(SessionAction::PersistToken {
                key: self.config.token_key.clone(),
                token: token.clone(),
            }),
        }
    }

    fn clear(&self) -> Option<SessionAction> {
        match self.config.persistence {
            TokenPersistence::ReadOnly => None,
            TokenPersistence::ReadWrite => {
                Some(SessionAction::ClearStoredToken { key: self.config.token_key.clone() })
            },
        }
    }

    fn commit(&mut self, write: Option<SessionAction>) -> Vec<SessionAction> {
        self.revision += 1;
        let mut actions = vec![SessionAction::Publish];
        actions.extend(write);
        actions
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(raw: &str) -> SessionToken {
        SessionToken::new(raw)
    }

    fn signed_in(raw: &str) -> SessionMachine {
        let mut machine = SessionMachine::default();
        let _ = machine.handle(SessionEvent::Restore { token: Some(token(raw)) });
        machine
    }

    fn read_write() -> SessionConfig {
        SessionConfig { persistence: TokenPersistence::ReadWrite, ..SessionConfig::default() }
    }

    fn latest_issued() -> SessionConfig {
        SessionConfig { ordering: SignInOrdering::LatestIssued, ..SessionConfig::default() }
    }

    #[test]
    fn restore_without_token_signs_out() {
        let mut machine = SessionMachine::default();
        let actions = machine.handle(SessionEvent::Restore { token: None }).unwrap();

        assert_eq!(actions, vec![SessionAction::Publish]);
        assert_eq!(machine.state(), &SessionState::SignedOut { last_error: None });
    }

    #[test]
    fn restore_with_token_signs_in() {
        let machine = signed_in("tok-123");

        assert_eq!(machine.mode(), Mode::SignedIn);
        assert_eq!(machine.snapshot().token(), Some(&token("tok-123")));
    }

    #[test]
    fn restore_with_empty_token_signs_in() {
        let mut machine = SessionMachine::default();
        machine.handle(SessionEvent::Restore { token: Some(token("")) }).unwrap();

        // Tokens are opaque; only an absent value means signed out
        assert_eq!(machine.mode(), Mode::SignedIn);
        assert_eq!(machine.snapshot().token(), Some(&token("")));
    }

    #[test]
    fn second_restore_is_rejected() {
        let mut machine = signed_in("tok-123");
        let before = machine.snapshot();

        let result = machine.handle(SessionEvent::Restore { token: None });

        assert!(matches!(
            result,
            Err(SessionError::InvalidTransition { mode: Mode::SignedIn, event: "restore" })
        ));
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn failed_sign_in_records_message() {
        let mut machine = signed_in("tok-123");
        let ticket = machine.begin_sign_in();

        machine
            .handle(SessionEvent::SignInFailed { ticket, message: "Invalid password".into() })
            .unwrap();

        let snapshot = machine.snapshot();
        assert_eq!(snapshot.mode(), Mode::SignedOut);
        assert!(snapshot.token().is_none());
        assert_eq!(snapshot.last_error(), Some("Invalid password"));
    }

    #[test]
    fn any_later_transition_clears_error() {
        let mut machine = SessionMachine::default();
        machine.handle(SessionEvent::Restore { token: None }).unwrap();
        let ticket = machine.begin_sign_in();
        machine.handle(SessionEvent::SignInFailed { ticket, message: "nope".into() }).unwrap();

        machine.handle(SessionEvent::SignOut).unwrap();
        assert!(machine.snapshot().last_error().is_none());

        let ticket = machine.begin_sign_in();
        machine.handle(SessionEvent::SignInFailed { ticket, message: "nope".into() }).unwrap();
        let ticket = machine.begin_sign_in();
        machine.handle(SessionEvent::SignInSucceeded { ticket, token: token("tok-456") }).unwrap();
        assert!(machine.snapshot().last_error().is_none());
    }

    #[test]
    fn sign_in_allowed_while_loading() {
        let mut machine = SessionMachine::default();
        let ticket = machine.begin_sign_in();
        machine.handle(SessionEvent::SignInSucceeded { ticket, token: token("tok") }).unwrap();

        assert_eq!(machine.mode(), Mode::SignedIn);
        // Loading was left, so bootstrap can no longer apply
        assert!(machine.handle(SessionEvent::Restore { token: None }).is_err());
    }

    #[test]
    fn sign_out_has_no_store_write_by_default() {
        let mut machine = signed_in("tok-456");
        let actions = machine.handle(SessionEvent::SignOut).unwrap();

        assert_eq!(actions, vec![SessionAction::Publish]);
        assert_eq!(machine.state(), &SessionState::SignedOut { last_error: None });
    }

    #[test]
    fn read_write_persists_and_clears() {
        let mut machine = SessionMachine::new(read_write());
        machine.handle(SessionEvent::Restore { token: None }).unwrap();

        let ticket = machine.begin_sign_in();
        let actions = machine
            .handle(SessionEvent::SignInSucceeded { ticket, token: token("tok-456") })
            .unwrap();
        assert_eq!(actions, vec![
            SessionAction::Publish,
            SessionAction::PersistToken { key: "userToken".into(), token: token("tok-456") },
        ]);

        let actions = machine.handle(SessionEvent::SignOut).unwrap();
        assert_eq!(actions, vec![SessionAction::Publish, SessionAction::ClearStoredToken {
            key: "userToken".into()
        }]);
    }

    #[test]
    fn restore_never_writes() {
        let mut machine = SessionMachine::new(read_write());
        let actions = machine.handle(SessionEvent::Restore { token: Some(token("t")) }).unwrap();

        assert!(!actions.iter().any(SessionAction::is_store_write));
    }

    #[test]
    fn completion_order_applies_last_result() {
        let mut machine = signed_in("old");
        let first = machine.begin_sign_in();
        let second = machine.begin_sign_in();

        machine.handle(SessionEvent::SignInSucceeded { ticket: second, token: token("b") }).unwrap();
        machine.handle(SessionEvent::SignInSucceeded { ticket: first, token: token("a") }).unwrap();

        assert_eq!(machine.snapshot().token(), Some(&token("a")));
    }

    #[test]
    fn latest_issued_discards_superseded_result() {
        let mut machine = SessionMachine::new(latest_issued());
        machine.handle(SessionEvent::Restore { token: None }).unwrap();
        let first = machine.begin_sign_in();
        let second = machine.begin_sign_in();

        machine.handle(SessionEvent::SignInSucceeded { ticket: second, token: token("b") }).unwrap();
        let before = machine.snapshot();
        let result =
            machine.handle(SessionEvent::SignInFailed { ticket: first, message: "late".into() });

        assert!(matches!(result, Err(SessionError::StaleSignIn { .. })));
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn latest_issued_sign_out_supersedes_in_flight() {
        let mut machine = SessionMachine::new(latest_issued());
        machine.handle(SessionEvent::Restore { token: None }).unwrap();
        let ticket = machine.begin_sign_in();
        machine.handle(SessionEvent::SignOut).unwrap();

        let result = machine.handle(SessionEvent::SignInSucceeded { ticket, token: token("t") });

        assert!(result.is_err());
        assert_eq!(machine.mode(), Mode::SignedOut);
    }

    #[test]
    fn revision_counts_applied_transitions() {
        let mut machine = SessionMachine::default();
        assert_eq!(machine.snapshot().revision(), 0);

        machine.handle(SessionEvent::Restore { token: None }).unwrap();
        let _ = machine.handle(SessionEvent::Restore { token: None });
        machine.handle(SessionEvent::SignOut).unwrap();

        assert_eq!(machine.snapshot().revision(), 2);
    }
}
