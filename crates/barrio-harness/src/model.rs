//! Flag-based reference model of the session.
//!
//! Tracks the session as independent flags (`is_loading`, `is_signout`,
//! `user_token`, `login_errors`) and derives the mode the way a screen
//! router would. The real machine uses a tagged variant instead; feeding the
//! same [`Operation`]s to both and comparing [`ObservableState`] checks that
//! the two encodings agree.

use arbitrary::Arbitrary;
use barrio_core::{Mode, SessionEvent, SessionMachine, SessionSnapshot, SessionToken};

/// Operation applied to both the model and the machine.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Bootstrap finished with an optional stored token.
    Restore {
        /// Token seed. `Some(0)` models an empty stored value.
        token: Option<u8>,
    },
    /// Provider accepted the credentials.
    SignInOk {
        /// Token seed.
        token: u8,
    },
    /// Provider rejected the credentials.
    SignInErr {
        /// Message seed.
        message: u8,
    },
    /// User signed out.
    SignOut,
}

fn token_string(seed: u8) -> String {
    if seed == 0 { String::new() } else { format!("tok-{seed}") }
}

fn message_string(seed: u8) -> String {
    format!("error {seed}")
}

impl Operation {
    /// Convert into a machine event, issuing a ticket for sign-in results.
    pub fn to_event(&self, machine: &mut SessionMachine) -> SessionEvent {
        match self {
            Self::Restore { token } => {
                SessionEvent::Restore { token: token.map(|s| SessionToken::new(token_string(s))) }
            },
            Self::SignInOk { token } => SessionEvent::SignInSucceeded {
                ticket: machine.begin_sign_in(),
                token: SessionToken::new(token_string(*token)),
            },
            Self::SignInErr { message } => SessionEvent::SignInFailed {
                ticket: machine.begin_sign_in(),
                message: message_string(*message),
            },
            Self::SignOut => SessionEvent::SignOut,
        }
    }
}

/// What presentation code can observe about a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Current mode.
    pub mode: Mode,
    /// Raw token, if signed in.
    pub token: Option<String>,
    /// Error shown on the form.
    pub last_error: Option<String>,
}

impl ObservableState {
    /// Observable state of a machine snapshot.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            mode: snapshot.mode(),
            token: snapshot.token().map(|t| t.as_str().to_string()),
            last_error: snapshot.last_error().map(str::to_string),
        }
    }
}

/// Flag-based reference session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSession {
    /// Bootstrap has not run yet.
    pub is_loading: bool,
    /// Last transition was a sign-out or failed sign-in.
    pub is_signout: bool,
    /// Current token.
    pub user_token: Option<String>,
    /// Last sign-in error.
    pub login_errors: Option<String>,
}

impl Default for ModelSession {
    fn default() -> Self {
        Self { is_loading: true, is_signout: false, user_token: None, login_errors: None }
    }
}

impl ModelSession {
    /// Create a model in the loading state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation. Returns `false` if the model rejected it.
    pub fn apply(&mut self, op: &Operation) -> bool {
        match op {
            Operation::Restore { token } => {
                if !self.is_loading {
                    return false;
                }
                self.is_loading = false;
                self.user_token = token.map(token_string);
                self.login_errors = None;
            },
            Operation::SignInOk { token } => {
                self.is_loading = false;
                self.is_signout = false;
                self.user_token = Some(token_string(*token));
                self.login_errors = None;
            },
            Operation::SignInErr { message } => {
                self.is_loading = false;
                self.is_signout = true;
                self.user_token = None;
                self.login_errors = Some(message_string(*message));
            },
            Operation::SignOut => {
                self.is_loading = false;
                self.is_signout = true;
                self.user_token = None;
                self.login_errors = None;
            },
        }
        true
    }

    /// Mode as a screen router derives it from the flags.
    pub fn mode(&self) -> Mode {
        if self.is_loading {
            Mode::Loading
        } else if self.user_token.is_none() {
            Mode::SignedOut
        } else {
            Mode::SignedIn
        }
    }

    /// Observable state of the model.
    pub fn observable(&self) -> ObservableState {
        ObservableState {
            mode: self.mode(),
            token: self.user_token.clone(),
            last_error: self.login_errors.clone(),
        }
    }
}
