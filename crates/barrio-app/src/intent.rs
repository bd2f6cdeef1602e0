//! User intents forwarded from screens.

use barrio_core::Credentials;

/// Requests the presentation layer forwards to the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    /// Credential form was submitted.
    SubmitCredentials(Credentials),

    /// Sign-out control was pressed.
    SignOut,

    /// Redraw the current screens without changing the session.
    Refresh,

    /// Quit the application.
    Quit,
}
