//! Session configuration.

/// Store key the bootstrap protocol reads the token from.
pub const DEFAULT_TOKEN_KEY: &str = "userToken";

/// Whether the machine asks for token store writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPersistence {
    /// Only read the store during bootstrap. Sign-in and sign-out change
    /// in-memory state only.
    #[default]
    ReadOnly,
    /// Persist the token on sign-in success and clear it on sign-out or a
    /// failed sign-in, so the next bootstrap sees the same session.
    ReadWrite,
}

/// How results of overlapping sign-in attempts are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInOrdering {
    /// Results apply in the order they resolve. The last one wins, even if it
    /// resolves after a sign-out.
    #[default]
    CompletionOrder,
    /// Only the most recently issued attempt may apply. Sign-out supersedes
    /// every attempt in flight.
    LatestIssued,
}

/// Session machine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Token store key
    pub token_key: String,
    /// Store write policy
    pub persistence: TokenPersistence,
    /// Overlapping sign-in policy
    pub ordering: SignInOrdering,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            persistence: TokenPersistence::default(),
            ordering: SignInOrdering::default(),
        }
    }
}
