//! Local identity provider.
//!
//! Verifies credentials against an account table given on the command line.
//! No network calls are made.

use std::{collections::HashMap, str::FromStr};

use barrio_core::{CredentialError, SessionToken, env::IdentityProvider};

use crate::AccountSpecError;

/// Message returned for a wrong password.
pub const WRONG_PASSWORD: &str = "Invalid password";

/// Message returned for an unknown email.
pub const NO_SUCH_ACCOUNT: &str = "There is no user record corresponding to this identifier.";

/// One `--account email:password:token` value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountSpec {
    /// Login email.
    pub email: String,
    /// Expected password.
    pub password: String,
    /// Token issued on success.
    pub token: SessionToken,
}

impl std::fmt::Debug for AccountSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSpec").field("email", &self.email).finish_non_exhaustive()
    }
}

impl FromStr for AccountSpec {
    type Err = AccountSpecError;

    /// Parse `email:password:token`. The token is everything after the second
    /// `:`, so it may itself contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(email), Some(password), Some(token)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AccountSpecError::Malformed(s.to_string()));
        };

        for (field, value) in [("email", email), ("password", password), ("token", token)] {
            if value.is_empty() {
                return Err(AccountSpecError::EmptyField(field));
            }
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
            token: SessionToken::new(token),
        })
    }
}

/// Identity provider backed by a fixed account table.
#[derive(Debug, Clone, Default)]
pub struct LocalIdentityProvider {
    accounts: HashMap<String, AccountSpec>,
}

impl LocalIdentityProvider {
    /// Build a provider from parsed account specs. Later duplicates win.
    pub fn new(accounts: impl IntoIterator<Item = AccountSpec>) -> Self {
        let accounts = accounts.into_iter().map(|a| (a.email.clone(), a)).collect();
        Self { accounts }
    }

    /// Number of known accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// `true` if no account can sign in.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionToken, CredentialError> {
        match self.accounts.get(email) {
            Some(account) if account.password == password => Ok(account.token.clone()),
            Some(_) => Err(CredentialError::rejected(WRONG_PASSWORD)),
            None => Err(CredentialError::rejected(NO_SUCH_ACCOUNT)),
        }
    }
}
