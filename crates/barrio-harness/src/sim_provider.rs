//! Simulated identity providers.
//!
//! - [`ScriptedIdentityProvider`]: answers immediately from an account table
//! - [`GatedIdentityProvider`]: parks every request until the test resolves
//!   it, so tests choose the order in which overlapping sign-ins complete

#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use barrio_core::{CredentialError, SessionToken, env::IdentityProvider};
use tokio::sync::{mpsc, oneshot};

/// Message returned for a wrong password.
pub const INVALID_PASSWORD: &str = "Invalid password";

/// Message returned for an unknown email.
pub const UNKNOWN_ACCOUNT: &str = "There is no user record corresponding to this identifier.";

#[derive(Clone)]
struct Account {
    password: String,
    token: SessionToken,
}

/// Identity provider backed by a fixed account table.
///
/// Clones share the table and the call counter.
#[derive(Clone, Default)]
pub struct ScriptedIdentityProvider {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    /// When set, every call fails with this message as `Unavailable`
    outage: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedIdentityProvider {
    /// Create a provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account that signs in with `password` and receives `token`.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<SessionToken>,
    ) -> Self {
        let account = Account { password: password.into(), token: token.into() };
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner).insert(email.into(), account);
        self
    }

    /// Fail every subsequent call as unavailable with `message`.
    pub fn set_outage(&self, message: Option<&str>) {
        *self.outage.lock().unwrap_or_else(PoisonError::into_inner) = message.map(str::to_string);
    }

    /// Number of sign-in calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn verify(&self, email: &str, password: &str) -> Result<SessionToken, CredentialError> {
        if let Some(message) = self.outage.lock().unwrap_or_else(PoisonError::into_inner).clone() {
            return Err(CredentialError::unavailable(message));
        }

        let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(account.token.clone()),
            Some(_) => Err(CredentialError::rejected(INVALID_PASSWORD)),
            None => Err(CredentialError::rejected(UNKNOWN_ACCOUNT)),
        }
    }
}

impl IdentityProvider for ScriptedIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionToken, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.verify(email, password)
    }
}

/// A sign-in request parked by a [`GatedIdentityProvider`].
pub struct PendingSignIn {
    /// Submitted email.
    pub email: String,
    /// Submitted password.
    pub password: String,
    responder: oneshot::Sender<Result<SessionToken, CredentialError>>,
}

impl PendingSignIn {
    /// Resolve the request with a token.
    pub fn succeed(self, token: impl Into<SessionToken>) {
        self.resolve(Ok(token.into()));
    }

    /// Reject the request with a provider message.
    pub fn fail(self, message: impl Into<String>) {
        self.resolve(Err(CredentialError::rejected(message)));
    }

    /// Resolve the request with an arbitrary result.
    pub fn resolve(self, result: Result<SessionToken, CredentialError>) {
        // Caller may have been dropped; nothing left to notify
        let _ = self.responder.send(result);
    }
}

impl std::fmt::Debug for PendingSignIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSignIn").field("email", &self.email).finish_non_exhaustive()
    }
}

/// Test-side handle receiving requests parked by a [`GatedIdentityProvider`].
pub struct SignInGate {
    requests: mpsc::UnboundedReceiver<PendingSignIn>,
}

impl SignInGate {
    /// Next parked request, in call order.
    ///
    /// Returns `None` once every provider clone has been dropped.
    pub async fn next(&mut self) -> Option<PendingSignIn> {
        self.requests.recv().await
    }
}

/// Identity provider whose calls complete only when the test says so.
#[derive(Clone)]
pub struct GatedIdentityProvider {
    requests: mpsc::UnboundedSender<PendingSignIn>,
}

impl GatedIdentityProvider {
    /// Create a provider and the gate that controls it.
    pub fn new() -> (Self, SignInGate) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { requests: tx }, SignInGate { requests: rx })
    }
}

impl IdentityProvider for GatedIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionToken, CredentialError> {
        let (responder, response) = oneshot::channel();
        let request =
            PendingSignIn { email: email.to_string(), password: password.to_string(), responder };

        if self.requests.send(request).is_err() {
            return Err(CredentialError::unavailable("identity provider gate closed"));
        }

        response
            .await
            .unwrap_or_else(|_| Err(CredentialError::unavailable("sign-in request abandoned")))
    }
}
