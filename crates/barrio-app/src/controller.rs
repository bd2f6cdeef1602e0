//! Session controller.
//!
//! The [`SessionController`] owns the [`SessionMachine`] and runs the two
//! asynchronous protocols that feed it:
//!
//! - **Bootstrap** ([`SessionController::restore`]): reads the persisted token
//!   once at startup. A failed read is treated as "no token".
//! - **Credentials** ([`SessionController::sign_in`]): asks the identity
//!   provider and applies the result.
//!
//! Sign-out is synchronous. Reduction and publication happen under the same
//! lock, which is never held across an `.await`, so observers only ever see
//! settled snapshots.

#![allow(clippy::disallowed_types, reason = "Lock is never held across an await")]

use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use barrio_core::{
    Credentials, SessionAction, SessionConfig, SessionEvent, SessionMachine, SessionSnapshot,
    SessionToken,
    env::{IdentityProvider, TokenStore},
};
use tokio::sync::watch;

/// Store write requested by the machine and not yet executed.
#[derive(Clone, PartialEq, Eq)]
enum StoreWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

// Values are tokens; keep them out of logs
impl fmt::Debug for StoreWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { key, .. } => write!(f, "Set({key})"),
            Self::Remove { key } => write!(f, "Remove({key})"),
        }
    }
}

struct Inner {
    machine: SessionMachine,
    bootstrap_started: bool,
    pending_writes: Vec<StoreWrite>,
}

/// Session controller
///
/// Shared by reference (usually behind an `Arc`) with every component that
/// needs the session. All methods take `&self`, so sign-in attempts may
/// overlap with each other and with sign-out.
pub struct SessionController<S, P>
where
    S: TokenStore,
    P: IdentityProvider,
{
    store: S,
    provider: P,
    inner: Mutex<Inner>,
    publisher: watch::Sender<SessionSnapshot>,
    /// Serializes store flushes so writes reach the store in request order
    flush_lock: tokio::sync::Mutex<()>,
}

impl<S, P> SessionController<S, P>
where
    S: TokenStore,
    P: IdentityProvider,
{
    /// Create a controller in `Loading` mode.
    pub fn new(store: S, provider: P, config: SessionConfig) -> Self {
        let machine = SessionMachine::new(config);
        let (publisher, _) = watch::channel(machine.snapshot());
        let inner = Inner { machine, bootstrap_started: false, pending_writes: Vec::new() };

        Self {
            store,
            provider,
            inner: Mutex::new(inner),
            publisher,
            flush_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.publisher.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    ///
    /// The receiver is notified once per applied transition and always holds
    /// the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    /// Configuration the machine was created with.
    pub fn config(&self) -> SessionConfig {
        self.lock().machine.config().clone()
    }

    /// Token store the controller reads from.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of store writes queued and not yet flushed.
    pub fn pending_store_writes(&self) -> usize {
        self.lock().pending_writes.len()
    }

    /// Restore the session from the token store.
    ///
    /// Runs the bootstrap protocol at most once per controller. Later calls
    /// return the current snapshot without touching the store. Storage
    /// errors are logged and treated as "no token", so this always leaves
    /// `Loading`.
    pub async fn restore(&self) -> SessionSnapshot {
        let key = {
            let mut inner = self.lock();
            if inner.bootstrap_started {
                tracing::debug!("bootstrap already ran, ignoring restore");
                return inner.machine.snapshot();
            }
            inner.bootstrap_started = true;
            inner.machine.config().token_key.clone()
        };

        let token = match self.store.get(&key).await {
            Ok(value) => value.map(SessionToken::new),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "token store read failed, starting signed out");
                None
            },
        };

        tracing::info!(found = token.is_some(), "restoring session");
        let snapshot = self.apply(SessionEvent::Restore { token });
        self.flush_store_writes().await;
        snapshot
    }

    /// Sign in with email and password.
    ///
    /// On success the provider's token is stored untouched. On failure the
    /// provider's message becomes the snapshot's `last_error`. Overlapping
    /// calls are allowed; how their results combine is set by
    /// [`barrio_core::SignInOrdering`].
    pub async fn sign_in(&self, credentials: Credentials) -> SessionSnapshot {
        let ticket = self.lock().machine.begin_sign_in();
        tracing::debug!(ticket = ticket.seq(), email = %credentials.email, "sign-in started");

        let event = match self
            .provider
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await
        {
            Ok(token) => {
                tracing::info!(ticket = ticket.seq(), "sign-in accepted");
                SessionEvent::SignInSucceeded { ticket, token }
            },
            Err(e) => {
                tracing::info!(
                    ticket = ticket.seq(),
                    transient = e.is_transient(),
                    "sign-in rejected: {e}"
                );
                SessionEvent::SignInFailed { ticket, message: e.message().to_string() }
            },
        };

        let snapshot = self.apply(event);
        self.flush_store_writes().await;
        snapshot
    }

    /// Sign out.
    ///
    /// Applies immediately and never fails. With
    /// [`barrio_core::TokenPersistence::ReadWrite`] a store removal is queued
    /// for the next [`SessionController::flush_store_writes`].
    pub fn sign_out(&self) -> SessionSnapshot {
        tracing::info!("signing out");
        self.apply(SessionEvent::SignOut)
    }

    /// Execute queued store writes in the order they were requested.
    ///
    /// Write failures are logged and dropped; the in-memory session is
    /// already settled and is not rolled back.
    pub async fn flush_store_writes(&self) {
        let _guard = self.flush_lock.lock().await;
        let writes = std::mem::take(&mut self.lock().pending_writes);

        for write in writes {
            let result = match &write {
                StoreWrite::Set { key, value } => self.store.set(key, value).await,
                StoreWrite::Remove { key } => self.store.remove(key).await,
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, ?write, "token store write failed");
            }
        }
    }

    /// Reduce one event and publish the result.
    fn apply(&self, event: SessionEvent) -> SessionSnapshot {
        let mut inner = self.lock();
        let name = event.name();

        match inner.machine.handle(event) {
            Ok(actions) => {
                for action in actions {
                    match action {
                        SessionAction::Publish => {
                            self.publisher.send_replace(inner.machine.snapshot());
                        },
                        SessionAction::PersistToken { key, token } => {
                            inner
                                .pending_writes
                                .push(StoreWrite::Set { key, value: token.into_inner() });
                        },
                        SessionAction::ClearStoredToken { key } => {
                            inner.pending_writes.push(StoreWrite::Remove { key });
                        },
                    }
                }
                tracing::debug!(event = name, mode = %inner.machine.mode(), "session transition");
            },
            Err(e) => {
                tracing::debug!(event = name, error = %e, "session event ignored");
            },
        }

        inner.machine.snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
