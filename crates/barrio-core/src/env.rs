//! Contracts of the external collaborators.
//!
//! The session core consumes a token store and an identity provider but
//! implements neither. Both are async and return typed errors; the
//! controller decides how each error is classified.

use std::{future::Future, sync::Arc};

use crate::{CredentialError, SessionToken, StorageError};

/// Async key-value store holding the persisted token.
///
/// # Invariants
///
/// - `get` after a successful `set` of the same key returns that value
/// - `get` after a successful `remove` returns `None`
pub trait TokenStore: Send + Sync {
    /// Read a value. `None` if the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove a value. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Async credential verification service.
pub trait IdentityProvider: Send + Sync {
    /// Verify email and password, returning an opaque session token.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SessionToken, CredentialError>> + Send;
}

impl<T: TokenStore> TokenStore for Arc<T> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).remove(key)
    }
}

impl<T: IdentityProvider> IdentityProvider for Arc<T> {
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SessionToken, CredentialError>> + Send {
        (**self).sign_in_with_password(email, password)
    }
}
