#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use barrio_core::{StorageError, env::TokenStore};

/// In-memory token store for testing and simulation
///
/// Clones share the same map, so a test can keep one handle and give another
/// to the controller. Counts reads and writes so tests can assert which
/// persistence policy was followed.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    reads: usize,
    writes: usize,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `value` under `key`.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().values.insert(key.into(), value.into());
        store
    }

    /// Current value under `key`, read synchronously.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Number of `get` calls served.
    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    /// Number of `set` and `remove` calls served.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut inner = self.lock();
        inner.reads += 1;
        Ok(inner.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        inner.writes += 1;
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        inner.writes += 1;
        inner.values.remove(key);
        Ok(())
    }
}
