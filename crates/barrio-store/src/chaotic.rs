//! Chaotic token store wrapper for fault injection testing
//!
//! Delegates to an inner store but randomly fails operations, so tests can
//! verify that storage failures never strand the session in `Loading`.

#![allow(clippy::disallowed_types, reason = "Locking simple RNG state")]

use std::sync::{Arc, Mutex, PoisonError};

use barrio_core::{StorageError, env::TokenStore};

/// Token store wrapper that randomly injects failures
///
/// Deterministic for a given seed. Clones share the RNG and counters.
#[derive(Clone)]
pub struct ChaoticTokenStore<S: TokenStore> {
    inner: S,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    /// RNG state for deterministic chaos
    rng: Arc<Mutex<ChaoticRng>>,
    /// Operations attempted and operations failed
    counters: Arc<Mutex<(usize, usize)>>,
}

/// Linear congruential generator, reproducible from the seed.
struct ChaoticRng {
    state: u64,
}

impl ChaoticRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next value in [0.0, 1.0)
    fn next(&mut self) -> f64 {
        // Numerical Recipes constants
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }
}

impl<S: TokenStore> ChaoticTokenStore<S> {
    /// Wrap `inner` with the default seed.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: S, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x1234_5678_9ABC_DEF0)
    }

    /// Wrap `inner` with an explicit seed for reproducible chaos.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn with_seed(inner: S, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self {
            inner,
            failure_rate,
            rng: Arc::new(Mutex::new(ChaoticRng::new(seed))),
            counters: Arc::new(Mutex::new((0, 0))),
        }
    }

    /// Store that fails every operation.
    pub fn always_failing(inner: S) -> Self {
        Self::new(inner, 1.0)
    }

    /// Underlying store (for checking state after chaos).
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Total number of operations attempted.
    pub fn operation_count(&self) -> usize {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).0
    }

    /// Number of operations that were failed on purpose.
    pub fn failure_count(&self) -> usize {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).1
    }

    /// Roll the dice for one operation.
    fn inject(&self, operation: &str) -> Result<(), StorageError> {
        let fail = self.rng.lock().unwrap_or_else(PoisonError::into_inner).next() < self.failure_rate;

        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        counters.0 += 1;
        if fail {
            counters.1 += 1;
            tracing::debug!(operation, "injecting token store failure");
            return Err(StorageError::Io("chaotic failure injection".to_string()));
        }
        Ok(())
    }
}

impl<S: TokenStore> TokenStore for ChaoticTokenStore<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inject("get")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inject("set")?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inject("remove")?;
        self.inner.remove(key).await
    }
}
