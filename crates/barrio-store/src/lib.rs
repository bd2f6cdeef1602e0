//! Token store adapters
//!
//! Implementations of [`barrio_core::env::TokenStore`]:
//!
//! - [`MemoryTokenStore`]: in-process map for tests and simulation
//! - [`RedbTokenStore`]: durable, file-backed store
//! - [`ChaoticTokenStore`]: wrapper that injects seeded failures

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chaotic;
mod memory;
mod redb;

pub use barrio_core::{StorageError, env::TokenStore};
pub use chaotic::ChaoticTokenStore;
pub use memory::MemoryTokenStore;

pub use self::redb::RedbTokenStore;
