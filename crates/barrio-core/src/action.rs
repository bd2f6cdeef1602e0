//! Session side-effects.
//!
//! [`SessionAction`]s are instructions produced by the machine for the
//! controller to execute. The machine itself never touches storage.

use crate::SessionToken;

/// Actions produced by the session machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Publish the new snapshot to observers.
    Publish,

    /// Write the token to the token store.
    PersistToken {
        /// Store key.
        key: String,
        /// Token to persist.
        token: SessionToken,
    },

    /// Remove the token from the token store.
    ClearStoredToken {
        /// Store key.
        key: String,
    },
}

impl SessionAction {
    /// `true` for actions that need token store I/O.
    pub fn is_store_write(&self) -> bool {
        matches!(self, Self::PersistToken { .. } | Self::ClearStoredToken { .. })
    }
}
