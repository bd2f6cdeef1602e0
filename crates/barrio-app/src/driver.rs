//! Driver trait for abstracting platform I/O.
//!
//! The [`Driver`] trait decouples the [`crate::Runtime`] from where user input
//! comes from and how screens are drawn. A terminal front end and the
//! simulation harness both implement it; the orchestration code is shared.

use std::future::Future;

use barrio_core::SessionSnapshot;

use crate::{ScreenSet, UserIntent};

/// Abstracts input and rendering for the runtime.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user intent.
    ///
    /// Returns `None` when input is exhausted.
    fn poll_intent(
        &mut self,
    ) -> impl Future<Output = Result<Option<UserIntent>, Self::Error>> + Send;

    /// Draw the mounted screens.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, screens: &ScreenSet, snapshot: &SessionSnapshot)
    -> Result<(), Self::Error>;

    /// Release platform resources.
    fn stop(&mut self);
}
