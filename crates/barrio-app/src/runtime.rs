//! Generic runtime for application orchestration.
//!
//! The Runtime drives the client's event loop, coordinating between:
//! - [`SessionController`]: session state and protocols
//! - [`route`](crate::route): presentation router
//! - [`Driver`]: platform-specific input and rendering

use std::sync::Arc;

use barrio_core::env::{IdentityProvider, TokenStore};

use crate::{Driver, SessionController, UserIntent, route};

/// Generic runtime that orchestrates the controller, router and driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `S`: Token store
/// - `P`: Identity provider
pub struct Runtime<D, S, P>
where
    D: Driver,
    S: TokenStore,
    P: IdentityProvider,
{
    driver: D,
    controller: Arc<SessionController<S, P>>,
}

impl<D, S, P> Runtime<D, S, P>
where
    D: Driver,
    S: TokenStore,
    P: IdentityProvider,
{
    /// Create a runtime around a shared controller handle.
    pub fn new(driver: D, controller: Arc<SessionController<S, P>>) -> Self {
        Self { driver, controller }
    }

    /// Run the main event loop.
    ///
    /// 1. Renders the splash screen and runs the bootstrap protocol
    /// 2. Forwards each user intent to the controller
    /// 3. Flushes store writes and re-renders after every intent
    ///
    /// Returns when input ends or the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let config = self.controller.config();
        tracing::info!(
            token_key = %config.token_key,
            persistence = ?config.persistence,
            ordering = ?config.ordering,
            "runtime starting"
        );

        self.render()?;
        self.controller.restore().await;
        self.render()?;

        while let Some(intent) = self.driver.poll_intent().await? {
            if self.process_intent(intent).await {
                break;
            }
            self.render()?;
        }

        self.driver.stop();
        Ok(())
    }

    /// Forward one intent to the controller.
    ///
    /// Returns `true` if the application should quit.
    async fn process_intent(&mut self, intent: UserIntent) -> bool {
        match intent {
            UserIntent::SubmitCredentials(credentials) => {
                self.controller.sign_in(credentials).await;
            },
            UserIntent::SignOut => {
                self.controller.sign_out();
                self.controller.flush_store_writes().await;
            },
            UserIntent::Refresh => {},
            UserIntent::Quit => return true,
        }
        false
    }

    /// Route the latest snapshot and hand it to the driver.
    fn render(&mut self) -> Result<(), D::Error> {
        let snapshot = self.controller.snapshot();
        let screens = route(&snapshot);
        self.driver.render(&screens, &snapshot)
    }
}
