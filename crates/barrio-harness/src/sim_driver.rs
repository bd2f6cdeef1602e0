//! Scripted driver for runtime tests.
//!
//! Replays a fixed list of user intents and records every render into a
//! shared [`RenderLog`], so tests can inspect what the user would have seen
//! after the runtime has consumed the driver.

#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use barrio_app::{Driver, Screen, ScreenSet, UserIntent};
use barrio_core::{Mode, SessionSnapshot};
use thiserror::Error;

/// Errors produced by the simulated driver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimDriverError {
    /// Render was configured to fail.
    #[error("render failed at frame {0}")]
    RenderFailed(usize),
}

/// One recorded render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Session mode at render time.
    pub mode: Mode,
    /// Screen shown first.
    pub screen: Screen,
    /// Error shown on the form, if any.
    pub error: Option<String>,
    /// Snapshot revision.
    pub revision: u64,
}

/// Shared log of rendered frames.
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    frames: Arc<Mutex<Vec<RenderedFrame>>>,
    stopped: Arc<AtomicBool>,
}

impl RenderLog {
    /// All frames rendered so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Most recent frame. `None` if nothing was rendered.
    pub fn last(&self) -> Option<RenderedFrame> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Screens shown, in render order.
    pub fn screens(&self) -> Vec<Screen> {
        self.frames().into_iter().map(|f| f.screen).collect()
    }

    /// `true` once the runtime has stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn push(&self, frame: RenderedFrame) -> usize {
        let mut frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        frames.push(frame);
        frames.len()
    }
}

/// Driver that replays scripted intents.
pub struct SimDriver {
    intents: VecDeque<UserIntent>,
    log: RenderLog,
    /// Fail the render that would produce this frame number (1-based)
    fail_at: Option<usize>,
}

impl SimDriver {
    /// Create a driver that yields `intents` in order, then ends input.
    pub fn new(intents: impl IntoIterator<Item = UserIntent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
            log: RenderLog::default(),
            fail_at: None,
        }
    }

    /// Make the `frame`-th render fail.
    pub fn fail_render_at(mut self, frame: usize) -> Self {
        self.fail_at = Some(frame);
        self
    }

    /// Handle to the render log.
    pub fn log(&self) -> RenderLog {
        self.log.clone()
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_intent(&mut self) -> Result<Option<UserIntent>, Self::Error> {
        Ok(self.intents.pop_front())
    }

    fn render(
        &mut self,
        screens: &ScreenSet,
        snapshot: &SessionSnapshot,
    ) -> Result<(), Self::Error> {
        let frame = RenderedFrame {
            mode: snapshot.mode(),
            screen: screens.initial(),
            error: screens.error().map(str::to_string),
            revision: snapshot.revision(),
        };

        let number = self.log.push(frame);
        if self.fail_at == Some(number) {
            return Err(SimDriverError::RenderFailed(number));
        }
        Ok(())
    }

    fn stop(&mut self) {
        tracing::debug!("sim driver stopped");
        self.log.stopped.store(true, Ordering::SeqCst);
    }
}
