//! Presentation router.
//!
//! Chooses which screens to mount for a snapshot. The router only reads
//! `mode` and `last_error`; it never touches the token.

use std::fmt;

use barrio_core::{Mode, SessionSnapshot};

/// A screen the navigator can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Placeholder shown while bootstrapping.
    Splash,
    /// Credential entry form.
    SignIn,
    /// Map of the user's area.
    Home,
    /// Neighborhood list.
    Neighborhoods,
}

impl Screen {
    /// Route name used by the navigator.
    pub fn name(self) -> &'static str {
        match self {
            Self::Splash => "Splash",
            Self::SignIn => "SignIn",
            Self::Home => "Home",
            Self::Neighborhoods => "Neighborhoods",
        }
    }

    /// Header title.
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Ingresar",
            Self::Splash | Self::Home | Self::Neighborhoods => self.name(),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Screens mounted for one session mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenSet {
    /// Bootstrap in progress.
    Splash,
    /// Signed out; show the form, with the last sign-in error if any.
    Auth {
        /// Message to show above the form.
        error: Option<String>,
    },
    /// Signed in; the application screens.
    Authenticated,
}

impl ScreenSet {
    /// Screens in stack order. The first one is shown initially.
    pub fn screens(&self) -> &'static [Screen] {
        match self {
            Self::Splash => &[Screen::Splash],
            Self::Auth { .. } => &[Screen::SignIn],
            Self::Authenticated => &[Screen::Home, Screen::Neighborhoods],
        }
    }

    /// Screen shown when the set is mounted.
    pub fn initial(&self) -> Screen {
        self.screens()[0]
    }

    /// Sign-in error to display. `None` outside [`ScreenSet::Auth`].
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Auth { error } => error.as_deref(),
            Self::Splash | Self::Authenticated => None,
        }
    }
}

/// Select the screen set for a snapshot.
pub fn route(snapshot: &SessionSnapshot) -> ScreenSet {
    match snapshot.mode() {
        Mode::Loading => ScreenSet::Splash,
        Mode::SignedOut => ScreenSet::Auth { error: snapshot.last_error().map(str::to_string) },
        Mode::SignedIn => ScreenSet::Authenticated,
    }
}
