//! Line-oriented console driver.
//!
//! Implements the [`Driver`] trait over any async line reader and blocking
//! writer. Each input line is one command:
//!
//! ```text
//! sign-in <email> <password>
//! sign-out
//! status
//! quit
//! ```
//!
//! Lines that fail to parse print a usage hint and are skipped.

use std::io::Write;

use barrio_app::{Driver, ScreenSet, UserIntent};
use barrio_core::{Credentials, SessionSnapshot};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::{CommandError, ConsoleError};

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<UserIntent>, CommandError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&command) = parts.first() else {
        return Ok(None);
    };

    let intent = match command {
        "sign-in" | "login" => match parts.as_slice() {
            [_, email, password] => {
                UserIntent::SubmitCredentials(Credentials::new(*email, *password))
            },
            _ => return Err(CommandError::Usage("sign-in <email> <password>")),
        },
        "sign-out" | "logout" => UserIntent::SignOut,
        "status" => UserIntent::Refresh,
        "quit" | "q" => UserIntent::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(intent))
}

/// Console driver reading commands from `R` and printing screens to `W`.
pub struct ConsoleDriver<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R, W> ConsoleDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a driver over a line reader and an output sink.
    pub fn new(input: R, output: W) -> Self {
        Self { lines: input.lines(), output }
    }

    /// Output sink.
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R, W> Driver for ConsoleDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = ConsoleError;

    async fn poll_intent(&mut self) -> Result<Option<UserIntent>, Self::Error> {
        while let Some(line) = self.lines.next_line().await? {
            match parse_command(&line) {
                Ok(Some(intent)) => return Ok(Some(intent)),
                Ok(None) => {},
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
        Ok(None)
    }

    fn render(
        &mut self,
        screens: &ScreenSet,
        snapshot: &SessionSnapshot,
    ) -> Result<(), Self::Error> {
        let names: Vec<&str> = screens.screens().iter().map(|s| s.name()).collect();
        writeln!(
            self.output,
            "[{}] {} ({}) rev {}",
            snapshot.mode(),
            screens.initial().title(),
            names.join(", "),
            snapshot.revision()
        )?;

        if let Some(error) = screens.error() {
            writeln!(self.output, "  error: {error}")?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn stop(&mut self) {
        // Best effort; the process is about to exit
        let _ = writeln!(self.output, "bye");
        let _ = self.output.flush();
    }
}
