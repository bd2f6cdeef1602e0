//! Error types for the terminal front end.

use std::io;

use thiserror::Error;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// I/O error reading commands or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A command line that could not be understood.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Command word not recognized.
    #[error("unknown command '{0}'")]
    Unknown(String),

    /// Command given the wrong number of arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// An `--account` value that could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountSpecError {
    /// Fewer than three `:`-separated fields.
    #[error("expected email:password:token, got '{0}'")]
    Malformed(String),

    /// A field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
