//! CLI-specific error types.
//!
//! Failures of the requested operation itself are reported as a failure
//! envelope on stdout. `CliError` covers what happens before a request can
//! be made at all.

use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// IO error (body file not found, unreadable stdin, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// The persistence backend could not be opened.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to an exit code (sysexits.h).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 74,     // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
