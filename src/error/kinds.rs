use std::{fmt, io};

/// Crate-wide `Result` type using [`GhostlineError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, GhostlineError>;

/// Top-level error type for ghostline operations.
///
/// A cancelled line is not an error: it is reported as
/// [`Completion::Cancelled`](crate::completion::Completion::Cancelled).
#[derive(Debug)]
pub enum GhostlineError {
    /// Reading from the character source failed.
    Read(ReadError),

    /// Configuration errors.
    Config(ConfigError),

    /// Writing to the terminal failed.
    Io(io::Error),
}

/// Character source errors. Fatal to the running session.
#[derive(Debug)]
pub enum ReadError {
    /// The underlying read failed.
    Io(io::Error),

    /// The background read loop panicked or was aborted.
    Worker(String),

    /// A raw terminal source was requested but stdin is not a terminal.
    NotATerminal,
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Any other configuration problem.
    Generic(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for GhostlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GhostlineError::Read(e) => write!(f, "Read error: {e}"),
            GhostlineError::Config(e) => write!(f, "Configuration error: {e}"),
            GhostlineError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "failed to read input: {e}"),
            ReadError::Worker(msg) => write!(f, "input loop terminated abnormally: {msg}"),
            ReadError::NotATerminal => write!(f, "stdin is not a terminal"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GhostlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GhostlineError::Read(e) => Some(e),
            GhostlineError::Config(e) => Some(e),
            GhostlineError::Io(e) => Some(e),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

/* ========================= Conversions to GhostlineError ========================= */

impl From<io::Error> for GhostlineError {
    fn from(err: io::Error) -> Self {
        GhostlineError::Io(err)
    }
}

impl From<ReadError> for GhostlineError {
    fn from(err: ReadError) -> Self {
        GhostlineError::Read(err)
    }
}

impl From<ConfigError> for GhostlineError {
    fn from(err: ConfigError) -> Self {
        GhostlineError::Config(err)
    }
}
