//! Unified error type for all rotlog operations.

use crate::config::ConfigError;
use std::path::PathBuf;

/// Error type for rotlog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from opening, writing, or syncing the active file.
    Io(std::io::Error),
    /// Configuration could not be loaded or validated.
    Config(ConfigError),
    /// Renaming or chmod-ing the rotated file failed; the active path was reopened.
    Rotate {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The active path could not be reopened after rotation; the writer has no handle.
    Reopen {
        path: PathBuf,
        source: std::io::Error,
    },
    /// All 999 sequence numbers for the day are taken.
    RotationExhausted(PathBuf),
    /// The dispatcher was closed; no further records are accepted.
    Closed,
    /// The process-wide logger was already initialized.
    AlreadyInitialized,
    /// The process-wide logger has not been initialized yet.
    NotInitialized,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Rotate { path, source } => {
                write!(f, "rotate {}: {source}", path.display())
            }
            Self::Reopen { path, source } => {
                write!(f, "reopen {} after rotation: {source}", path.display())
            }
            Self::RotationExhausted(path) => write!(
                f,
                "rotate {}: no free sequence number left for today",
                path.display()
            ),
            Self::Closed => write!(f, "logger is closed"),
            Self::AlreadyInitialized => write!(f, "logger already initialized"),
            Self::NotInitialized => write!(f, "logger not initialized"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Rotate { source, .. } | Self::Reopen { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
