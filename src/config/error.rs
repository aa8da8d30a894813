//! Why a config file could not become a working logger.

use std::path::PathBuf;

/// Error type for loading and validating configuration. Fatal to logger setup.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but cannot be read.
    Io(std::io::Error),
    /// Invalid TOML, or a value of the wrong type.
    Parse(toml::de::Error),
    /// The platform reports no user config directory.
    ConfigDirNotFound,
    /// The output path is empty or expands to nothing.
    MissingPath,
    /// The output path could not be expanded (unknown variable, bad home dir).
    InvalidPath(PathBuf),
    /// Permission bits are not an octal number up to `0o7777`.
    InvalidPermissions(String),
    /// Size threshold is not a byte count or a `K`/`M`/`G` size.
    InvalidSize(String),
    /// Level name is not one of the eight severities or their aliases.
    InvalidLevel(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::MissingPath => write!(f, "output path must not be empty"),
            Self::InvalidPath(p) => write!(f, "invalid output path: {}", p.display()),
            Self::InvalidPermissions(s) => write!(f, "invalid permission bits: '{s}'"),
            Self::InvalidSize(s) => write!(f, "invalid size: '{s}'"),
            Self::InvalidLevel(s) => write!(f, "invalid level: '{s}'"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}
