//! TOML configuration loading and validation.
//!
//! Struct definitions live in `structs` so the serde schema stays separate from the
//! checks that turn loose strings (levels, octal modes, sizes) into typed values.

mod error;
mod size;
mod structs;

pub use error::ConfigError;
pub use size::{format_size, parse_size};
pub use structs::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_RETENTION_DAYS, DispatchConfig, FileConfig, GeneralConfig,
};

use crate::internal;
use crate::level::Level;
use crate::output::{FileOptions, RotationPolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// An empty file must still produce a working logger; `#[serde(default)]` on every
/// section makes zero-config work.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Level filter and record annotation, independent of where records go.
    pub general: GeneralConfig,
    /// Output path, rotation thresholds, permissions, and retention.
    pub file: FileConfig,
    /// Sync vs. async delivery.
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Loads `<config dir>/rotlog/rotlog.toml`, falling back to defaults when it is absent.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined or the file is not valid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::get_config_path()?;
        let config = Self::load_from(&path)?;
        internal::debug("CONFIG", &format!("Config resolved from {}", path.display()));
        Ok(config)
    }

    /// Loads configuration from an explicit path. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on syntax or type errors.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `~/.config/rotlog/rotlog.toml` on Linux.
    ///
    /// # Errors
    /// Fails when the platform has no concept of a config directory.
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("rotlog").join("rotlog.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Typed max level.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidLevel`] for unknown names.
    pub fn parse_level(&self) -> Result<Level, ConfigError> {
        self.general
            .level
            .parse()
            .map_err(|_| ConfigError::InvalidLevel(self.general.level.clone()))
    }

    /// Validates the `[file]` section into writer options.
    ///
    /// # Errors
    /// Empty path, unexpandable path, bad octal modes, or unparsable size.
    pub fn file_options(&self) -> Result<FileOptions, ConfigError> {
        let file = &self.file;
        let path = expand_path(&file.path)?;

        let max_size =
            parse_size(&file.max_size).ok_or_else(|| ConfigError::InvalidSize(file.max_size.clone()))?;

        let policy = RotationPolicy {
            enabled: file.rotate,
            max_lines: file.max_lines,
            max_size,
            daily: file.daily,
        };

        Ok(FileOptions::new(path)
            .policy(policy)
            .retention_days(file.retention_days)
            .permissions(parse_mode(&file.permissions)?)
            .rotated_permissions(parse_mode(&file.rotated_permissions)?)
            .timestamp_format(file.timestamp_format.clone()))
    }
}

/// Parses an octal permission string such as `"0640"` or `"640"`.
///
/// # Errors
/// Returns [`ConfigError::InvalidPermissions`] for non-octal input or bits above `0o7777`.
pub fn parse_mode(s: &str) -> Result<u32, ConfigError> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if !digits.is_empty() && mode <= 0o7777 => Ok(mode),
        _ => Err(ConfigError::InvalidPermissions(s.to_string())),
    }
}

/// Expands `~` and `$VARS` so config files stay portable between machines.
///
/// # Errors
/// Empty paths and unresolvable variables are rejected.
pub fn expand_path(path: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingPath);
    }
    let expanded = shellexpand::full(trimmed)
        .map_err(|_| ConfigError::InvalidPath(PathBuf::from(trimmed)))?;
    if expanded.trim().is_empty() {
        return Err(ConfigError::MissingPath);
    }
    Ok(PathBuf::from(expanded.as_ref()))
}
