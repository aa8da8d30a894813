//! Configuration struct definitions.

use serde::Deserialize;

/// Default async queue length; 0 selects synchronous dispatch.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default retention for rotated files.
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Least severe level that is still written.
    pub level: String,
    /// Prefix each message with the caller's `file:line`.
    pub call_site: bool,
    /// Threshold for rotlog's own stderr diagnostics.
    pub internal_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            call_site: false,
            internal_level: "warning".to_string(),
        }
    }
}

/// Rotating file output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Active log file; `~` is expanded.
    pub path: String,
    /// Master switch for all rotation triggers.
    pub rotate: bool,
    /// Rotate after this many lines (0 = disabled).
    pub max_lines: u64,
    /// Rotate before exceeding this size, e.g. "10M" (0 = disabled).
    pub max_size: String,
    /// Rotate when the calendar day changes.
    pub daily: bool,
    /// Rotated files older than this many days are purged (0 = never).
    pub retention_days: u32,
    /// Octal mode of the active file.
    pub permissions: String,
    /// Octal mode applied to a file once it is rotated aside.
    pub rotated_permissions: String,
    /// strftime format of the per-line timestamp.
    pub timestamp_format: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        let path = directories::ProjectDirs::from("", "", "rotlog").map_or_else(
            || "logs/rotlog.log".to_string(),
            |dirs| {
                dirs.state_dir()
                    .unwrap_or_else(|| dirs.data_dir())
                    .join("logs")
                    .join("rotlog.log")
                    .to_string_lossy()
                    .into_owned()
            },
        );

        Self {
            path,
            rotate: true,
            max_lines: 0,
            max_size: "0".to_string(),
            daily: true,
            retention_days: DEFAULT_RETENTION_DAYS,
            permissions: "0640".to_string(),
            rotated_permissions: "0440".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// Dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Bounded queue length for async delivery; 0 writes synchronously on the caller's thread.
    pub queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
