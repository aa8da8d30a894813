//! Severity levels that gate which records reach the writer.

use std::fmt;
use std::str::FromStr;

/// Syslog-style severities. Lower discriminant means more severe, so a record passes the
/// filter when `record_level <= max_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// The system is unusable.
    Emergency = 0,
    /// Action must be taken immediately.
    Alert = 1,
    /// Critical conditions.
    Critical = 2,
    /// Error conditions.
    Error = 3,
    /// Warning conditions.
    Warning = 4,
    /// Normal but significant conditions.
    Notice = 5,
    /// Operational messages.
    Informational = 6,
    /// Debug-level detail. The default threshold lets everything through.
    #[default]
    Debug = 7,
}

impl Level {
    /// Conventional short name for [`Level::Informational`].
    pub const INFO: Self = Self::Informational;
    /// Conventional short name for [`Level::Warning`].
    pub const WARN: Self = Self::Warning;
    /// Conventional short name for [`Level::Debug`].
    pub const TRACE: Self = Self::Debug;

    /// Lowercase, as written in config files and CLI args.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Informational => "informational",
            Self::Debug => "debug",
        }
    }

    /// Single-letter tag written in front of every rendered record.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Emergency => "[M] ",
            Self::Alert => "[A] ",
            Self::Critical => "[C] ",
            Self::Error => "[E] ",
            Self::Warning => "[W] ",
            Self::Notice => "[N] ",
            Self::Informational => "[I] ",
            Self::Debug => "[D] ",
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Out-of-range values saturate to [`Level::Debug`].
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Emergency,
            1 => Self::Alert,
            2 => Self::Critical,
            3 => Self::Error,
            4 => Self::Warning,
            5 => Self::Notice,
            6 => Self::Informational,
            _ => Self::Debug,
        }
    }

    /// Most severe first, for help output and tests.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::Emergency,
            Self::Alert,
            Self::Critical,
            Self::Error,
            Self::Warning,
            Self::Notice,
            Self::Informational,
            Self::Debug,
        ]
    }

    /// Whether a record at `self` passes a `max` threshold.
    #[must_use]
    pub const fn enabled(self, max: Self) -> bool {
        self as u8 <= max as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so callers can distinguish "unknown level" from other parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emergency" | "emerg" => Ok(Self::Emergency),
            "alert" => Ok(Self::Alert),
            "critical" | "crit" => Ok(Self::Critical),
            "error" | "err" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "informational" | "info" => Ok(Self::Informational),
            "debug" | "trace" => Ok(Self::Debug),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
