//! Sinks behind the dispatcher. The rotating file writer is the built-in one; anything
//! implementing [`Output`] can take its place.

pub mod file;

pub use file::{FileOptions, RotatingFileWriter, RotationPolicy};

use crate::level::Level;
use chrono::{DateTime, Local};

/// One rendered log line waiting to be persisted. Fields are fixed at construction.
#[derive(Debug, Clone)]
pub struct LogRecord {
    when: DateTime<Local>,
    level: Level,
    text: String,
    raw: bool,
}

impl LogRecord {
    /// Stamps the record with the current local time.
    #[must_use]
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self::at(Local::now(), level, text)
    }

    /// Explicit timestamp, used when the caller already captured the time.
    #[must_use]
    pub fn at(when: DateTime<Local>, level: Level, text: impl Into<String>) -> Self {
        Self {
            when,
            level,
            text: text.into(),
            raw: false,
        }
    }

    /// Lines passed through `io::Write` carry no level tag.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            raw: true,
            ..Self::new(Level::Emergency, text)
        }
    }

    #[must_use]
    pub const fn when(&self) -> DateTime<Local> {
        self.when
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Rendered message text, without the timestamp.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_raw(&self) -> bool {
        self.raw
    }
}

/// `Send + Sync` so one backend can be shared between the dispatcher and background timers.
pub trait Output: Send + Sync {
    /// Persists one record.
    ///
    /// # Errors
    /// I/O errors from the underlying sink.
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error>;

    /// Forces written records to stable storage.
    ///
    /// # Errors
    /// I/O errors from the underlying sink.
    fn flush(&self) -> Result<(), crate::Error>;

    /// Releases the sink. Called once at shutdown; later writes may fail.
    ///
    /// # Errors
    /// I/O errors raised while syncing before release.
    fn close(&self) -> Result<(), crate::Error> {
        self.flush()
    }
}

impl<T: Output + ?Sized> Output for std::sync::Arc<T> {
    fn write(&self, record: &LogRecord) -> Result<(), crate::Error> {
        (**self).write(record)
    }

    fn flush(&self) -> Result<(), crate::Error> {
        (**self).flush()
    }

    fn close(&self) -> Result<(), crate::Error> {
        (**self).close()
    }
}
