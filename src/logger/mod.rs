//! Caller-facing facade: level filtering and record rendering in front of a
//! [`Dispatcher`]. The builder assembles the output and the dispatch mode.

mod builder;
mod from_config;

pub use builder::{FileBuilder, LoggerBuilder};

use crate::dispatch::{DispatchMode, Dispatcher};
use crate::internal;
use crate::level::Level;
use crate::output::LogRecord;
use std::io;
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};

/// Thread-safe; share it by reference or behind an `Arc`.
pub struct Logger {
    max_level: AtomicU8,
    call_site: bool,
    dispatcher: Dispatcher,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Renders and submits one record if `level` passes the threshold.
    ///
    /// # Errors
    /// [`crate::Error::Closed`] after `close`; in sync mode, the write error.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str) -> Result<(), crate::Error> {
        if !level.enabled(self.level()) {
            return Ok(());
        }
        let text = self.render(level, msg, Location::caller());
        self.dispatcher.submit(LogRecord::new(level, text))
    }

    /// Writes `msg` without a level tag, bypassing the threshold.
    ///
    /// # Errors
    /// Same as [`Logger::log`].
    pub fn raw(&self, msg: &str) -> Result<(), crate::Error> {
        self.dispatcher.submit(LogRecord::raw(msg))
    }

    fn render(&self, level: Level, msg: &str, caller: &Location<'_>) -> String {
        if self.call_site {
            let file = caller.file().rsplit(['/', '\\']).next().unwrap_or("???");
            format!("{}[{file}:{}] {msg}", level.tag(), caller.line())
        } else {
            format!("{}{msg}", level.tag())
        }
    }

    #[track_caller]
    fn log_reported(&self, level: Level, msg: &str) {
        if let Err(e) = self.log(level, msg) {
            internal::error("LOGGER", &format!("Dropped {level} record: {e}"));
        }
    }

    #[track_caller]
    pub fn emergency(&self, msg: &str) {
        self.log_reported(Level::Emergency, msg);
    }

    #[track_caller]
    pub fn alert(&self, msg: &str) {
        self.log_reported(Level::Alert, msg);
    }

    #[track_caller]
    pub fn critical(&self, msg: &str) {
        self.log_reported(Level::Critical, msg);
    }

    #[track_caller]
    pub fn error(&self, msg: &str) {
        self.log_reported(Level::Error, msg);
    }

    #[track_caller]
    pub fn warning(&self, msg: &str) {
        self.log_reported(Level::Warning, msg);
    }

    #[track_caller]
    pub fn notice(&self, msg: &str) {
        self.log_reported(Level::Notice, msg);
    }

    #[track_caller]
    pub fn informational(&self, msg: &str) {
        self.log_reported(Level::Informational, msg);
    }

    #[track_caller]
    pub fn debug(&self, msg: &str) {
        self.log_reported(Level::Debug, msg);
    }

    /// Alias for [`Logger::warning`].
    #[track_caller]
    pub fn warn(&self, msg: &str) {
        self.log_reported(Level::WARN, msg);
    }

    /// Alias for [`Logger::informational`].
    #[track_caller]
    pub fn info(&self, msg: &str) {
        self.log_reported(Level::INFO, msg);
    }

    /// Alias for [`Logger::debug`].
    #[track_caller]
    pub fn trace(&self, msg: &str) {
        self.log_reported(Level::TRACE, msg);
    }

    /// Least severe level still written.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_u8(self.max_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.max_level.store(level.as_u8(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn mode(&self) -> DispatchMode {
        self.dispatcher.mode()
    }

    /// Barrier: every record logged before this call is on stable storage when it returns.
    ///
    /// # Errors
    /// [`crate::Error::Closed`], a sync failure, or a deferred async write failure.
    pub fn flush(&self) -> Result<(), crate::Error> {
        self.dispatcher.flush()
    }

    /// Drains pending records and releases the file. Later calls to `log` fail with
    /// [`crate::Error::Closed`]; a second `close` is a no-op.
    ///
    /// # Errors
    /// The final flush or close failed.
    pub fn close(&self) -> Result<(), crate::Error> {
        self.dispatcher.close()
    }
}

/// Lets the logger stand in wherever an `io::Write` sink is expected; each write
/// becomes one untagged record.
impl io::Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let text = String::from_utf8_lossy(buf);
        let line = text.strip_suffix('\n').unwrap_or(&text);
        self.raw(line).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Logger::flush(self).map_err(io::Error::other)
    }
}
