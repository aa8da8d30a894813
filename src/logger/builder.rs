//! Stepwise construction of a [`Logger`]: threshold, rendering, dispatch mode, and
//! one output (usually the rotating file).

use super::Logger;
use crate::config::{ConfigError, DEFAULT_QUEUE_CAPACITY};
use crate::dispatch::Dispatcher;
use crate::level::Level;
use crate::output::{FileOptions, Output, RotatingFileWriter, RotationPolicy};
use crate::{Error, internal};
use std::path::PathBuf;
use std::sync::atomic::AtomicU8;

enum Target {
    File(FileOptions),
    Custom(Box<dyn Output>),
}

pub struct LoggerBuilder {
    level: Level,
    call_site: bool,
    queue_capacity: usize,
    target: Option<Target>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Debug threshold, no call-site prefix, async queue of [`DEFAULT_QUEUE_CAPACITY`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: Level::Debug,
            call_site: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            target: None,
        }
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Prefix every message with `[file:line]` of the logging call.
    #[must_use]
    pub const fn call_site(mut self, enabled: bool) -> Self {
        self.call_site = enabled;
        self
    }

    /// Bounded queue length; `0` writes synchronously on the caller's thread.
    #[must_use]
    pub const fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Shorthand for `queue_capacity(0)`.
    #[must_use]
    pub const fn synchronous(self) -> Self {
        self.queue_capacity(0)
    }

    /// Log to a rotating file at `path`.
    #[must_use]
    pub fn file(self, path: impl Into<PathBuf>) -> FileBuilder {
        FileBuilder {
            parent: self,
            options: FileOptions::new(path),
        }
    }

    /// Use prepared file options as the output.
    #[must_use]
    pub fn file_options(mut self, options: FileOptions) -> Self {
        self.target = Some(Target::File(options));
        self
    }

    /// Replace the file with any other sink.
    #[must_use]
    pub fn output(mut self, output: impl Output + 'static) -> Self {
        self.target = Some(Target::Custom(Box::new(output)));
        self
    }

    /// Opens the output and starts the dispatcher.
    ///
    /// # Errors
    /// No output was configured, the log file cannot be opened, or a worker thread cannot
    /// be spawned.
    pub fn build(self) -> Result<Logger, Error> {
        let output: Box<dyn Output> = match self.target {
            Some(Target::File(options)) => Box::new(RotatingFileWriter::open(options)?),
            Some(Target::Custom(output)) => output,
            None => return Err(ConfigError::MissingPath.into()),
        };

        internal::debug(
            "LOGGER",
            &format!(
                "Logger ready (level={}, queue={})",
                self.level, self.queue_capacity
            ),
        );
        Ok(Logger {
            max_level: AtomicU8::new(self.level.as_u8()),
            call_site: self.call_site,
            dispatcher: Dispatcher::new(output, self.queue_capacity)?,
        })
    }
}

/// Rotation and permission settings for the file output.
pub struct FileBuilder {
    parent: LoggerBuilder,
    options: FileOptions,
}

impl FileBuilder {
    #[must_use]
    pub fn policy(mut self, policy: RotationPolicy) -> Self {
        self.options = self.options.policy(policy);
        self
    }

    #[must_use]
    pub fn max_lines(mut self, lines: u64) -> Self {
        self.options = self.options.max_lines(lines);
        self
    }

    #[must_use]
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.options = self.options.max_size(bytes);
        self
    }

    #[must_use]
    pub fn daily(mut self, daily: bool) -> Self {
        self.options = self.options.daily(daily);
        self
    }

    /// `false` disables every trigger and the retention sweeper.
    #[must_use]
    pub fn rotate(mut self, enabled: bool) -> Self {
        self.options = self.options.rotate(enabled);
        self
    }

    #[must_use]
    pub fn retention_days(mut self, days: u32) -> Self {
        self.options = self.options.retention_days(days);
        self
    }

    #[must_use]
    pub fn permissions(mut self, mode: u32) -> Self {
        self.options = self.options.permissions(mode);
        self
    }

    #[must_use]
    pub fn rotated_permissions(mut self, mode: u32) -> Self {
        self.options = self.options.rotated_permissions(mode);
        self
    }

    /// Leave modes to the process umask.
    #[must_use]
    pub fn inherit_permissions(mut self) -> Self {
        self.options = self.options.inherit_permissions();
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.options = self.options.timestamp_format(format);
        self
    }

    #[must_use]
    pub fn done(self) -> LoggerBuilder {
        self.parent.file_options(self.options)
    }
}
