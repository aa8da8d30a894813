#![forbid(unsafe_code)]

//! `rotlog` - process-local logging into a rotating file.
//!
//! - Rotation by line count, byte size, and calendar day, with numbered names once
//!   several rotations share a date
//! - Daily background trigger at local midnight and a retention sweeper for old files
//! - Synchronous dispatch, or a bounded queue drained by one consumer thread with
//!   blocking backpressure and `flush`/`close` barriers
//! - TOML configuration and a process-wide facade
//!
//! # Example
//!
//! ```no_run
//! use rotlog::{Level, Logger};
//!
//! let logger = Logger::builder()
//!     .level(Level::Informational)
//!     .file("/var/log/myapp/app.log")
//!         .max_lines(100_000)
//!         .retention_days(14)
//!         .done()
//!     .build()?;
//!
//! logger.info("service started");
//! logger.debug("filtered out");
//! logger.flush()?;
//! logger.close()?;
//! # Ok::<(), rotlog::Error>(())
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `rotlog` binary (`pipe` and `purge` commands)

pub mod config;
pub mod dispatch;
mod error;
pub mod global;
pub mod internal;
pub mod level;
pub mod logger;
pub mod output;
pub mod retention;
pub mod schedule;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{Config, ConfigError, format_size, parse_size};
pub use dispatch::{ControlSignal, DispatchMode, Dispatcher};
pub use error::Error;
pub use global::{close, flush, init, log};
pub use level::Level;
pub use logger::{FileBuilder, Logger, LoggerBuilder};
pub use output::{FileOptions, LogRecord, Output, RotatingFileWriter, RotationPolicy};
pub use retention::{Purge, PurgeResult, RotatedFiles, purge_rotated};
