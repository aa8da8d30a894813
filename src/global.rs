//! Process-wide logger for code that cannot thread a [`Logger`] through its call graph.
//!
//! Initialized once; closing it leaves the slot occupied, so later calls fail with
//! [`Error::Closed`] rather than [`Error::NotInitialized`].

use crate::config::Config;
use crate::level::Level;
use crate::logger::Logger;
use crate::{Error, internal};
use std::sync::OnceLock;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Builds the global logger from `config`.
///
/// # Errors
/// [`Error::AlreadyInitialized`] on a second call, or any build error.
pub fn init(config: &Config) -> Result<(), Error> {
    if LOGGER.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }
    internal::init_with_config(config);
    install(Logger::from_config(config)?)
}

/// Installs a logger built elsewhere.
///
/// # Errors
/// [`Error::AlreadyInitialized`] if a logger is already installed; the given one is
/// closed before returning.
pub fn install(logger: Logger) -> Result<(), Error> {
    LOGGER.set(logger).map_err(|rejected| {
        let _ = rejected.close();
        Error::AlreadyInitialized
    })
}

/// The installed logger, if any.
pub fn get() -> Option<&'static Logger> {
    LOGGER.get()
}

fn logger() -> Result<&'static Logger, Error> {
    LOGGER.get().ok_or(Error::NotInitialized)
}

/// # Errors
/// [`Error::NotInitialized`] before `init`, otherwise as [`Logger::log`].
#[track_caller]
pub fn log(level: Level, msg: &str) -> Result<(), Error> {
    logger()?.log(level, msg)
}

/// # Errors
/// [`Error::NotInitialized`] before `init`, otherwise as [`Logger::flush`].
pub fn flush() -> Result<(), Error> {
    logger()?.flush()
}

/// # Errors
/// [`Error::NotInitialized`] before `init`, otherwise as [`Logger::close`].
pub fn close() -> Result<(), Error> {
    logger()?.close()
}
