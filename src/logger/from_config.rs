//! Logger construction from a loaded [`Config`].

use super::{Logger, LoggerBuilder};
use crate::config::Config;
use crate::{Error, internal};

impl Logger {
    /// Loads the default config file (or defaults when absent) and builds a logger from it.
    ///
    /// # Errors
    /// The config is unreadable or invalid, or the log file cannot be opened.
    pub fn from_default_config() -> Result<Self, Error> {
        let config = Config::load()?;
        Self::from_config(&config)
    }

    /// Builds a file logger from `config`.
    ///
    /// # Errors
    /// Invalid level, path, size, or permission strings; or the log file cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        internal::debug("LOGGER", "Building logger from config");
        let options = config.file_options()?;
        internal::debug(
            "LOGGER",
            &format!(
                "File output: {} ({:?})",
                options.path().display(),
                options.rotation_policy()
            ),
        );

        LoggerBuilder::new()
            .level(config.parse_level()?)
            .call_site(config.general.call_site)
            .queue_capacity(config.dispatch.queue_capacity)
            .file_options(options)
            .build()
    }
}
