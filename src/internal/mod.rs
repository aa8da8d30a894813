//! rotlog's own diagnostic sink. Background tasks (daily rotation, retention sweeps,
//! the async consumer) have no caller to return errors to, so they report here.
//!
//! Lines go straight to stderr, never through a `Logger`.

use crate::config::Config;
use crate::level::Level;
use std::io::Write;
use std::sync::OnceLock;

/// Overrides the configured threshold, e.g. `ROTLOG_INTERNAL_LEVEL=debug`.
pub const LEVEL_ENV: &str = "ROTLOG_INTERNAL_LEVEL";

static THRESHOLD: OnceLock<Level> = OnceLock::new();

fn env_level() -> Option<Level> {
    std::env::var(LEVEL_ENV).ok()?.parse().ok()
}

/// Fixes the threshold from config. Only the first call takes effect; the environment
/// variable wins over the config value.
pub fn init_with_config(config: &Config) {
    let configured = config.general.internal_level.parse().unwrap_or(Level::Warning);
    let level = *THRESHOLD.get_or_init(|| env_level().unwrap_or(configured));
    debug("INTERNAL", &format!("Diagnostic level: {level}"));
}

fn threshold() -> Level {
    *THRESHOLD.get_or_init(|| env_level().unwrap_or(Level::Warning))
}

fn log(level: Level, scope: &str, msg: &str) {
    if !level.enabled(threshold()) {
        return;
    }
    // A broken stderr leaves nowhere else to report to
    let _ = writeln!(std::io::stderr().lock(), "rotlog {}{scope}  {msg}", level.tag());
}

/// Failures that lost data or left a writer without a file handle.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}

/// Recoverable failures: a rotation that could not rename, a purge that skipped a file.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warning, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Informational, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}
