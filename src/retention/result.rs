//! Outcome of one purge pass, so sweeps and the CLI can report what happened.

use crate::config::format_size;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct PurgeResult {
    /// Files removed.
    pub deleted: Vec<PathBuf>,
    /// Bytes reclaimed by the removals.
    pub freed: u64,
    /// Files that matched but could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl PurgeResult {
    #[must_use]
    pub const fn count(&self) -> usize {
        self.deleted.len()
    }

    #[must_use]
    pub const fn bytes(&self) -> u64 {
        self.freed
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// One-line summary for diagnostics and CLI output.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Purged {} file(s), {} freed",
            self.count(),
            format_size(self.freed)
        );
        if self.has_failures() {
            line.push_str(&format!(", {} failed", self.failed.len()));
        }
        line
    }
}
