//! When to rotate. Kept free of I/O so the decision can be checked under a shared lock
//! and re-checked under the exclusive one with identical results.

use chrono::NaiveDate;

/// Rotation thresholds. A zero threshold disables that trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Master switch; when false no trigger ever fires.
    pub enabled: bool,
    /// Rotate once the file holds this many lines.
    pub max_lines: u64,
    /// Rotate before the file would reach this many bytes.
    pub max_size: u64,
    /// Rotate on the first write of a new calendar day.
    pub daily: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_lines: 0,
            max_size: 0,
            daily: true,
        }
    }
}

/// Counters of the currently open file, as seen by the rotation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileUsage {
    pub lines: u64,
    pub bytes: u64,
    /// Local date the file was opened.
    pub opened: NaiveDate,
}

impl RotationPolicy {
    /// No rotation at all; the file grows without bound.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            max_lines: 0,
            max_size: 0,
            daily: false,
        }
    }

    /// Line/size rotation may happen several times a day, so rotated names always
    /// carry a sequence number.
    #[must_use]
    pub const fn numbered(&self) -> bool {
        self.max_lines > 0 || self.max_size > 0
    }

    /// True when any configured threshold is reached.
    ///
    /// Two refinements over the plain threshold comparisons:
    ///
    /// - The size trigger is `bytes + pending >= max_size` only for a non-empty file.
    ///   An empty file never rotates on size, so a single record larger than `max_size`
    ///   goes into a fresh file instead of leaving empty rotated files behind.
    /// - The daily trigger fires when `today` is *later* than the open date, not merely
    ///   different. Records stamped before the open date (a queued backlog drained after
    ///   midnight, or a clock stepping back) are appended without rotating. It also
    ///   needs at least one line since open, so an idle file is not rotated at midnight.
    #[must_use]
    pub fn needs_rotation(&self, usage: &FileUsage, pending_bytes: u64, today: NaiveDate) -> bool {
        if !self.enabled {
            return false;
        }
        let lines_due = self.max_lines > 0 && usage.lines >= self.max_lines;
        let size_due = self.max_size > 0
            && usage.bytes > 0
            && usage.bytes.saturating_add(pending_bytes) >= self.max_size;
        let day_due = self.daily && today > usage.opened && usage.lines > 0;
        lines_due || size_due || day_due
    }
}
