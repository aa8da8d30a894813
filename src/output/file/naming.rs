//! Successor names for rotated files: `<stem>.<YYYY-MM-DD>[.<NNN>]<suffix>`.

use chrono::NaiveDate;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Highest sequence number tried before rotation gives up.
pub const MAX_SEQUENCE: u16 = 999;

/// Suffix used when the active file has no extension.
pub const DEFAULT_SUFFIX: &str = ".log";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Derives rotated sibling names from the active path.
#[derive(Debug, Clone)]
pub struct RotatedNames {
    /// Active path without its extension.
    stem: OsString,
    /// Extension including the dot.
    suffix: String,
    /// `<file stem>.`, used to recognize rotated siblings in a listing.
    prefix: String,
    dir: PathBuf,
}

impl RotatedNames {
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let suffix = path
            .extension()
            .map_or_else(|| DEFAULT_SUFFIX.to_string(), |ext| format!(".{}", ext.to_string_lossy()));
        let stem = path.with_extension("").into_os_string();
        let prefix = path
            .file_stem()
            .map(|s| format!("{}.", s.to_string_lossy()))
            .unwrap_or_default();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self {
            stem,
            suffix,
            prefix,
            dir,
        }
    }

    /// Directory that holds the active file and its rotated siblings.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<stem>.<date><suffix>`, the first daily-only candidate.
    #[must_use]
    pub fn plain(&self, date: NaiveDate) -> PathBuf {
        self.sibling(&format!(".{}{}", date.format(DATE_FORMAT), self.suffix))
    }

    /// `<stem>.<date>.<NNN><suffix>`.
    #[must_use]
    pub fn numbered(&self, date: NaiveDate, seq: u16) -> PathBuf {
        self.sibling(&format!(".{}.{seq:03}{}", date.format(DATE_FORMAT), self.suffix))
    }

    /// First unclaimed name for `date`, or `None` once 001..=999 are all taken.
    ///
    /// Without `numbered`, the plain dated name is tried first. A name counts as taken
    /// only when `lstat` succeeds on it.
    #[must_use]
    pub fn next_free(&self, date: NaiveDate, numbered: bool) -> Option<PathBuf> {
        if !numbered {
            let plain = self.plain(date);
            if !exists(&plain) {
                return Some(plain);
            }
        }
        (1..=MAX_SEQUENCE)
            .map(|seq| self.numbered(date, seq))
            .find(|candidate| !exists(candidate))
    }

    /// Whether `file_name` (no directory) has the shape of one of our rotated files.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        let Some(middle) = file_name
            .strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_suffix(&self.suffix))
        else {
            return false;
        };
        let Some((date, seq)) = middle.split_at_checked(10) else {
            return false;
        };
        if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            return false;
        }
        seq.is_empty()
            || seq
                .strip_prefix('.')
                .is_some_and(|n| n.len() == 3 && n.bytes().all(|b| b.is_ascii_digit()))
    }

    fn sibling(&self, tail: &str) -> PathBuf {
        let mut name = self.stem.clone();
        name.push(tail);
        PathBuf::from(name)
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
