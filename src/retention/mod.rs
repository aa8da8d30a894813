//! Retention for rotated files. Rotation alone only moves old logs aside; this module
//! deletes the ones past their retention age, on demand or from a daily sweeper.

mod files;
mod result;

pub use result::PurgeResult;

pub use crate::output::file::RotatedNames;
use crate::schedule::{self, DAY, TimerHandle};
use crate::{Error, internal};
use files::collect_rotated_files;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Deletes files under a directory that are older than an age threshold.
///
/// The sweeper only knows the directory and the age; what counts as a log file is up
/// to the implementation.
pub trait Purge: Send + 'static {
    /// Removes expired files.
    ///
    /// # Errors
    /// Directory traversal failures. Individual files that cannot be removed belong in
    /// [`PurgeResult::failed`] instead.
    fn purge(&self, dir: &Path, max_age_days: u32) -> Result<PurgeResult, Error>;
}

/// Purges only files named like rotated siblings of one active file, never the active
/// file itself or anything else sharing the directory.
///
/// This is narrower than a whole-directory sweep by age: subdirectories are not entered
/// and unrelated files are kept however old they are. Implement [`Purge`] for a wider
/// policy.
#[derive(Debug, Clone)]
pub struct RotatedFiles {
    names: RotatedNames,
    active: Option<PathBuf>,
}

impl RotatedFiles {
    #[must_use]
    pub const fn new(names: RotatedNames, active: PathBuf) -> Self {
        Self {
            names,
            active: Some(active),
        }
    }

    /// Rotated siblings of `active`.
    #[must_use]
    pub fn for_path(active: &Path) -> Self {
        Self::new(RotatedNames::for_path(active), active.to_path_buf())
    }
}

impl Purge for RotatedFiles {
    fn purge(&self, dir: &Path, max_age_days: u32) -> Result<PurgeResult, Error> {
        purge_rotated(dir, &self.names, self.active.as_deref(), max_age_days)
    }
}

/// Deletes rotated files in `dir` last modified more than `max_age_days` whole days ago.
///
/// # Errors
/// The directory listing fails.
pub fn purge_rotated(
    dir: &Path,
    names: &RotatedNames,
    active: Option<&Path>,
    max_age_days: u32,
) -> Result<PurgeResult, Error> {
    internal::debug(
        "RETENTION",
        &format!("Purging {} (older than {max_age_days}d)", dir.display()),
    );
    let mut result = PurgeResult::default();
    let files = collect_rotated_files(dir, names, SystemTime::now())?;

    for file in files {
        if file.age_days <= u64::from(max_age_days) {
            continue;
        }
        if active.is_some_and(|a| a == file.path.as_path()) {
            continue;
        }
        match fs::remove_file(&file.path) {
            Ok(()) => {
                internal::debug("RETENTION", &format!("Deleted: {}", file.path.display()));
                result.freed += file.size;
                result.deleted.push(file.path);
            }
            Err(e) => result.failed.push((file.path, e.to_string())),
        }
    }

    Ok(result)
}

fn sweep(purge: &dyn Purge, dir: &Path, max_age_days: u32) {
    match purge.purge(dir, max_age_days) {
        Ok(result) if result.has_failures() => {
            for (path, reason) in &result.failed {
                internal::warn(
                    "RETENTION",
                    &format!("Could not delete {}: {reason}", path.display()),
                );
            }
            internal::info("RETENTION", &result.summary());
        }
        Ok(result) if result.count() > 0 => internal::info("RETENTION", &result.summary()),
        Ok(_) => internal::debug("RETENTION", "Nothing to purge"),
        Err(e) => internal::error(
            "RETENTION",
            &format!("Purge of {} failed: {e}", dir.display()),
        ),
    }
}

/// Starts the daily sweeper: first pass at the next local midnight, then every 24 hours.
///
/// # Errors
/// The sweeper thread cannot be spawned.
pub fn spawn_sweeper(
    purge: impl Purge,
    dir: PathBuf,
    max_age_days: u32,
) -> std::io::Result<TimerHandle> {
    spawn_sweeper_on(
        purge,
        dir,
        max_age_days,
        schedule::next_local_midnight(),
        DAY,
    )
}

fn spawn_sweeper_on(
    purge: impl Purge,
    dir: PathBuf,
    max_age_days: u32,
    first: Duration,
    period: Duration,
) -> std::io::Result<TimerHandle> {
    let mut next = Some(first);
    schedule::spawn(
        "rotlog-retention",
        move || next.take().unwrap_or(period),
        move || sweep(&purge, &dir, max_age_days),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;

    #[derive(Clone, Default)]
    struct Recording {
        calls: Arc<Mutex<Vec<(PathBuf, u32)>>>,
        fail: bool,
    }

    impl Purge for Recording {
        fn purge(&self, dir: &Path, max_age_days: u32) -> Result<PurgeResult, Error> {
            self.calls.lock().push((dir.to_path_buf(), max_age_days));
            if self.fail {
                return Err(Error::Io(std::io::Error::other("boom")));
            }
            Ok(PurgeResult::default())
        }
    }

    #[test]
    fn sweeper_passes_directory_and_age() {
        let purge = Recording::default();
        let calls = Arc::clone(&purge.calls);
        let handle = spawn_sweeper_on(
            purge,
            PathBuf::from("/var/log/app"),
            7,
            Duration::from_millis(5),
            Duration::from_millis(5),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(150));
        handle.join();

        let calls = calls.lock();
        assert!(calls.len() >= 2, "sweeper ran {} times", calls.len());
        assert!(
            calls
                .iter()
                .all(|(dir, days)| dir == Path::new("/var/log/app") && *days == 7)
        );
    }

    #[test]
    fn sweeper_keeps_running_after_failures() {
        let purge = Recording {
            fail: true,
            ..Recording::default()
        };
        let calls = Arc::clone(&purge.calls);
        let handle = spawn_sweeper_on(
            purge,
            PathBuf::from("."),
            1,
            Duration::from_millis(5),
            Duration::from_millis(5),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(150));
        handle.join();
        assert!(calls.lock().len() >= 2);
    }
}
