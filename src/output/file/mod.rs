//! Rotating file output.
//!
//! One writer owns one active file. Each write checks the rotation policy and appends
//! under the exclusive lock, so a threshold is crossed exactly once however many
//! threads write. The daily trigger checks under the shared lock first and re-checks
//! under the exclusive one. Rotation always ends by reopening the active path: a failed
//! rename costs the history step, never the ability to log.

mod naming;
mod policy;

pub use naming::{DEFAULT_SUFFIX, MAX_SEQUENCE, RotatedNames};
pub use policy::{FileUsage, RotationPolicy};

use super::{LogRecord, Output};
use crate::config::DEFAULT_RETENTION_DAYS;
use crate::retention::{self, RotatedFiles};
use crate::schedule::{self, TimerHandle};
use crate::{Error, internal};
use chrono::{DateTime, Local, NaiveDate};
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Buffer used for the one-off newline scan when seeding the line counter.
const LINE_SCAN_BUFFER: usize = 32 * 1024;

/// Everything needed to open a [`RotatingFileWriter`].
#[derive(Debug, Clone)]
pub struct FileOptions {
    path: PathBuf,
    policy: RotationPolicy,
    retention_days: u32,
    permissions: Option<u32>,
    rotated_permissions: Option<u32>,
    timestamp_format: String,
}

impl FileOptions {
    /// Daily rotation, 7-day retention, `0640` active and `0440` rotated files.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: RotationPolicy::default(),
            retention_days: DEFAULT_RETENTION_DAYS,
            permissions: Some(0o640),
            rotated_permissions: Some(0o440),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }

    #[must_use]
    pub const fn policy(mut self, policy: RotationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn max_lines(mut self, lines: u64) -> Self {
        self.policy.max_lines = lines;
        self
    }

    #[must_use]
    pub const fn max_size(mut self, bytes: u64) -> Self {
        self.policy.max_size = bytes;
        self
    }

    #[must_use]
    pub const fn daily(mut self, daily: bool) -> Self {
        self.policy.daily = daily;
        self
    }

    #[must_use]
    pub const fn rotate(mut self, enabled: bool) -> Self {
        self.policy.enabled = enabled;
        self
    }

    /// 0 turns the retention sweeper off.
    #[must_use]
    pub const fn retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Mode of the active file (unix only).
    #[must_use]
    pub const fn permissions(mut self, mode: u32) -> Self {
        self.permissions = Some(mode);
        self
    }

    /// Mode applied to a file after it has been rotated aside (unix only).
    #[must_use]
    pub const fn rotated_permissions(mut self, mode: u32) -> Self {
        self.rotated_permissions = Some(mode);
        self
    }

    /// Leave modes to the process umask.
    #[must_use]
    pub const fn inherit_permissions(mut self) -> Self {
        self.permissions = None;
        self.rotated_permissions = None;
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn rotation_policy(&self) -> RotationPolicy {
        self.policy
    }
}

struct WriterState {
    file: Option<File>,
    lines: u64,
    bytes: u64,
    opened: DateTime<Local>,
    closed: bool,
}

impl WriterState {
    fn usage(&self) -> FileUsage {
        FileUsage {
            lines: self.lines,
            bytes: self.bytes,
            opened: self.opened.date_naive(),
        }
    }
}

struct Shared {
    options: FileOptions,
    names: RotatedNames,
    state: RwLock<WriterState>,
}

/// Appends rendered records to one file and rotates it by lines, size, or day.
pub struct RotatingFileWriter {
    shared: Arc<Shared>,
    timers: Mutex<Vec<TimerHandle>>,
}

impl RotatingFileWriter {
    /// Opens (or creates) the active file and starts the daily trigger and retention
    /// sweeper when they are configured.
    ///
    /// # Errors
    /// The path cannot be created or opened, the mode cannot be applied, or a
    /// background thread cannot be spawned.
    pub fn open(options: FileOptions) -> Result<Self, Error> {
        if let Some(parent) = options.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }

        let shared = Shared {
            names: RotatedNames::for_path(&options.path),
            state: RwLock::new(WriterState {
                file: None,
                lines: 0,
                bytes: 0,
                opened: Local::now(),
                closed: false,
            }),
            options,
        };
        shared.restart(&mut shared.state.write())?;
        let shared = Arc::new(shared);

        let policy = shared.options.policy;
        let mut timers = Vec::new();
        if policy.enabled && policy.daily {
            let trigger = Arc::clone(&shared);
            timers.push(schedule::spawn(
                "rotlog-daily",
                schedule::next_local_midnight,
                move || trigger.rotate_if_due(Local::now()),
            )?);
        }
        if policy.enabled && shared.options.retention_days > 0 {
            let purge = RotatedFiles::new(shared.names.clone(), shared.options.path.clone());
            timers.push(retention::spawn_sweeper(
                purge,
                shared.names.dir().to_path_buf(),
                shared.options.retention_days,
            )?);
        }

        internal::debug(
            "FILE",
            &format!("Opened {} ({policy:?})", shared.options.path.display()),
        );
        Ok(Self {
            shared,
            timers: Mutex::new(timers),
        })
    }

    /// Active file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.shared.options.path
    }

    /// Lines in the active file as of the last successful write.
    #[must_use]
    pub fn line_count(&self) -> u64 {
        self.shared.state.read().lines
    }

    /// Bytes in the active file as of the last successful write.
    #[must_use]
    pub fn byte_count(&self) -> u64 {
        self.shared.state.read().bytes
    }

    /// When the active file was (re)opened.
    #[must_use]
    pub fn opened_at(&self) -> DateTime<Local> {
        self.shared.state.read().opened
    }

    /// Whether writing `pending_bytes` more on `today` should rotate first.
    #[must_use]
    pub fn needs_rotation(&self, pending_bytes: u64, today: NaiveDate) -> bool {
        self.shared.needs_rotation(&self.shared.state.read(), pending_bytes, today)
    }

    /// Rotates now, regardless of thresholds.
    ///
    /// # Errors
    /// [`Error::RotationExhausted`] leaves the active file untouched.
    /// [`Error::Rotate`] means the old file could not be moved aside but the writer is
    /// usable. [`Error::Reopen`] means the writer has no file handle; the next write
    /// retries opening it.
    pub fn rotate(&self, now: DateTime<Local>) -> Result<(), Error> {
        let mut state = self.shared.state.write();
        if state.closed {
            return Err(Error::Closed);
        }
        self.shared.rotate_locked(&mut state, now)
    }
}

impl Shared {
    fn needs_rotation(&self, state: &WriterState, pending_bytes: u64, today: NaiveDate) -> bool {
        self.options
            .policy
            .needs_rotation(&state.usage(), pending_bytes, today)
    }

    fn render(&self, record: &LogRecord) -> String {
        format!(
            "{} {}\n",
            record.when().format(&self.options.timestamp_format),
            record.text()
        )
    }

    /// Daily trigger body. Checks under the shared lock so an idle tick never blocks
    /// writers, then re-checks under the exclusive one.
    fn rotate_if_due(&self, now: DateTime<Local>) {
        if !self.needs_rotation(&self.state.read(), 0, now.date_naive()) {
            return;
        }
        let mut state = self.state.write();
        if state.closed || !self.needs_rotation(&state, 0, now.date_naive()) {
            return;
        }
        internal::debug("ROTATE", "Day changed, rotating");
        if let Err(e) = self.rotate_locked(&mut state, now) {
            report_rotation_error(&e);
        }
    }

    fn rotate_locked(&self, state: &mut WriterState, now: DateTime<Local>) -> Result<(), Error> {
        let path = &self.options.path;
        let policy = self.options.policy;

        // An externally deleted active file has nothing to move aside
        let moved = if fs::symlink_metadata(path).is_ok() {
            let date = if policy.daily {
                state.opened.date_naive()
            } else {
                now.date_naive()
            };
            let target = self
                .names
                .next_free(date, policy.numbered())
                .ok_or_else(|| Error::RotationExhausted(path.clone()))?;

            // Handle must be closed before the rename
            if let Some(file) = state.file.take() {
                let _ = file.sync_all();
            }
            self.move_aside(&target)
        } else {
            internal::warn(
                "ROTATE",
                &format!("{} vanished, reopening without rename", path.display()),
            );
            Ok(())
        };

        let reopened = self.restart(state);

        match (moved, reopened) {
            (_, Err(source)) => Err(Error::Reopen {
                path: path.clone(),
                source,
            }),
            (Err(source), Ok(())) => Err(Error::Rotate {
                path: path.clone(),
                source,
            }),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    fn move_aside(&self, target: &Path) -> io::Result<()> {
        fs::rename(&self.options.path, target)?;
        #[cfg(unix)]
        if let Some(mode) = self.options.rotated_permissions {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(target, fs::Permissions::from_mode(mode))?;
        }
        internal::info("ROTATE", &format!("Rotated to {}", target.display()));
        Ok(())
    }

    /// (Re)opens the active path and resets counters to what is actually on disk.
    fn restart(&self, state: &mut WriterState) -> io::Result<()> {
        state.file = None;
        let file = self.create_file()?;
        let bytes = file.metadata()?.len();
        let lines = if bytes > 0 && self.options.policy.max_lines > 0 {
            count_lines(&self.options.path)?
        } else {
            0
        };

        state.file = Some(file);
        state.bytes = bytes;
        state.lines = lines;
        state.opened = Local::now();
        Ok(())
    }

    fn create_file(&self) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            if let Some(mode) = self.options.permissions {
                options.mode(mode);
                let file = options.open(&self.options.path)?;
                // `mode` is filtered by the umask; set it explicitly
                file.set_permissions(fs::Permissions::from_mode(mode))?;
                return Ok(file);
            }
        }

        options.open(&self.options.path)
    }
}

/// Counts `\n` bytes in `path` with a fixed-size buffer.
///
/// # Errors
/// Open or read failures.
pub fn count_lines(path: &Path) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; LINE_SCAN_BUFFER];
    let mut count = 0u64;
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        count += buf[..n].iter().filter(|&&b| b == b'\n').count() as u64;
    }
    Ok(count)
}

fn report_rotation_error(e: &Error) {
    match e {
        Error::Reopen { .. } => internal::error("ROTATE", &e.to_string()),
        _ => internal::warn("ROTATE", &e.to_string()),
    }
}

impl Output for RotatingFileWriter {
    fn write(&self, record: &LogRecord) -> Result<(), Error> {
        let shared = &self.shared;
        let line = shared.render(record);
        let pending = line.len() as u64;
        let today = record.when().date_naive();

        let mut state = shared.state.write();
        if state.closed {
            return Err(Error::Closed);
        }
        if shared.needs_rotation(&state, pending, today)
            && let Err(e) = shared.rotate_locked(&mut state, record.when())
        {
            report_rotation_error(&e);
        }
        if state.file.is_none() {
            shared.restart(&mut state)?;
        }
        let Some(file) = state.file.as_mut() else {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no open log file",
            )));
        };

        file.write_all(line.as_bytes())?;
        state.lines += 1;
        state.bytes += pending;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let state = self.shared.state.read();
        if let Some(file) = &state.file
            && let Err(e) = file.sync_all()
        {
            internal::warn(
                "FILE",
                &format!("Sync of {} failed: {e}", self.shared.options.path.display()),
            );
            return Err(e.into());
        }
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        for timer in self.timers.lock().drain(..) {
            timer.join();
        }

        let mut state = self.shared.state.write();
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        if let Some(file) = state.file.take() {
            file.sync_all()?;
        }
        internal::debug(
            "FILE",
            &format!("Closed {}", self.shared.options.path.display()),
        );
        Ok(())
    }
}
