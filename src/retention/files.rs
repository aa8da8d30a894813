//! Directory listing for the purge. Age and size are captured at scan time so the
//! delete decision and the freed-bytes report agree.

use super::RotatedNames;
use crate::internal;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub(super) struct RotatedFileInfo {
    pub path: PathBuf,
    pub size: u64,
    /// Whole days since last modification.
    pub age_days: u64,
}

/// Regular files directly under `dir` that look like rotated siblings per `names`.
pub(super) fn collect_rotated_files(
    dir: &Path,
    names: &RotatedNames,
    now: SystemTime,
) -> std::io::Result<Vec<RotatedFileInfo>> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !names.matches(name) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }

        let age_days = meta
            .modified()
            .ok()
            .and_then(|m| now.duration_since(m).ok())
            .map_or(0, |d| d.as_secs() / SECS_PER_DAY);

        internal::debug(
            "RETENTION",
            &format!("Found: {} ({age_days}d)", path.display()),
        );
        files.push(RotatedFileInfo {
            path,
            size: meta.len(),
            age_days,
        });
    }

    Ok(files)
}
