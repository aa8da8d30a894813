//! Retention purge of rotated siblings.

use rotlog::retention::{Purge, RotatedFiles, RotatedNames, purge_rotated};
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: u64 = 24 * 60 * 60;

fn create_aged(dir: &Path, name: &str, content: &str, days: u64) {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(days * DAY + 60);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

#[test]
fn purges_only_expired_rotated_siblings() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let active = dir.join("app.log");

    create_aged(dir, "app.log", "active", 30);
    create_aged(dir, "app.2024-01-01.log", "old daily", 10);
    create_aged(dir, "app.2024-01-01.001.log", "old numbered", 10);
    create_aged(dir, "app.2024-01-09.002.log", "recent", 3);
    create_aged(dir, "other.2024-01-01.log", "other stem", 10);
    create_aged(dir, "app.notes.log", "not a date", 10);
    create_aged(dir, "app.2024-01-01.log.gz", "wrong suffix", 10);
    create_aged(dir, "app.2024-01-01.1.log", "short sequence", 10);

    let result = purge_rotated(dir, &RotatedNames::for_path(&active), Some(active.as_path()), 7).unwrap();

    assert_eq!(result.count(), 2);
    assert_eq!(result.bytes(), ("old daily".len() + "old numbered".len()) as u64);
    assert!(!result.has_failures());
    assert!(!dir.join("app.2024-01-01.log").exists());
    assert!(!dir.join("app.2024-01-01.001.log").exists());
    for kept in [
        "app.log",
        "app.2024-01-09.002.log",
        "other.2024-01-01.log",
        "app.notes.log",
        "app.2024-01-01.log.gz",
        "app.2024-01-01.1.log",
    ] {
        assert!(dir.join(kept).exists(), "{kept} was deleted");
    }
}

#[test]
fn age_must_exceed_threshold() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let active = dir.join("app.log");
    create_aged(dir, "app.2024-02-01.log", "seven", 7);
    create_aged(dir, "app.2024-02-02.log", "eight", 8);

    let result = purge_rotated(dir, &RotatedNames::for_path(&active), Some(active.as_path()), 7).unwrap();

    assert_eq!(result.deleted, vec![dir.join("app.2024-02-02.log")]);
    assert!(dir.join("app.2024-02-01.log").exists());
}

#[test]
fn directories_with_rotated_names_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let nested = dir.join("app.2020-01-01.log");
    fs::create_dir(&nested).unwrap();
    create_aged(&nested, "app.2020-01-01.log", "nested", 100);

    let result = RotatedFiles::for_path(&dir.join("app.log"))
        .purge(dir, 1)
        .unwrap();

    assert_eq!(result.count(), 0);
    assert!(nested.join("app.2020-01-01.log").exists());
}

#[test]
fn missing_directory_is_empty_result() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("never-created");

    let result = RotatedFiles::for_path(&dir.join("app.log"))
        .purge(&dir, 1)
        .unwrap();
    assert_eq!(result.count(), 0);
    assert_eq!(result.summary(), "Purged 0 file(s), 0 B freed");
}

#[test]
fn extensionless_active_file_uses_log_suffix() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    create_aged(dir, "service.2024-01-01.log", "old", 30);

    let result = RotatedFiles::for_path(&dir.join("service"))
        .purge(dir, 7)
        .unwrap();
    assert_eq!(result.count(), 1);
}

#[test]
fn rotated_names_match_shapes() {
    let names = RotatedNames::for_path(Path::new("/var/log/app.log"));
    assert!(names.matches("app.2024-03-15.log"));
    assert!(names.matches("app.2024-03-15.999.log"));
    assert!(!names.matches("app.log"));
    assert!(!names.matches("app.2024-13-15.log"));
    assert!(!names.matches("app.2024-03-15.1000.log"));
    assert!(!names.matches("application.2024-03-15.log"));
    assert_eq!(names.dir(), Path::new("/var/log"));
}
