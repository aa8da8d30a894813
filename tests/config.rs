//! Config parsing and validation.

use rotlog::config::{Config, ConfigError, expand_path, parse_mode};
use rotlog::{Level, format_size, parse_size};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();

    assert_eq!(config.general.level, "debug");
    assert!(!config.general.call_site);
    assert_eq!(config.general.internal_level, "warning");
    assert!(config.file.rotate);
    assert!(config.file.daily);
    assert_eq!(config.file.max_lines, 0);
    assert_eq!(config.file.retention_days, 7);
    assert_eq!(config.file.permissions, "0640");
    assert_eq!(config.file.rotated_permissions, "0440");
    assert_eq!(config.dispatch.queue_capacity, 1000);
    assert!(config.file.path.ends_with("rotlog.log"));
}

#[test]
fn full_config_parses() {
    let toml = r#"
[general]
level = "warning"
call_site = true
internal_level = "debug"

[file]
path = "/var/log/app/service.log"
rotate = true
max_lines = 5000
max_size = "10M"
daily = false
retention_days = 30
permissions = "0600"
rotated_permissions = "0400"
timestamp_format = "%H:%M:%S"

[dispatch]
queue_capacity = 0
"#;
    let config = Config::parse(toml).unwrap();

    assert_eq!(config.parse_level().unwrap(), Level::Warning);
    assert!(config.general.call_site);
    assert_eq!(config.dispatch.queue_capacity, 0);

    let options = config.file_options().unwrap();
    assert_eq!(options.path(), Path::new("/var/log/app/service.log"));
    let policy = options.rotation_policy();
    assert!(policy.enabled);
    assert_eq!(policy.max_lines, 5000);
    assert_eq!(policy.max_size, 10 * 1024 * 1024);
    assert!(!policy.daily);
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = Config::parse("[file]\nmax_lines = 10\n").unwrap();
    assert_eq!(config.file.max_lines, 10);
    assert!(config.file.daily);
    assert_eq!(config.general.level, "debug");
}

#[test]
fn invalid_toml_is_parse_error() {
    let err = Config::parse("[file\npath = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn wrong_type_is_parse_error() {
    let err = Config::parse("[file]\nmax_lines = \"many\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn unknown_level_is_rejected() {
    let config = Config::parse("[general]\nlevel = \"loud\"\n").unwrap();
    let err = config.parse_level().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidLevel(ref s) if s == "loud"));
}

#[test]
fn empty_path_is_rejected() {
    let config = Config::parse("[file]\npath = \"  \"\n").unwrap();
    assert!(matches!(
        config.file_options().unwrap_err(),
        ConfigError::MissingPath
    ));
}

#[test]
fn bad_permissions_are_rejected() {
    let config = Config::parse("[file]\npath = \"a.log\"\npermissions = \"rw-r--r--\"\n").unwrap();
    assert!(matches!(
        config.file_options().unwrap_err(),
        ConfigError::InvalidPermissions(_)
    ));
}

#[test]
fn bad_size_is_rejected() {
    let config = Config::parse("[file]\npath = \"a.log\"\nmax_size = \"lots\"\n").unwrap();
    assert!(matches!(
        config.file_options().unwrap_err(),
        ConfigError::InvalidSize(_)
    ));
}

#[test]
fn load_from_missing_file_gives_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(&tmp.path().join("absent.toml")).unwrap();
    assert_eq!(config.dispatch.queue_capacity, 1000);
}

#[test]
fn load_from_reads_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rotlog.toml");
    fs::write(&path, "[dispatch]\nqueue_capacity = 64\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.dispatch.queue_capacity, 64);
}

#[test]
fn parse_mode_accepts_octal() {
    assert_eq!(parse_mode("0640").unwrap(), 0o640);
    assert_eq!(parse_mode("640").unwrap(), 0o640);
    assert_eq!(parse_mode("0o440").unwrap(), 0o440);
    assert_eq!(parse_mode("7777").unwrap(), 0o7777);
}

#[test]
fn parse_mode_rejects_garbage() {
    assert!(parse_mode("").is_err());
    assert!(parse_mode("0o").is_err());
    assert!(parse_mode("0980").is_err());
    assert!(parse_mode("17777").is_err());
}

#[test]
fn expand_path_expands_tilde() {
    let expanded = expand_path("~/logs/app.log").unwrap();
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with("logs/app.log"));
}

#[test]
fn expand_path_rejects_unknown_variable() {
    let err = expand_path("$ROTLOG_SURELY_UNSET_VARIABLE/app.log").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPath(_)));
}

#[test]
fn parse_size_units() {
    assert_eq!(parse_size("0"), Some(0));
    assert_eq!(parse_size("512"), Some(512));
    assert_eq!(parse_size("512B"), Some(512));
    assert_eq!(parse_size("4K"), Some(4096));
    assert_eq!(parse_size("4kb"), Some(4096));
    assert_eq!(parse_size("1.5M"), Some(1_572_864));
    assert_eq!(parse_size("2G"), Some(2 * 1024 * 1024 * 1024));
    assert_eq!(parse_size("-1M"), None);
    assert_eq!(parse_size("abc"), None);
}

#[test]
fn format_size_units() {
    assert_eq!(format_size(100), "100 B");
    assert_eq!(format_size(2048), "2.00 KB");
    assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
}
