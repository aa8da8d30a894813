//! Command-line front end: pipe stdin into a rotating log, or purge old rotated files.

pub mod commands;

pub use commands::{cmd_pipe, cmd_purge};

use crate::level::Level;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rotlog - Rotating file logger.
#[derive(Parser)]
#[command(name = "rotlog", version, about = "Rotating file logger")]
pub struct Cli {
    /// Config file (defaults to ~/.config/rotlog/rotlog.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log every stdin line to the rotating file.
    Pipe(PipeArgs),
    /// Delete rotated files older than a number of days.
    Purge(PurgeArgs),
}

/// Overrides for the `[file]`, `[general]`, and `[dispatch]` config sections.
#[derive(clap::Args, Debug, Default)]
pub struct PipeArgs {
    /// Active log file
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,
    /// Level every line is logged at
    #[arg(long, default_value = "informational")]
    pub level: Level,
    /// Rotate after this many lines (0 disables)
    #[arg(long, value_name = "N")]
    pub max_lines: Option<u64>,
    /// Rotate before exceeding this size, e.g. "10M" (0 disables)
    #[arg(long, value_name = "SIZE")]
    pub max_size: Option<String>,
    /// Disable rotation at local midnight
    #[arg(long)]
    pub no_daily: bool,
    /// Async queue capacity; 0 writes synchronously
    #[arg(long, value_name = "N")]
    pub queue: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct PurgeArgs {
    /// Directory holding the rotated files
    pub dir: PathBuf,
    /// Delete files older than N whole days
    #[arg(long, value_name = "N")]
    pub days: u32,
    /// Active file name without extension (defaults to the configured file's)
    #[arg(long, value_name = "NAME")]
    pub stem: Option<String>,
}
