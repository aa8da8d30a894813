//! Usage:
//!   rotlog [--config FILE] pipe [--path P] [--level L] [--max-lines N] [--max-size S]
//!                               [--no-daily] [--queue N]
//!   rotlog [--config FILE] purge <DIR> --days N [--stem NAME]

use clap::Parser;
use rotlog::cli::{Cli, Command, cmd_pipe, cmd_purge};
use rotlog::config::Config;
use rotlog::internal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    internal::init_with_config(&config);

    match cli.command {
        Command::Pipe(ref args) => cmd_pipe(args, &config),
        Command::Purge(ref args) => cmd_purge(args, &config),
    }
}
