//! `rotlog pipe`: every stdin line becomes one record.

use crate::cli::PipeArgs;
use crate::config::Config;
use crate::internal;
use crate::logger::Logger;
use std::io::{self, BufRead};
use std::process::ExitCode;

/// Applies CLI overrides on top of `config`, then logs stdin until EOF.
#[must_use]
pub fn cmd_pipe(args: &PipeArgs, config: &Config) -> ExitCode {
    let mut config = config.clone();
    if let Some(ref path) = args.path {
        config.file.path.clone_from(path);
    }
    if let Some(lines) = args.max_lines {
        config.file.max_lines = lines;
    }
    if let Some(ref size) = args.max_size {
        config.file.max_size.clone_from(size);
    }
    if args.no_daily {
        config.file.daily = false;
    }
    if let Some(capacity) = args.queue {
        config.dispatch.queue_capacity = capacity;
    }

    let logger = match Logger::from_config(&config) {
        Ok(logger) => logger,
        Err(e) => {
            internal::error("PIPE", &format!("Cannot open log: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                internal::error("PIPE", &format!("Reading stdin failed: {e}"));
                status = ExitCode::FAILURE;
                break;
            }
        };
        if let Err(e) = logger.log(args.level, &line) {
            internal::error("PIPE", &format!("Write failed: {e}"));
            status = ExitCode::FAILURE;
            break;
        }
    }

    if let Err(e) = logger.close() {
        internal::error("PIPE", &format!("Close failed: {e}"));
        status = ExitCode::FAILURE;
    }
    status
}
