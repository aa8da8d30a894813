//! `rotlog purge`: one retention pass without a running logger.

use crate::cli::PurgeArgs;
use crate::config::Config;
use crate::internal;
use crate::retention::{RotatedNames, purge_rotated};
use std::path::Path;
use std::process::ExitCode;

const FALLBACK_STEM: &str = "rotlog";

#[must_use]
pub fn cmd_purge(args: &PurgeArgs, config: &Config) -> ExitCode {
    let configured = Path::new(&config.file.path);
    let stem = args.stem.clone().unwrap_or_else(|| {
        configured
            .file_stem()
            .map_or_else(|| FALLBACK_STEM.to_string(), |s| s.to_string_lossy().into_owned())
    });
    let extension = configured
        .extension()
        .map_or_else(|| "log".to_string(), |e| e.to_string_lossy().into_owned());

    let active = args.dir.join(format!("{stem}.{extension}"));
    let names = RotatedNames::for_path(&active);
    internal::debug(
        "PURGE",
        &format!("Siblings of {} older than {}d", active.display(), args.days),
    );

    match purge_rotated(&args.dir, &names, Some(active.as_path()), args.days) {
        Ok(result) => {
            for path in &result.deleted {
                println!("deleted {}", path.display());
            }
            for (path, reason) in &result.failed {
                eprintln!("failed  {}: {reason}", path.display());
            }
            println!("{}", result.summary());
            if result.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            internal::error("PURGE", &format!("{}: {e}", args.dir.display()));
            ExitCode::FAILURE
        }
    }
}
