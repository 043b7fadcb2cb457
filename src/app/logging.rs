//! Logger setup.
//!
//! `RUST_LOG` refines the default `info` level. The TUI owns the terminal, so
//! it logs to a file instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use log::LevelFilter;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn init(target: LogTarget) -> Result<(), AppError> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info).parse_default_env();

    if let LogTarget::File(path) = &target {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::new(2, format!("Failed to create log directory '{}': {e}", parent.display()))
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::new(2, format!("Failed to open log file '{}': {e}", path.display())))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // A second init (e.g. from tests) keeps the first logger.
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized; keeping existing target");
    }
    Ok(())
}
