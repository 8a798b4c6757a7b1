//! Logger setup
//!
//! The terminal UI owns stdout and stderr while it runs, so it logs to a
//! file. One-shot commands log to stderr. `RUST_LOG` wins over both defaults.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Where log records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Default level for a count of `-v` flags
pub fn level_for(verbosity: u8, target: &LogTarget) -> LevelFilter {
    let base = match target {
        LogTarget::Stderr => 0,
        LogTarget::File(_) => 1,
    };
    match verbosity.saturating_add(base) {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger
pub fn init(target: LogTarget, verbosity: u8) -> Result<()> {
    let level = level_for(verbosity, &target);
    let mut builder = Builder::from_env(Env::default().default_filter_or(level.as_str()));

    if let LogTarget::File(path) = &target {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Logger already initialized")?;
    log::debug!("Logging at {level} to {target:?}");
    Ok(())
}
