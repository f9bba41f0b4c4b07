// ============================================================
// Layer 5 — Logger Setup
// ============================================================
// Installs the process's tracing subscriber once per run.
//
// Two sinks, same events:
//   stdout               ← for whoever is watching the run
//   <logs_dir>/info.log  ← appended, no ANSI colours
//
// RUST_LOG, when set, takes precedence over the requested level.
//
// There is no global logger object to reach for. Callers get a
// LoggerHandle back and pass it (or its path) to whatever needs
// to know where the run log lives.
//
// Reference: tracing-subscriber documentation (Layers, EnvFilter)

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name of the run log inside `logs_dir`.
pub const LOG_FILE_NAME: &str = "info.log";

/// Proof that logging was initialised, and where the run log is.
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    log_file: Option<PathBuf>,
    level:    Level,
}

impl LoggerHandle {
    /// The run log file, if this logger writes to one.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

fn filter_for(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()))
}

/// Log to stdout and to `<logs_dir>/info.log`.
///
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init_logger(logs_dir: &Path, level: Level) -> Result<LoggerHandle> {
    let log_file = logs_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Cannot open log file '{}'", log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logger already initialised: {e}"))?;

    tracing::debug!("Logging to '{}'", log_file.display());
    Ok(LoggerHandle { log_file: Some(log_file), level })
}

/// Log to stdout only, for commands that have no run directory.
pub fn init_stdout_logger(level: Level) -> Result<LoggerHandle> {
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logger already initialised: {e}"))?;

    Ok(LoggerHandle { log_file: None, level })
}
