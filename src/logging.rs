use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_LEVEL;

/// Send logs to `<data dir>/budgetline.log`; the TUI owns stdout.
pub(crate) fn init(data_dir: &Path, level: &str) -> Result<()> {
    let path = data_dir.join("budgetline.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))
}

/// Env-filter syntax; an unparsable directive falls back to `info`.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;
