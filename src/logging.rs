//! Tracing setup
//!
//! The terminal runs in raw mode on the alternate screen, so log output
//! can never go to stdout/stderr. Logs go to a file when one is configured
//! and are dropped otherwise.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;

/// Environment variable that overrides the `log-file` config key
pub const LOG_FILE_ENV: &str = "PARITYLIGHT_LOG";

/// Resolve the log file, preferring the environment over the config file
pub fn log_file(config: &Config) -> Option<PathBuf> {
    std::env::var_os(LOG_FILE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| config.log_file.clone())
}

/// Install the global subscriber. Returns whether logging is active.
pub fn init(config: &Config) -> Result<bool> {
    let Some(path) = log_file(config) else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be set (tests, embedding hosts)
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(path = %path.display(), "logging initialised");
    }
    Ok(installed)
}
