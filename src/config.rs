//! Configuration file support
//!
//! Loads settings from ~/.paritylight.toml (or %USERPROFILE%\.paritylight.toml on Windows)
//!
//! Example:
//! ```text
//! # paritylight configuration
//! line-numbers = true
//! log-file = "/tmp/paritylight.log"
//! log-level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Where tracing output goes (None = logging off)
    pub log_file: Option<PathBuf>,
    /// Default filter directive when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_line_numbers: false,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".paritylight.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".paritylight.toml"))
        }
    }

    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Config::default();

        if let Ok(contents) = fs::read_to_string(path) {
            let settings = Self::parse(&contents)?;
            config.apply(&settings);
        }

        Ok(config)
    }

    /// Parse config file contents into a TOML table
    fn parse(contents: &str) -> Result<toml::Table> {
        Ok(contents.parse::<toml::Table>()?)
    }

    /// Apply settings from parsed config, ignoring unknown keys and wrong types
    fn apply(&mut self, settings: &toml::Table) {
        if let Some(value) = settings.get("line-numbers").and_then(|v| v.as_bool()) {
            self.show_line_numbers = value;
        }

        if let Some(value) = settings.get("log-file").and_then(|v| v.as_str()) {
            if !value.is_empty() {
                self.log_file = Some(PathBuf::from(value));
            }
        }

        if let Some(value) = settings.get("log-level").and_then(|v| v.as_str()) {
            self.log_level = value.to_string();
        }
    }
}
