//! Configuration for [`History`](crate::History).
//!
//! Every field has a default, so an empty TOML document is a valid config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options recognized by the navigation state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Display title given to the sentinel entry in the browser's history
    /// list (default: "go back").
    #[serde(default = "default_back_label")]
    pub back_label: String,
    /// Root path (default: "/").
    #[serde(default = "default_root")]
    pub root: String,
    /// Put the root at the bottom of the stack when the initial address is
    /// not the root (default: true).
    #[serde(default = "default_insert_root")]
    pub insert_root: bool,
    /// Delay between native back steps while `destroy()` drains history,
    /// in milliseconds (default: 50).
    #[serde(default = "default_destroy_poll_interval_ms")]
    pub destroy_poll_interval_ms: u64,
}

// Default value functions
fn default_back_label() -> String {
    "go back".to_string()
}

fn default_root() -> String {
    "/".to_string()
}

fn default_insert_root() -> bool {
    true
}

fn default_destroy_poll_interval_ms() -> u64 {
    50
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            back_label: default_back_label(),
            root: default_root(),
            insert_root: default_insert_root(),
            destroy_poll_interval_ms: default_destroy_poll_interval_ms(),
        }
    }
}

impl HistoryConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Set the sentinel's display title.
    pub fn with_back_label(mut self, label: &str) -> Self {
        self.back_label = label.to_string();
        self
    }

    /// Set the root path.
    pub fn with_root(mut self, root: &str) -> Self {
        self.root = root.to_string();
        self
    }

    /// Enable or disable root insertion.
    pub fn with_insert_root(mut self, insert_root: bool) -> Self {
        self.insert_root = insert_root;
        self
    }

    /// Set the destroy polling delay.
    pub fn with_destroy_poll_interval(mut self, interval: Duration) -> Self {
        self.destroy_poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Destroy polling delay as a duration.
    pub fn destroy_poll_interval(&self) -> Duration {
        Duration::from_millis(self.destroy_poll_interval_ms)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
