//! Settings for the ledger screen, loaded from an optional TOML file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transition::DEFAULT_TRANSITION;

/// Filter used when neither `RUST_LOG` nor the config file sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Configuration loaded from config.toml
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Load transactions from this CSV instead of the embedded seed
    pub transactions_csv: Option<PathBuf>,
    /// tracing filter directive, e.g. "info" or "category_ledger=debug"
    pub log_filter: Option<String>,
    /// Expand/collapse transition length, 0 disables transitions
    pub transition_ms: u64,
    /// Categories toggled to collapsed right after initialization
    pub start_collapsed: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            transactions_csv: None,
            log_filter: None,
            transition_ms: DEFAULT_TRANSITION.as_millis() as u64,
            start_collapsed: Vec::new(),
        }
    }
}

impl Settings {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context(
            "Invalid settings. Expected keys: transactions_csv, log_filter, \
             transition_ms, start_collapsed",
        )
    }

    /// File settings when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

// =============================================================================
// Tests
// =============================================================================
