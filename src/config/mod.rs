//! Configuration module for flowscope
//!
//! This module handles dashboard configuration:
//! - Where the flow records come from (a JSON file, or the built-in sample)
//! - The selector values the dashboard starts with
//! - Logging settings
//!
//! Configuration is stored as TOML. A missing file is not an error; every
//! section falls back to its defaults.
//!
//! # Example
//!
//! ```ignore
//! use flowscope::config::DashboardConfig;
//!
//! let config = DashboardConfig::load_or_default("flowscope.toml");
//! let state = config.selectors.initial_state();
//! ```

use crate::dispatch::SelectorState;
use crate::error::{FlowScopeError, Result};
use crate::filter::Selection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config filename
pub const CONFIG_FILE: &str = "flowscope.toml";

// ==================== Dashboard Config ====================

/// Top-level dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    /// Record source configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Initial selector values
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowScopeError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            FlowScopeError::Config(format!("Failed to parse config {:?}: {}", path, e))
        })
    }

    /// Load configuration, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FlowScopeError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FlowScopeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            FlowScopeError::Config(format!("Failed to write config {:?}: {}", path, e))
        })
    }
}

// ==================== Data Config ====================

/// Where the flow records come from
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Path to a JSON file of flow records. `None` uses the built-in sample.
    #[serde(default)]
    pub records_path: Option<PathBuf>,
}

// ==================== Selector Config ====================

/// Initial selector values for the dashboard
///
/// These mirror the dashboard controls one to one. Values are not validated
/// here; the dispatcher normalizes them when it first recomputes, so a bad
/// value shows up as a per-view error rather than a startup failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Start of the date range (inclusive)
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// End of the date range (inclusive)
    #[serde(default = "default_end_date")]
    pub end_date: Option<NaiveDate>,

    /// Selected activity labels
    #[serde(default = "default_labels")]
    pub labels: Vec<u8>,

    /// Selected working-hour groups (`"all"` selects every group)
    #[serde(default = "default_working_hours")]
    pub working_hours: Vec<String>,

    /// Grouping field for the box chart
    #[serde(default = "default_box_group_by")]
    pub box_group_by: String,

    /// Metric on the shared x axis
    #[serde(default = "default_x_metric")]
    pub x_metric: String,

    /// Metric on the shared y axis
    #[serde(default = "default_y_metric")]
    pub y_metric: String,
}

fn default_end_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2020, 12, 14)
}

fn default_labels() -> Vec<u8> {
    vec![0, 1, 2, 3, 4]
}

fn default_working_hours() -> Vec<String> {
    vec!["all".to_string()]
}

fn default_box_group_by() -> String {
    "k".to_string()
}

fn default_x_metric() -> String {
    "flows".to_string()
}

fn default_y_metric() -> String {
    "packets".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: default_end_date(),
            labels: default_labels(),
            working_hours: default_working_hours(),
            box_group_by: default_box_group_by(),
            x_metric: default_x_metric(),
            y_metric: default_y_metric(),
        }
    }
}

impl SelectorConfig {
    /// Build the dispatcher's starting state from this configuration
    pub fn initial_state(&self) -> SelectorState {
        let mut state = SelectorState::default();
        state.filters.start_date = self.start_date;
        state.filters.end_date = self.end_date;
        state.filters.labels = Selection::Many(self.labels.clone());
        state.filters.working_hours = Selection::Many(self.working_hours.clone());
        state.box_group_by = self.box_group_by.clone();
        state.x_metric = self.x_metric.clone();
        state.y_metric = self.y_metric.clone();
        state
    }
}

// ==================== Logging Config ====================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable logging to a daily-rotated file in addition to stderr
    #[serde(default)]
    pub log_to_file: bool,

    /// Directory for log files (if file logging is enabled)
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_to_file: false,
            log_dir: default_log_dir(),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors() {
        let config = DashboardConfig::default();
        assert_eq!(config.selectors.start_date, None);
        assert_eq!(
            config.selectors.end_date,
            NaiveDate::from_ymd_opt(2020, 12, 14)
        );
        assert_eq!(config.selectors.labels, vec![0, 1, 2, 3, 4]);
        assert_eq!(config.selectors.working_hours, vec!["all"]);
        assert_eq!(config.selectors.box_group_by, "k");
        assert_eq!(config.selectors.x_metric, "flows");
        assert_eq!(config.selectors.y_metric, "packets");
        assert!(!config.logging.log_to_file);
    }

    #[test]
    fn test_initial_state_mirrors_selectors() {
        let mut config = DashboardConfig::default();
        config.selectors.labels = vec![3, 4];
        config.selectors.y_metric = "bytes".to_string();

        let state = config.selectors.initial_state();
        assert_eq!(state.filters.labels, Selection::Many(vec![3, 4]));
        assert_eq!(
            state.filters.working_hours,
            Selection::Many(vec!["all".to_string()])
        );
        assert_eq!(state.filters.end_date, NaiveDate::from_ymd_opt(2020, 12, 14));
        assert_eq!(state.y_metric, "bytes");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = DashboardConfig::load("/nonexistent/flowscope.toml").unwrap();
        assert_eq!(config.selectors.box_group_by, "k");
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = DashboardConfig::default();
        config.selectors.start_date = NaiveDate::from_ymd_opt(2020, 12, 3);
        config.selectors.working_hours = vec!["primary_working".to_string()];
        config.logging.log_to_file = true;
        config.save(&path).unwrap();

        let loaded = DashboardConfig::load(&path).unwrap();
        assert_eq!(
            loaded.selectors.start_date,
            NaiveDate::from_ymd_opt(2020, 12, 3)
        );
        assert_eq!(loaded.selectors.working_hours, vec!["primary_working"]);
        assert!(loaded.logging.log_to_file);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[selectors]\ny_metric = \"bytes\"\n").unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.selectors.y_metric, "bytes");
        assert_eq!(config.selectors.x_metric, "flows");
        assert_eq!(
            config.selectors.end_date,
            NaiveDate::from_ymd_opt(2020, 12, 14)
        );
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "selectors = not a table").unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, FlowScopeError::Config(_)));
    }
}
