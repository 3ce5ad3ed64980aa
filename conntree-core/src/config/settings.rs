//! Application settings model
//!
//! This module defines the application-wide settings stored in config.toml.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::models::{SortBy, SortDirection, SortPolicy};
use crate::tree::MAX_NESTING_DEPTH;

/// Application-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Connection tree settings
    #[serde(default)]
    pub tree: TreeSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppSettings {
    /// Validates all sections
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> ConfigResult<()> {
        self.tree.validate()?;
        self.logging.validate()
    }
}

/// Connection tree settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSettings {
    /// Sort key for siblings
    #[serde(default)]
    pub sort_by: SortBy,
    /// Sort direction
    #[serde(default)]
    pub sort_direction: SortDirection,
    /// Whether manual drag-and-drop ordering is honored
    #[serde(default = "default_true")]
    pub reorder_enabled: bool,
    /// Maximum nesting depth of the tree
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

const fn default_true() -> bool {
    true
}

const fn default_max_nesting_depth() -> usize {
    MAX_NESTING_DEPTH
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            reorder_enabled: true,
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl TreeSettings {
    /// Builds the sort policy these settings describe
    #[must_use]
    pub const fn sort_policy(&self) -> SortPolicy {
        SortPolicy::new(self.sort_by, self.sort_direction)
            .with_reorder_enabled(self.reorder_enabled)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Validation {
                field: "tree.max_nesting_depth".to_string(),
                reason: "Nesting depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingSettings {
    fn validate(&self) -> ConfigResult<()> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "logging.level".to_string(),
                reason: "Log level cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
