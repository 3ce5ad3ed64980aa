//! Configuration manager for TOML file operations
//!
//! This module provides the `ConfigManager` which handles loading and saving
//! the tree snapshot and the application settings.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::models::Node;
use crate::tree::validate_forest;

use super::settings::AppSettings;

/// File names for configuration files
const TREE_FILE: &str = "tree.toml";
const CONFIG_FILE: &str = "config.toml";

/// Wrapper for serializing the node snapshot
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct NodesFile {
    #[serde(default)]
    nodes: Vec<Node>,
}

/// Configuration manager for `ConnTree`
///
/// Handles loading and saving configuration files in TOML format.
/// Configuration is stored in `~/.config/conntree/` by default.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Base directory for configuration files
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new `ConfigManager` with the default configuration directory
    ///
    /// The default directory is `~/.config/conntree/`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from("~/.config")))?
            .join("conntree");
        Ok(Self { config_dir })
    }

    /// Creates a new `ConfigManager` with a custom configuration directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Returns the configuration directory path
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Ensures the configuration directory exists
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> ConfigResult<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).map_err(|e| {
                ConfigError::Write(format!(
                    "Failed to create config directory {}: {}",
                    self.config_dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    // ========== Tree ==========

    /// Loads the node snapshot
    ///
    /// Returns an empty vector if the file doesn't exist. Records that break
    /// the forest rules are kept but reported, so the user can repair them
    /// by moving nodes around.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a record is invalid.
    pub fn load_nodes(&self) -> ConfigResult<Vec<Node>> {
        let path = self.config_dir.join(TREE_FILE);
        let nodes = Self::load_toml_file::<NodesFile>(&path)?.nodes;
        Self::validate_nodes(&nodes)?;

        let max_depth = self.load_settings()?.tree.max_nesting_depth;
        if let Err(e) = validate_forest(&nodes, max_depth) {
            warn!(path = %path.display(), "Loaded tree is inconsistent: {e}");
        }

        Ok(nodes)
    }

    /// Saves the node snapshot
    ///
    /// Creates the configuration directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is invalid or the file cannot be written.
    pub fn save_nodes(&self, nodes: &[Node]) -> ConfigResult<()> {
        Self::validate_nodes(nodes)?;
        self.ensure_config_dir()?;
        let path = self.config_dir.join(TREE_FILE);
        let file = NodesFile {
            nodes: nodes.to_vec(),
        };
        Self::save_toml_file(&path, &file)
    }

    // ========== Settings ==========

    /// Loads application settings from the configuration file
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or holds
    /// invalid values.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        let path = self.config_dir.join(CONFIG_FILE);
        let settings: AppSettings = Self::load_toml_file(&path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Saves application settings to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the file cannot be written.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        settings.validate()?;
        self.ensure_config_dir()?;
        let path = self.config_dir.join(CONFIG_FILE);
        Self::save_toml_file(&path, settings)
    }

    // ========== Generic TOML Operations ==========

    /// Loads and parses a TOML file
    ///
    /// Returns the default value if the file doesn't exist.
    fn load_toml_file<T>(path: &Path) -> ConfigResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read {}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| {
            ConfigError::Deserialize(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Saves data to a TOML file
    fn save_toml_file<T>(path: &Path, data: &T) -> ConfigResult<()>
    where
        T: serde::Serialize,
    {
        let content = toml::to_string_pretty(data)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize: {e}")))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::Write(format!("Failed to write {}: {}", path.display(), e)))
    }

    // ========== Validation ==========

    /// Validates a single node record
    ///
    /// # Errors
    ///
    /// Returns an error if the node has an empty name.
    pub fn validate_node(node: &Node) -> ConfigResult<()> {
        if node.name.trim().is_empty() {
            let kind = if node.is_group { "Group" } else { "Connection" };
            return Err(ConfigError::Validation {
                field: "name".to_string(),
                reason: format!("{kind} name cannot be empty ({})", node.id),
            });
        }
        Ok(())
    }

    /// Validates a node snapshot record by record
    ///
    /// Structural problems (dangling parents, cycles, depth) are left to
    /// [`validate_forest`].
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid record or a duplicate ID.
    pub fn validate_nodes(nodes: &[Node]) -> ConfigResult<()> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in nodes {
            Self::validate_node(node)?;
            if !seen.insert(node.id) {
                return Err(ConfigError::Validation {
                    field: "id".to_string(),
                    reason: format!("Duplicate node ID: {}", node.id),
                });
            }
        }
        Ok(())
    }
}
