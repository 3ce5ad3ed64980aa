//! Configuration management for `ConnTree`
//!
//! This module provides the `ConfigManager` for loading and saving
//! the tree snapshot and application settings in TOML format.

mod manager;
pub mod settings;

pub use manager::ConfigManager;
pub use settings::{AppSettings, LoggingSettings, TreeSettings};
