//! `ConnTree` Core Library
//!
//! This crate provides the connection tree behind a connection manager's
//! sidebar: the node model, the nesting guard, sibling ordering, drop
//! position resolution, the drag-and-drop reorder engine and TOML
//! persistence.

pub mod config;
pub mod error;
pub mod models;
pub mod tree;

pub use config::{AppSettings, ConfigManager, LoggingSettings, TreeSettings};
pub use error::{ConfigError, ConfigResult, TreeError, TreeErrorKind, TreeResult};
pub use models::{Node, ProtocolType, SortBy, SortDirection, SortPolicy};
pub use tree::{
    build_children, build_visible_rows, DragState, DropOutcome, DropPosition, ReorderEngine,
    RowRect, VisibleRow, MAX_NESTING_DEPTH,
};
