//! Error types for `ConnTree`
//!
//! This module defines the error types used by the connection tree core and
//! its configuration layer. Tree errors are never fatal: every rejected move
//! leaves the snapshot untouched and is reported back to the caller.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when a tree operation is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The referenced node is not part of the snapshot (stale id)
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    /// A node cannot become its own parent
    #[error("Cannot be its own parent")]
    SelfParent,

    /// A node cannot move into its own subtree
    #[error("Cannot move into own descendant")]
    IntoDescendant,

    /// The parent chain of a node loops back on itself
    #[error("Cycle detected at node {0}")]
    Cycle(Uuid),

    /// The move would nest the subtree deeper than allowed
    #[error("Max depth ({max}) exceeded")]
    DepthExceeded {
        /// The nesting ceiling that would be exceeded
        max: usize,
    },

    /// The proposed parent is a connection, not a group
    #[error("Only groups can contain connections")]
    NotAGroup(Uuid),

    /// The operation would not change anything
    #[error("Nothing to move: {0}")]
    NoOp(&'static str),
}

/// Coarse classification of [`TreeError`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeErrorKind {
    /// Dragged or target id no longer exists
    StaleReference,
    /// Proposed parent is the node itself or one of its descendants
    CycleViolation,
    /// Resulting subtree would exceed the nesting ceiling
    DepthExceeded,
    /// Proposed parent cannot hold children
    InvalidParent,
    /// No effective change
    NoOp,
}

impl TreeError {
    /// Returns the category this error belongs to
    #[must_use]
    pub const fn kind(&self) -> TreeErrorKind {
        match self {
            Self::NodeNotFound(_) => TreeErrorKind::StaleReference,
            Self::SelfParent | Self::IntoDescendant | Self::Cycle(_) => {
                TreeErrorKind::CycleViolation
            }
            Self::DepthExceeded { .. } => TreeErrorKind::DepthExceeded,
            Self::NotAGroup(_) => TreeErrorKind::InvalidParent,
            Self::NoOp(_) => TreeErrorKind::NoOp,
        }
    }
}

/// Errors related to configuration file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// The reason for validation failure
        reason: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to write configuration file
    #[error("Failed to write configuration: {0}")]
    Write(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Failed to deserialize configuration
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),
}

/// Result type alias for tree operations
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
