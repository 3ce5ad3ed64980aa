//! Tree node model shared by connections and groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::protocol::ProtocolType;

/// A single entry in the connection tree
///
/// Connections are leaves (`is_group == false`); groups may contain other
/// nodes through their `parent_id` links. The tree core only ever rewrites
/// `parent_id`, `sort_order`, `expanded` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for the node
    pub id: Uuid,
    /// Human-readable name
    pub name: String,
    /// Parent group ID (None for root-level nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    /// Whether this node is a group that can hold children
    #[serde(default)]
    pub is_group: bool,
    /// Sort order for manual ordering (lower values appear first)
    #[serde(default)]
    pub sort_order: i32,
    /// Whether the group is expanded in the UI
    #[serde(default)]
    pub expanded: bool,
    /// Protocol of a connection (None for groups)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ProtocolType>,
    /// Remote host of a connection (None for groups)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Timestamp when the node was created
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last parent or order change
    pub updated_at: DateTime<Utc>,
    /// Timestamp when the connection was last used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_connected: Option<DateTime<Utc>>,
}

impl Node {
    /// Creates a new root-level connection
    #[must_use]
    pub fn connection(
        name: impl Into<String>,
        protocol: ProtocolType,
        host: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id: None,
            is_group: false,
            sort_order: 0,
            expanded: false,
            protocol: Some(protocol),
            host: Some(host.into()),
            created_at: now,
            updated_at: now,
            last_connected: None,
        }
    }

    /// Creates a new root-level group
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id: None,
            is_group: true,
            sort_order: 0,
            expanded: true,
            protocol: None,
            host: None,
            created_at: now,
            updated_at: now,
            last_connected: None,
        }
    }

    /// Replaces the generated ID
    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Places the node under a parent group
    #[must_use]
    pub const fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the manual sort order
    #[must_use]
    pub const fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Sets the expanded flag
    #[must_use]
    pub const fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Returns true if this is a root-level node
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Updates the `updated_at` timestamp to now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
