//! Sort policy for ordering siblings in the connection tree.

use serde::{Deserialize, Serialize};

/// Secondary sort key applied after the group/connection partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Alphabetical by name (case-insensitive)
    Name,
    /// By protocol identifier
    Protocol,
    /// By remote host
    Hostname,
    /// By creation time
    CreatedAt,
    /// By last modification time
    UpdatedAt,
    /// By last use; the base order is most recent first
    RecentlyUsed,
    /// By the manual `sort_order` key
    #[default]
    Custom,
}

impl SortBy {
    /// All sort keys, in menu order
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Protocol,
        Self::Hostname,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::RecentlyUsed,
        Self::Custom,
    ];

    /// Returns the identifier used in settings files
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Protocol => "protocol",
            Self::Hostname => "hostname",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::RecentlyUsed => "recently_used",
            Self::Custom => "custom",
        }
    }
}

/// Direction applied to the secondary sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison result
    #[must_use]
    pub const fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Active sort policy for a tree view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPolicy {
    /// Secondary sort key
    pub sort_by: SortBy,
    /// Direction of the secondary key
    pub direction: SortDirection,
    /// Whether manual ordering is honored in this view
    ///
    /// When false, `SortBy::Custom` falls back to name ordering (for example
    /// while a search filter is active).
    pub reorder_enabled: bool,
}

impl SortPolicy {
    /// Creates a policy with manual ordering enabled
    #[must_use]
    pub const fn new(sort_by: SortBy, direction: SortDirection) -> Self {
        Self {
            sort_by,
            direction,
            reorder_enabled: true,
        }
    }

    /// The ascending custom-order policy used for drag-and-drop renumbering
    #[must_use]
    pub const fn custom() -> Self {
        Self::new(SortBy::Custom, SortDirection::Asc)
    }

    /// Returns a copy with manual ordering switched on or off
    #[must_use]
    pub const fn with_reorder_enabled(mut self, enabled: bool) -> Self {
        self.reorder_enabled = enabled;
        self
    }
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self::custom()
    }
}
