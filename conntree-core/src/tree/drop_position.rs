//! Drop position resolution from pointer geometry.

use serde::{Deserialize, Serialize};

/// Fraction of a group row's height that acts as the before/after edge zone
pub const GROUP_EDGE_RATIO: f64 = 0.25;

/// Fraction of a connection row's height that separates before from after
pub const CONNECTION_SPLIT_RATIO: f64 = 0.5;

/// Drop position relative to a target item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    /// Drop before the target item
    Before,
    /// Drop after the target item
    After,
    /// Drop into the target item (groups only)
    Inside,
}

impl DropPosition {
    /// CSS class a row should carry while it is the hovered drop target
    ///
    /// Presentation hook for UI frontends: pair it with
    /// [`DragState::hover`](super::DragState::hover) to highlight the
    /// hovered row. The core and the CLI never style rows themselves.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Before => "drop-target-before",
            Self::After => "drop-target-after",
            Self::Inside => "drop-target-into",
        }
    }
}

impl std::fmt::Display for DropPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
            Self::Inside => write!(f, "inside"),
        }
    }
}

/// Vertical extent of a target row, in the pointer's coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowRect {
    /// Top edge of the row
    pub top: f64,
    /// Height of the row
    pub height: f64,
}

impl RowRect {
    /// Creates a row rectangle
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Maps a pointer position over a row to a drop position
///
/// Groups split into a top quarter (before), a bottom quarter (after) and a
/// middle half (inside). Connections split at the midpoint and never accept
/// `Inside`. Degenerate rects go through the same comparisons, so a zero or
/// NaN height yields `Inside` for groups and `After` for connections.
#[must_use]
pub fn resolve_position(pointer_y: f64, rect: RowRect, target_is_group: bool) -> DropPosition {
    let y = pointer_y - rect.top;

    if target_is_group {
        if y < rect.height * GROUP_EDGE_RATIO {
            DropPosition::Before
        } else if y > rect.height * (1.0 - GROUP_EDGE_RATIO) {
            DropPosition::After
        } else {
            DropPosition::Inside
        }
    } else if y < rect.height * CONNECTION_SPLIT_RATIO {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}
