//! Drag session state machine and move commit logic.
//!
//! The engine only tracks which node is being dragged and where it hovers.
//! Commits take the current snapshot and return a new one; the caller swaps
//! it in with a single state update. Rejected moves return the reason and
//! leave the snapshot alone.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{TreeError, TreeResult};
use crate::models::{Node, SortPolicy};

use super::builder::compare_nodes;
use super::drop_position::{resolve_position, DropPosition, RowRect};
use super::guard::{check_move_in, is_descendant_in, MAX_NESTING_DEPTH};
use super::index::NodeIndex;

/// State of the current drag session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,
    /// A node is being dragged but no valid target is hovered
    Dragging {
        /// Dragged node
        dragged: Uuid,
    },
    /// A node is being dragged over a target row
    Hovering {
        /// Dragged node
        dragged: Uuid,
        /// Hovered node
        target: Uuid,
        /// Where the dragged node would land
        position: DropPosition,
    },
}

impl DragState {
    /// Returns the dragged node, if any
    #[must_use]
    pub const fn dragged(&self) -> Option<Uuid> {
        match self {
            Self::Idle => None,
            Self::Dragging { dragged } | Self::Hovering { dragged, .. } => Some(*dragged),
        }
    }

    /// Returns the hovered target and position, if any
    #[must_use]
    pub const fn hover(&self) -> Option<(Uuid, DropPosition)> {
        match self {
            Self::Hovering {
                target, position, ..
            } => Some((*target, *position)),
            _ => None,
        }
    }
}

/// Description of a committed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    /// The moved node
    pub node_id: Uuid,
    /// Parent before the move
    pub old_parent: Option<Uuid>,
    /// Parent after the move
    pub new_parent: Option<Uuid>,
    /// New `sort_order` of the moved node
    pub new_order: i32,
    /// Drop position (None for root-level panel drops)
    pub position: Option<DropPosition>,
    /// Number of siblings whose `sort_order` changed
    pub renumbered: usize,
    /// Whether the new parent group was expanded as a side effect
    pub expanded_parent: bool,
}

/// A new snapshot produced by a committed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The updated node collection
    pub nodes: Vec<Node>,
    /// What changed
    pub summary: MoveSummary,
}

/// Result of a drop gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The move was applied
    Moved(Commit),
    /// The move was rejected and nothing changed
    Rejected(TreeError),
}

impl DropOutcome {
    /// Returns true if the move was applied
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }

    /// Returns the rejection reason, if any
    #[must_use]
    pub const fn rejection(&self) -> Option<&TreeError> {
        match self {
            Self::Moved(_) => None,
            Self::Rejected(error) => Some(error),
        }
    }

    /// Returns the snapshot to keep: the new one on success, `current` otherwise
    #[must_use]
    pub fn into_nodes(self, current: Vec<Node>) -> Vec<Node> {
        match self {
            Self::Moved(commit) => commit.nodes,
            Self::Rejected(_) => current,
        }
    }
}

type RejectionCallback = Box<dyn Fn(&TreeError)>;

/// Drag-and-drop controller for the connection tree
///
/// Pointer events arrive one at a time from the UI loop. A new drag start
/// replaces whatever a previous session left behind, and both drop handlers
/// return the engine to [`DragState::Idle`] whatever the outcome.
pub struct ReorderEngine {
    state: DragState,
    max_depth: usize,
    rejection_callback: Option<RejectionCallback>,
}

impl fmt::Debug for ReorderEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderEngine")
            .field("state", &self.state)
            .field("max_depth", &self.max_depth)
            .field("has_rejection_callback", &self.rejection_callback.is_some())
            .finish()
    }
}

impl Default for ReorderEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorderEngine {
    /// Creates an idle engine using [`MAX_NESTING_DEPTH`]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_max_depth(MAX_NESTING_DEPTH)
    }

    /// Creates an idle engine with a custom nesting ceiling
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self {
            state: DragState::Idle,
            max_depth,
            rejection_callback: None,
        }
    }

    /// Current drag state
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Nesting ceiling used by the guard
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the callback invoked for every rejected drop (e.g. to show a toast)
    pub fn set_rejection_callback<F>(&mut self, callback: F)
    where
        F: Fn(&TreeError) + 'static,
    {
        self.rejection_callback = Some(Box::new(callback));
    }

    /// Starts dragging `node_id`
    pub fn on_drag_start(&mut self, node_id: Uuid) {
        if self.state != DragState::Idle {
            debug!(previous = ?self.state, "Discarding stale drag state");
        }
        self.state = DragState::Dragging { dragged: node_id };
    }

    /// Updates the hovered target from the pointer position
    ///
    /// Returns the position to highlight, or `None` when there is nothing to
    /// show: no drag in progress, the dragged node hovering over itself, or a
    /// target that is not in the snapshot.
    pub fn on_drag_over(
        &mut self,
        target_id: Uuid,
        pointer_y: f64,
        rect: RowRect,
        nodes: &[Node],
    ) -> Option<DropPosition> {
        let dragged = self.state.dragged()?;

        let target = nodes
            .iter()
            .find(|n| n.id == target_id)
            .filter(|_| target_id != dragged);
        let Some(target) = target else {
            self.state = DragState::Dragging { dragged };
            return None;
        };

        let position = resolve_position(pointer_y, rect, target.is_group);
        self.state = DragState::Hovering {
            dragged,
            target: target_id,
            position,
        };
        Some(position)
    }

    /// Clears the hovered target when the pointer leaves a row
    pub fn on_drag_leave(&mut self) {
        if let DragState::Hovering { dragged, .. } = self.state {
            self.state = DragState::Dragging { dragged };
        }
    }

    /// Ends the drag without a drop
    pub fn on_drag_end(&mut self) {
        if self.state != DragState::Idle {
            debug!(state = ?self.state, "Drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Drops the dragged node on a target row
    ///
    /// The position is recomputed from the final pointer location rather
    /// than taken from the last hover event.
    pub fn on_drop(
        &mut self,
        target_id: Uuid,
        pointer_y: f64,
        rect: RowRect,
        nodes: &[Node],
    ) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let Some(dragged) = state.dragged() else {
            return self.reject(TreeError::NoOp("no drag in progress"));
        };

        let result = nodes
            .iter()
            .find(|n| n.id == target_id)
            .ok_or(TreeError::NodeNotFound(target_id))
            .and_then(|target| {
                let position = resolve_position(pointer_y, rect, target.is_group);
                move_node(nodes, dragged, target_id, position, self.max_depth)
            });
        self.finish(result)
    }

    /// Drops the dragged node on the panel background (root level)
    pub fn on_panel_drop(&mut self, nodes: &[Node]) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let Some(dragged) = state.dragged() else {
            return self.reject(TreeError::NoOp("no drag in progress"));
        };

        let result = move_to_root(nodes, dragged, self.max_depth);
        self.finish(result)
    }

    fn finish(&self, result: TreeResult<Commit>) -> DropOutcome {
        match result {
            Ok(commit) => {
                let summary = &commit.summary;
                debug!(
                    node = %summary.node_id,
                    parent = ?summary.new_parent,
                    order = summary.new_order,
                    renumbered = summary.renumbered,
                    "Node moved"
                );
                DropOutcome::Moved(commit)
            }
            Err(error) => self.reject(error),
        }
    }

    fn reject(&self, error: TreeError) -> DropOutcome {
        warn!(kind = ?error.kind(), "Drop rejected: {error}");
        if let Some(ref callback) = self.rejection_callback {
            callback(&error);
        }
        DropOutcome::Rejected(error)
    }
}

/// Moves `dragged_id` relative to `target_id`
///
/// `Inside` on a group makes the dragged node its first child and shifts
/// the existing children down by one. Any other combination makes the
/// dragged node a sibling of the target, and all siblings are renumbered
/// densely around the insertion point. In the returned snapshot the dragged
/// record sits next to the target record.
///
/// # Errors
///
/// - [`TreeError::NoOp`] if the node is dropped onto itself or would not move
/// - [`TreeError::NodeNotFound`] if either ID is stale
/// - [`TreeError::IntoDescendant`] if a group is dropped into its own subtree
/// - Any rejection from the parent guard
pub fn move_node(
    nodes: &[Node],
    dragged_id: Uuid,
    target_id: Uuid,
    position: DropPosition,
    max_depth: usize,
) -> TreeResult<Commit> {
    if dragged_id == target_id {
        return Err(TreeError::NoOp("dropped onto itself"));
    }

    let index = NodeIndex::new(nodes);
    let dragged = index
        .get(dragged_id)
        .ok_or(TreeError::NodeNotFound(dragged_id))?;
    let target = index
        .get(target_id)
        .ok_or(TreeError::NodeNotFound(target_id))?;

    let inside = position == DropPosition::Inside && target.is_group;
    let new_parent = if inside {
        Some(target.id)
    } else {
        target.parent_id
    };

    if dragged.is_group && is_descendant_in(&index, target.id, dragged.id) {
        return Err(TreeError::IntoDescendant);
    }
    check_move_in(&index, dragged_id, new_parent, max_depth)?;

    let mut orders: HashMap<Uuid, i32> = HashMap::new();
    let new_order = if inside {
        for child in index.children_of(new_parent) {
            if child.id != dragged_id {
                orders.insert(child.id, child.sort_order.saturating_add(1));
            }
        }
        0
    } else {
        let policy = SortPolicy::custom();
        let mut siblings: Vec<&Node> = index
            .children_of(new_parent)
            .iter()
            .copied()
            .filter(|n| n.id != dragged_id)
            .collect();
        siblings.sort_by(|a, b| compare_nodes(a, b, &policy));

        let target_idx = siblings
            .iter()
            .position(|n| n.id == target_id)
            .ok_or(TreeError::NodeNotFound(target_id))?;
        let insert_at = match position {
            DropPosition::Before => target_idx,
            DropPosition::After | DropPosition::Inside => target_idx + 1,
        };

        for (idx, sibling) in siblings.iter().enumerate() {
            let rank = if idx >= insert_at { idx + 1 } else { idx };
            orders.insert(sibling.id, rank as i32);
        }
        insert_at as i32
    };

    let renumbered = orders
        .iter()
        .filter(|(id, order)| index.get(**id).is_some_and(|n| n.sort_order != **order))
        .count();
    let expand_parent = inside && !target.expanded;

    if dragged.parent_id == new_parent
        && dragged.sort_order == new_order
        && renumbered == 0
        && !expand_parent
    {
        return Err(TreeError::NoOp("already in place"));
    }

    let now = Utc::now();
    let mut updated = Vec::with_capacity(nodes.len());
    let mut moved = None;
    for node in nodes {
        let mut node = node.clone();
        if node.id == dragged_id {
            node.parent_id = new_parent;
            node.sort_order = new_order;
            node.updated_at = now;
            moved = Some(node);
            continue;
        }
        if let Some(&order) = orders.get(&node.id) {
            if node.sort_order != order {
                node.sort_order = order;
                node.updated_at = now;
            }
        }
        if expand_parent && node.id == target_id {
            node.expanded = true;
        }
        updated.push(node);
    }
    let moved = moved.ok_or(TreeError::NodeNotFound(dragged_id))?;

    let target_pos = updated
        .iter()
        .position(|n| n.id == target_id)
        .unwrap_or(updated.len());
    let insert_pos = if position == DropPosition::Before && !inside {
        target_pos
    } else {
        (target_pos + 1).min(updated.len())
    };
    updated.insert(insert_pos, moved);

    Ok(Commit {
        nodes: updated,
        summary: MoveSummary {
            node_id: dragged_id,
            old_parent: dragged.parent_id,
            new_parent,
            new_order,
            position: Some(position),
            renumbered,
            expanded_parent: expand_parent,
        },
    })
}

/// Moves `dragged_id` to the end of the root level
///
/// # Errors
///
/// - [`TreeError::NodeNotFound`] if the ID is stale
/// - [`TreeError::DepthExceeded`] if the subtree is too tall even at the root
/// - [`TreeError::NoOp`] if the node is already last at the root level
pub fn move_to_root(nodes: &[Node], dragged_id: Uuid, max_depth: usize) -> TreeResult<Commit> {
    let index = NodeIndex::new(nodes);
    let dragged = index
        .get(dragged_id)
        .ok_or(TreeError::NodeNotFound(dragged_id))?;
    check_move_in(&index, dragged_id, None, max_depth)?;

    let new_order = index
        .children_of(None)
        .iter()
        .filter(|n| n.id != dragged_id)
        .map(|n| n.sort_order)
        .max()
        .map_or(0, |max| max.saturating_add(1));

    if dragged.is_root() && dragged.sort_order >= new_order {
        return Err(TreeError::NoOp("already last at root level"));
    }

    let mut updated: Vec<Node> = nodes
        .iter()
        .filter(|n| n.id != dragged_id)
        .cloned()
        .collect();
    let mut moved = dragged.clone();
    moved.parent_id = None;
    moved.sort_order = new_order;
    moved.touch();
    updated.push(moved);

    Ok(Commit {
        nodes: updated,
        summary: MoveSummary {
            node_id: dragged_id,
            old_parent: dragged.parent_id,
            new_parent: None,
            new_order,
            position: None,
            renumbered: 0,
            expanded_parent: false,
        },
    })
}

/// Sets the expanded flag of a group
///
/// # Errors
///
/// Returns [`TreeError::NodeNotFound`] for unknown IDs and
/// [`TreeError::NotAGroup`] for connections.
pub fn set_expanded(nodes: &[Node], group_id: Uuid, expanded: bool) -> TreeResult<Vec<Node>> {
    let group = nodes
        .iter()
        .find(|n| n.id == group_id)
        .ok_or(TreeError::NodeNotFound(group_id))?;
    if !group.is_group {
        return Err(TreeError::NotAGroup(group_id));
    }

    Ok(nodes
        .iter()
        .map(|n| {
            let mut n = n.clone();
            if n.id == group_id {
                n.expanded = expanded;
            }
            n
        })
        .collect())
}

/// Flips the expanded flag of a group
///
/// # Errors
///
/// Same as [`set_expanded`].
pub fn toggle_expanded(nodes: &[Node], group_id: Uuid) -> TreeResult<Vec<Node>> {
    let expanded = nodes
        .iter()
        .find(|n| n.id == group_id)
        .ok_or(TreeError::NodeNotFound(group_id))?
        .expanded;
    set_expanded(nodes, group_id, !expanded)
}
