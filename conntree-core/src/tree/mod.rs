//! Connection tree core
//!
//! This module holds the hierarchy logic of the connection panel: the parent
//! guard that keeps the forest acyclic and shallow, the builder that orders
//! siblings, the drop position resolver and the drag-and-drop reorder engine.
//!
//! Everything here operates on a `&[Node]` snapshot. Mutating operations
//! return a new `Vec<Node>` and never touch their input.

mod builder;
mod drop_position;
mod guard;
mod index;
mod reorder;

pub use builder::{
    apply_sort_as_custom_order, build_children, build_visible_rows, compare_nodes, group_path,
    VisibleRow,
};
pub use drop_position::{
    resolve_position, DropPosition, RowRect, CONNECTION_SPLIT_RATIO, GROUP_EDGE_RATIO,
};
pub use guard::{
    can_move_to_parent, can_move_to_parent_with_limit, check_move_to_parent, depth_of,
    descendant_ids, is_descendant, max_descendant_depth, parent_choices, validate_forest,
    ParentChoice, MAX_NESTING_DEPTH,
};
pub use index::NodeIndex;
pub use reorder::{
    move_node, move_to_root, set_expanded, toggle_expanded, Commit, DragState, DropOutcome,
    MoveSummary, ReorderEngine,
};
