//! Depth and cycle guard for reparenting.
//!
//! Every committed move, whether it comes from a drag gesture, a root-level
//! drop or the parent picker in the connection editor, is checked here first.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{TreeError, TreeResult};
use crate::models::Node;

use super::builder::group_path_in;
use super::index::NodeIndex;

/// Default maximum number of nesting levels in the tree
///
/// A node's depth plus the height of its subtree must stay below this value,
/// so with the default of 5 the deepest node sits at depth 4.
pub const MAX_NESTING_DEPTH: usize = 5;

/// Counts parent hops from a node to the root
///
/// Returns 0 for root nodes and for unknown IDs. If the parent chain loops,
/// the walk stops and 0 is returned; this keeps callers from spinning on a
/// corrupt snapshot but says nothing about the node being valid.
#[must_use]
pub fn depth_of(node_id: Uuid, nodes: &[Node]) -> usize {
    depth_in(&NodeIndex::new(nodes), node_id)
}

/// Height of the subtree below a node (0 when it has no children)
#[must_use]
pub fn max_descendant_depth(node_id: Uuid, nodes: &[Node]) -> usize {
    max_descendant_depth_in(&NodeIndex::new(nodes), node_id)
}

/// Returns true if `candidate_id` lies somewhere below `ancestor_id`
#[must_use]
pub fn is_descendant(candidate_id: Uuid, ancestor_id: Uuid, nodes: &[Node]) -> bool {
    is_descendant_in(&NodeIndex::new(nodes), candidate_id, ancestor_id)
}

/// Collects the IDs of every node below `node_id`
#[must_use]
pub fn descendant_ids(node_id: Uuid, nodes: &[Node]) -> Vec<Uuid> {
    let index = NodeIndex::new(nodes);
    let mut result = Vec::new();
    let mut visited = HashSet::from([node_id]);
    let mut to_process = vec![node_id];

    while let Some(current_id) = to_process.pop() {
        for child in index.children_of(Some(current_id)) {
            if visited.insert(child.id) {
                result.push(child.id);
                to_process.push(child.id);
            }
        }
    }

    result
}

/// Returns true if `dragged_id` may be placed under `candidate_parent`
///
/// `None` stands for the root level. Uses [`MAX_NESTING_DEPTH`] as the
/// ceiling; see [`check_move_to_parent`] for the reason-bearing variant.
#[must_use]
pub fn can_move_to_parent(
    dragged_id: Uuid,
    candidate_parent: Option<Uuid>,
    nodes: &[Node],
) -> bool {
    can_move_to_parent_with_limit(dragged_id, candidate_parent, nodes, MAX_NESTING_DEPTH)
}

/// [`can_move_to_parent`] with a configured nesting ceiling
#[must_use]
pub fn can_move_to_parent_with_limit(
    dragged_id: Uuid,
    candidate_parent: Option<Uuid>,
    nodes: &[Node],
    max_depth: usize,
) -> bool {
    check_move_to_parent(dragged_id, candidate_parent, nodes, max_depth).is_ok()
}

/// Checks whether `dragged_id` may be placed under `candidate_parent`
///
/// # Errors
///
/// - [`TreeError::NodeNotFound`] if either node is missing
/// - [`TreeError::SelfParent`] if the candidate is the dragged node
/// - [`TreeError::NotAGroup`] if the candidate is a connection
/// - [`TreeError::IntoDescendant`] if the candidate is below the dragged node
/// - [`TreeError::DepthExceeded`] if the moved subtree would reach `max_depth`
pub fn check_move_to_parent(
    dragged_id: Uuid,
    candidate_parent: Option<Uuid>,
    nodes: &[Node],
    max_depth: usize,
) -> TreeResult<()> {
    let index = NodeIndex::new(nodes);
    check_move_in(&index, dragged_id, candidate_parent, max_depth)
}

/// An entry offered by the parent-group picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentChoice {
    /// Group ID
    pub id: Uuid,
    /// Full path of the group (e.g., "Production/Web Servers")
    pub path: String,
    /// Depth of the group
    pub depth: usize,
    /// Why the group cannot be chosen, if it cannot
    pub disabled: Option<TreeError>,
}

impl ParentChoice {
    /// Returns true if the group can be selected
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.disabled.is_none()
    }
}

/// Lists every group as a parent candidate for the node being edited
///
/// Choices are sorted by path. Groups that would break the tree carry the
/// rejection so the picker can show it next to the entry. When `editing_id`
/// is not in the snapshot yet (a connection being created), it is treated
/// as a fresh leaf and only the depth ceiling applies.
#[must_use]
pub fn parent_choices(editing_id: Uuid, nodes: &[Node], max_depth: usize) -> Vec<ParentChoice> {
    let index = NodeIndex::new(nodes);
    let is_new = !index.contains(editing_id);

    let mut choices: Vec<ParentChoice> = nodes
        .iter()
        .filter(|n| n.is_group)
        .map(|group| {
            let depth = depth_in(&index, group.id);
            let disabled = if is_new {
                let error = TreeError::DepthExceeded { max: max_depth };
                (depth + 1 >= max_depth).then_some(error)
            } else {
                let target = Some(group.id);
                check_move_in(&index, editing_id, target, max_depth).err()
            };
            let path = group_path_in(&index, group.id);
            ParentChoice {
                id: group.id,
                path: path.unwrap_or_else(|| group.name.clone()),
                depth,
                disabled,
            }
        })
        .collect();

    choices.sort_by(|a, b| {
        a.path
            .to_lowercase()
            .cmp(&b.path.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    choices
}

/// Validates that a snapshot is a well-formed forest
///
/// # Errors
///
/// Returns the first violation found: a dangling parent reference, a
/// connection used as a parent, a cycle, or a node nested at or beyond
/// `max_depth`.
pub fn validate_forest(nodes: &[Node], max_depth: usize) -> TreeResult<()> {
    let index = NodeIndex::new(nodes);

    for node in nodes {
        if let Some(parent_id) = node.parent_id {
            let parent = index
                .get(parent_id)
                .ok_or(TreeError::NodeNotFound(parent_id))?;
            if !parent.is_group {
                return Err(TreeError::NotAGroup(parent_id));
            }
        }
    }

    for node in nodes {
        let mut visited = HashSet::new();
        let mut current_id = Some(node.id);
        while let Some(id) = current_id {
            if !visited.insert(id) {
                return Err(TreeError::Cycle(node.id));
            }
            current_id = index.get(id).and_then(|n| n.parent_id);
        }
    }

    for node in nodes {
        if depth_in(&index, node.id) >= max_depth {
            return Err(TreeError::DepthExceeded { max: max_depth });
        }
    }

    Ok(())
}

pub(crate) fn depth_in(index: &NodeIndex<'_>, node_id: Uuid) -> usize {
    let mut depth = 0;
    let mut visited = HashSet::from([node_id]);
    let mut current_id = index.get(node_id).and_then(|n| n.parent_id);

    while let Some(id) = current_id {
        let Some(parent) = index.get(id) else {
            break;
        };
        if !visited.insert(id) {
            return 0;
        }
        depth += 1;
        current_id = parent.parent_id;
    }

    depth
}

pub(crate) fn max_descendant_depth_in(index: &NodeIndex<'_>, node_id: Uuid) -> usize {
    let mut max_depth = 0;
    let mut visited = HashSet::from([node_id]);
    let mut to_process = vec![(node_id, 0usize)];

    while let Some((current_id, depth)) = to_process.pop() {
        max_depth = max_depth.max(depth);
        for child in index.children_of(Some(current_id)) {
            if visited.insert(child.id) {
                to_process.push((child.id, depth + 1));
            }
        }
    }

    max_depth
}

pub(crate) fn is_descendant_in(
    index: &NodeIndex<'_>,
    candidate_id: Uuid,
    ancestor_id: Uuid,
) -> bool {
    let mut visited = HashSet::new();
    let mut current_id = index.get(candidate_id).and_then(|n| n.parent_id);

    while let Some(id) = current_id {
        if id == ancestor_id {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        current_id = index.get(id).and_then(|n| n.parent_id);
    }

    false
}

pub(crate) fn check_move_in(
    index: &NodeIndex<'_>,
    dragged_id: Uuid,
    candidate_parent: Option<Uuid>,
    max_depth: usize,
) -> TreeResult<()> {
    if !index.contains(dragged_id) {
        return Err(TreeError::NodeNotFound(dragged_id));
    }

    let subtree_height = max_descendant_depth_in(index, dragged_id);

    let Some(parent_id) = candidate_parent else {
        // Root placement puts the dragged node at depth 0
        if subtree_height >= max_depth {
            return Err(TreeError::DepthExceeded { max: max_depth });
        }
        return Ok(());
    };

    if parent_id == dragged_id {
        return Err(TreeError::SelfParent);
    }

    let parent = index
        .get(parent_id)
        .ok_or(TreeError::NodeNotFound(parent_id))?;
    if !parent.is_group {
        return Err(TreeError::NotAGroup(parent_id));
    }

    if is_descendant_in(index, parent_id, dragged_id) {
        return Err(TreeError::IntoDescendant);
    }

    if depth_in(index, parent_id) + 1 + subtree_height >= max_depth {
        return Err(TreeError::DepthExceeded { max: max_depth });
    }

    Ok(())
}
