//! Sibling ordering and visible-tree materialization.
//!
//! Groups always come before connections. Within each partition the active
//! [`SortPolicy`] picks the key, and ties always fall back to the name and
//! finally the ID, so the output is identical for identical input.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Node, SortBy, SortPolicy};

use super::index::NodeIndex;

/// A row of the flattened, visible tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    /// Node ID
    pub id: Uuid,
    /// Nesting depth (0 for root-level rows)
    pub depth: usize,
    /// Whether the row is a group
    pub is_group: bool,
    /// Whether the group row is expanded
    pub expanded: bool,
}

/// Returns the direct children of `parent_id` in display order
///
/// `None` selects root-level nodes. The result borrows from `nodes` and the
/// snapshot is never modified.
#[must_use]
pub fn build_children<'a>(
    nodes: &'a [Node],
    parent_id: Option<Uuid>,
    policy: &SortPolicy,
) -> Vec<&'a Node> {
    let mut children: Vec<&Node> = nodes.iter().filter(|n| n.parent_id == parent_id).collect();
    children.sort_by(|a, b| compare_nodes(a, b, policy));
    children
}

/// Flattens the tree into display rows, descending only into expanded groups
#[must_use]
pub fn build_visible_rows(nodes: &[Node], policy: &SortPolicy) -> Vec<VisibleRow> {
    let index = NodeIndex::new(nodes);
    let mut rows = Vec::with_capacity(nodes.len());
    let mut visited = HashSet::new();
    push_rows(&index, None, 0, policy, &mut visited, &mut rows);
    rows
}

fn push_rows(
    index: &NodeIndex<'_>,
    parent_id: Option<Uuid>,
    depth: usize,
    policy: &SortPolicy,
    visited: &mut HashSet<Uuid>,
    rows: &mut Vec<VisibleRow>,
) {
    let mut children = index.children_of(parent_id).to_vec();
    children.sort_by(|a, b| compare_nodes(a, b, policy));

    for child in children {
        if !visited.insert(child.id) {
            continue;
        }
        rows.push(VisibleRow {
            id: child.id,
            depth,
            is_group: child.is_group,
            expanded: child.expanded,
        });
        if child.is_group && child.expanded {
            push_rows(index, Some(child.id), depth + 1, policy, visited, rows);
        }
    }
}

/// Gets the full path of a group (e.g., "Production/Web Servers")
#[must_use]
pub fn group_path(group_id: Uuid, nodes: &[Node]) -> Option<String> {
    group_path_in(&NodeIndex::new(nodes), group_id)
}

pub(crate) fn group_path_in(index: &NodeIndex<'_>, group_id: Uuid) -> Option<String> {
    let mut path_parts = Vec::new();
    let mut visited = HashSet::new();
    let mut current_id = Some(group_id);

    // Walk up the hierarchy
    while let Some(id) = current_id {
        if !visited.insert(id) {
            break;
        }
        let Some(node) = index.get(id) else {
            break;
        };
        path_parts.push(node.name.as_str());
        current_id = node.parent_id;
    }

    if path_parts.is_empty() {
        None
    } else {
        path_parts.reverse();
        Some(path_parts.join("/"))
    }
}

/// Freezes the current display order of one parent's children into `sort_order`
///
/// Children receive dense values `0..n` in the order `policy` produces; only
/// nodes whose value changes are touched. Used by the "sort group" action so
/// that a derived ordering can be kept and then refined by hand.
#[must_use]
pub fn apply_sort_as_custom_order(
    nodes: &[Node],
    parent_id: Option<Uuid>,
    policy: &SortPolicy,
) -> Vec<Node> {
    let ranks: Vec<(Uuid, i32)> = build_children(nodes, parent_id, policy)
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id, idx as i32))
        .collect();

    let now = Utc::now();
    let mut updated = nodes.to_vec();
    for node in &mut updated {
        if let Some((_, rank)) = ranks.iter().find(|(id, _)| *id == node.id) {
            if node.sort_order != *rank {
                node.sort_order = *rank;
                node.updated_at = now;
            }
        }
    }
    updated
}

/// Total order used for siblings under `policy`
#[must_use]
pub fn compare_nodes(a: &Node, b: &Node, policy: &SortPolicy) -> Ordering {
    // Groups first, regardless of policy
    b.is_group
        .cmp(&a.is_group)
        .then_with(|| compare_key(a, b, policy))
        .then_with(|| compare_names(a, b))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_key(a: &Node, b: &Node, policy: &SortPolicy) -> Ordering {
    let direction = policy.direction;
    match policy.sort_by {
        SortBy::Name => direction.apply(compare_names(a, b)),
        SortBy::Protocol => {
            let protocol = |n: &Node| n.protocol.map_or("", |p| p.as_str());
            direction.apply(protocol(a).cmp(protocol(b)))
        }
        SortBy::Hostname => {
            let host = |n: &Node| n.host.as_deref().unwrap_or_default().to_lowercase();
            direction.apply(host(a).cmp(&host(b)))
        }
        SortBy::CreatedAt => direction.apply(a.created_at.cmp(&b.created_at)),
        SortBy::UpdatedAt => direction.apply(a.updated_at.cmp(&b.updated_at)),
        // Base order is most recent first, so Asc lists the freshest entries
        // on top and Desc the stalest.
        SortBy::RecentlyUsed => direction.apply(last_used(b).cmp(&last_used(a))),
        // Name breaks sort_order ties inside the direction, and stands in for
        // the manual order when reordering is off.
        SortBy::Custom if policy.reorder_enabled => {
            let by_order = a.sort_order.cmp(&b.sort_order);
            direction.apply(by_order.then_with(|| compare_names(a, b)))
        }
        SortBy::Custom => direction.apply(compare_names(a, b)),
    }
}

fn last_used(node: &Node) -> DateTime<Utc> {
    node.last_connected.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn compare_names(a: &Node, b: &Node) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
