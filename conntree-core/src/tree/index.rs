//! Borrowed lookup index over a node snapshot.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::Node;

/// Read-only index over a slice of nodes
///
/// Built once per query so that parent walks and child scans do not rescan
/// the whole snapshot at every step. Children are kept in snapshot order.
#[derive(Debug)]
pub struct NodeIndex<'a> {
    by_id: HashMap<Uuid, &'a Node>,
    children: HashMap<Option<Uuid>, Vec<&'a Node>>,
}

impl<'a> NodeIndex<'a> {
    /// Indexes the given snapshot
    #[must_use]
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<Option<Uuid>, Vec<&'a Node>> = HashMap::new();

        for node in nodes {
            by_id.insert(node.id, node);
            children.entry(node.parent_id).or_default().push(node);
        }

        Self { by_id, children }
    }

    /// Gets a node by ID
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&'a Node> {
        self.by_id.get(&id).copied()
    }

    /// Returns true if the snapshot contains the ID
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Direct children of `parent_id` (root-level nodes for `None`)
    #[must_use]
    pub fn children_of(&self, parent_id: Option<Uuid>) -> &[&'a Node] {
        self.children.get(&parent_id).map_or(&[], Vec::as_slice)
    }

    /// Number of indexed nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
