//! Property-based tests for drag-and-drop reordering

use std::collections::HashSet;

use conntree_core::tree::{
    build_children, descendant_ids, move_node, move_to_root, validate_forest, DropPosition, RowRect,
    MAX_NESTING_DEPTH,
};
use conntree_core::{DragState, Node, ReorderEngine, SortPolicy, TreeError, TreeErrorKind};
use proptest::prelude::*;
use proptest::sample::Index;
use uuid::Uuid;

use super::forest::{arb_forest, arb_moves, sibling_orders};

fn id_set(nodes: &[Node]) -> HashSet<Uuid> {
    nodes.iter().map(|n| n.id).collect()
}

fn find(nodes: &[Node], id: Uuid) -> &Node {
    nodes.iter().find(|n| n.id == id).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any sequence of drops keeps the forest valid and loses no node
    #[test]
    fn move_sequences_keep_forest_valid(nodes in arb_forest(30), moves in arb_moves(25)) {
        let original_ids = id_set(&nodes);
        let mut nodes = nodes;

        for (dragged, target, position) in moves {
            let dragged_id = nodes[dragged.index(nodes.len())].id;
            let target_id = nodes[target.index(nodes.len())].id;

            match move_node(&nodes, dragged_id, target_id, position, MAX_NESTING_DEPTH) {
                Ok(commit) => {
                    prop_assert_eq!(commit.nodes.len(), nodes.len());
                    nodes = commit.nodes;
                }
                Err(e) => prop_assert!(matches!(
                    e.kind(),
                    TreeErrorKind::NoOp
                        | TreeErrorKind::CycleViolation
                        | TreeErrorKind::DepthExceeded
                )),
            }

            prop_assert_eq!(validate_forest(&nodes, MAX_NESTING_DEPTH), Ok(()));
            prop_assert_eq!(id_set(&nodes), original_ids.clone());
        }
    }

    /// Dropping a node onto itself never changes anything
    #[test]
    fn self_drop_is_noop(
        nodes in arb_forest(30),
        pick in any::<Index>(),
        position in super::forest::arb_position(),
    ) {
        let node_id = nodes[pick.index(nodes.len())].id;
        let result = move_node(&nodes, node_id, node_id, position, MAX_NESTING_DEPTH);
        prop_assert_eq!(result.map(|_| ()).map_err(|e| e.kind()), Err(TreeErrorKind::NoOp));
    }

    /// A group can never be dropped anywhere inside its own subtree
    #[test]
    fn group_into_descendant_is_rejected(
        nodes in arb_forest(30),
        pick in any::<Index>(),
        position in super::forest::arb_position(),
    ) {
        let groups: Vec<&Node> = nodes.iter().filter(|n| n.is_group).collect();
        prop_assume!(!groups.is_empty());
        let group_id = groups[pick.index(groups.len())].id;

        for target in descendant_ids(group_id, &nodes) {
            let result = move_node(&nodes, group_id, target, position, MAX_NESTING_DEPTH);
            prop_assert_eq!(result.map(|_| ()), Err(TreeError::IntoDescendant));
        }
    }

    /// Sibling drops land next to the target and leave dense orders behind
    #[test]
    fn sibling_drop_lands_next_to_target(
        nodes in arb_forest(30),
        dragged in any::<Index>(),
        target in any::<Index>(),
        before in any::<bool>(),
    ) {
        let dragged_id = nodes[dragged.index(nodes.len())].id;
        let target_id = nodes[target.index(nodes.len())].id;
        let position = if before {
            DropPosition::Before
        } else {
            DropPosition::After
        };

        if let Ok(commit) = move_node(&nodes, dragged_id, target_id, position, MAX_NESTING_DEPTH) {
            let parent = find(&nodes, target_id).parent_id;
            let moved = find(&commit.nodes, dragged_id);
            let target_node = find(&commit.nodes, target_id);
            prop_assert_eq!(moved.parent_id, parent);

            let expected_order = if before {
                target_node.sort_order - 1
            } else {
                target_node.sort_order + 1
            };
            prop_assert_eq!(moved.sort_order, expected_order);

            let count = commit.nodes.iter().filter(|n| n.parent_id == parent).count() as i32;
            prop_assert_eq!(sibling_orders(&commit.nodes, parent), (0..count).collect::<Vec<_>>());
        }
    }

    /// Inside drops make the dragged node the first child of the group
    #[test]
    fn inside_drop_takes_first_slot(
        nodes in arb_forest(30),
        dragged in any::<Index>(),
        target in any::<Index>(),
    ) {
        let dragged_id = nodes[dragged.index(nodes.len())].id;
        let target_id = nodes[target.index(nodes.len())].id;
        prop_assume!(find(&nodes, target_id).is_group);

        let inside = DropPosition::Inside;
        if let Ok(commit) = move_node(&nodes, dragged_id, target_id, inside, MAX_NESTING_DEPTH) {
            let moved = find(&commit.nodes, dragged_id);
            prop_assert_eq!(moved.parent_id, Some(target_id));
            prop_assert_eq!(moved.sort_order, 0);
            prop_assert!(find(&commit.nodes, target_id).expanded);

            let children = build_children(&commit.nodes, Some(target_id), &SortPolicy::custom());
            prop_assert!(children
                .iter()
                .filter(|n| n.is_group == moved.is_group && n.id != dragged_id)
                .all(|n| n.sort_order > 0));
        }
    }

    /// Panel drops append to the root level
    #[test]
    fn panel_drop_appends_to_root(nodes in arb_forest(30), pick in any::<Index>()) {
        let node_id = nodes[pick.index(nodes.len())].id;

        if let Ok(commit) = move_to_root(&nodes, node_id, MAX_NESTING_DEPTH) {
            let moved = find(&commit.nodes, node_id);
            prop_assert_eq!(moved.parent_id, None);
            prop_assert!(commit
                .nodes
                .iter()
                .filter(|n| n.parent_id.is_none() && n.id != node_id)
                .all(|n| n.sort_order < moved.sort_order));
            prop_assert_eq!(commit.nodes.last().map(|n| n.id), Some(node_id));
        }
    }

    /// The engine is idle after every drop, whatever the outcome
    #[test]
    fn engine_returns_to_idle(
        nodes in arb_forest(30),
        dragged in any::<Index>(),
        target in any::<Index>(),
        pointer in 0.0f64..40.0,
        panel in any::<bool>(),
    ) {
        let dragged_id = nodes[dragged.index(nodes.len())].id;
        let target_id = nodes[target.index(nodes.len())].id;
        let rect = RowRect::new(0.0, 40.0);

        let mut engine = ReorderEngine::new();
        engine.on_drag_start(dragged_id);
        let hover = engine.on_drag_over(target_id, pointer, rect, &nodes);
        prop_assert_eq!(hover.is_none(), dragged_id == target_id);

        let outcome = if panel {
            engine.on_panel_drop(&nodes)
        } else {
            engine.on_drop(target_id, pointer, rect, &nodes)
        };
        prop_assert_eq!(engine.state(), DragState::Idle);

        let kept = outcome.into_nodes(nodes.clone());
        prop_assert_eq!(validate_forest(&kept, MAX_NESTING_DEPTH), Ok(()));
    }
}
