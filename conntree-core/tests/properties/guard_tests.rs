//! Property-based tests for the nesting guard

use conntree_core::tree::{
    check_move_to_parent, depth_of, descendant_ids, is_descendant, parent_choices, validate_forest,
    MAX_NESTING_DEPTH,
};
use conntree_core::Node;
use proptest::prelude::*;
use proptest::sample::Index;
use uuid::Uuid;

use super::forest::arb_forest;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Generated forests are valid to begin with
    #[test]
    fn generated_forests_are_valid(nodes in arb_forest(40)) {
        prop_assert_eq!(validate_forest(&nodes, MAX_NESTING_DEPTH), Ok(()));
        for node in &nodes {
            prop_assert!(depth_of(node.id, &nodes) < MAX_NESTING_DEPTH);
        }
    }

    /// Any reparenting the guard accepts keeps the forest valid
    #[test]
    fn accepted_reparent_keeps_forest_valid(
        nodes in arb_forest(40),
        dragged in any::<Index>(),
        candidate in any::<Index>(),
        to_root in any::<bool>(),
    ) {
        let dragged_id = nodes[dragged.index(nodes.len())].id;
        let candidate_id = if to_root {
            None
        } else {
            Some(nodes[candidate.index(nodes.len())].id)
        };

        if check_move_to_parent(dragged_id, candidate_id, &nodes, MAX_NESTING_DEPTH).is_ok() {
            let moved: Vec<Node> = nodes
                .iter()
                .cloned()
                .map(|mut n| {
                    if n.id == dragged_id {
                        n.parent_id = candidate_id;
                    }
                    n
                })
                .collect();
            prop_assert_eq!(validate_forest(&moved, MAX_NESTING_DEPTH), Ok(()));
        }
    }

    /// A node can never be placed under itself or one of its descendants
    #[test]
    fn self_and_descendants_are_rejected(nodes in arb_forest(40), dragged in any::<Index>()) {
        let dragged_id = nodes[dragged.index(nodes.len())].id;

        let rejects = |candidate: Uuid| {
            check_move_to_parent(dragged_id, Some(candidate), &nodes, MAX_NESTING_DEPTH).is_err()
        };

        prop_assert!(rejects(dragged_id));
        for descendant in descendant_ids(dragged_id, &nodes) {
            prop_assert!(is_descendant(descendant, dragged_id, &nodes));
            prop_assert!(rejects(descendant));
        }
    }

    /// Depth equals the length of the parent chain
    #[test]
    fn depth_matches_parent_chain(nodes in arb_forest(40)) {
        for node in &nodes {
            let mut chain = 0;
            let mut current = node.parent_id;
            while let Some(id) = current {
                chain += 1;
                current = nodes.iter().find(|n| n.id == id).and_then(|n| n.parent_id);
            }
            prop_assert_eq!(depth_of(node.id, &nodes), chain);
        }
    }

    /// The picker never offers a group the guard would reject
    #[test]
    fn parent_choices_agree_with_guard(nodes in arb_forest(30), editing in any::<Index>()) {
        let editing_id = nodes[editing.index(nodes.len())].id;
        let choices = parent_choices(editing_id, &nodes, MAX_NESTING_DEPTH);

        prop_assert_eq!(choices.len(), nodes.iter().filter(|n| n.is_group).count());
        for choice in &choices {
            let verdict =
                check_move_to_parent(editing_id, Some(choice.id), &nodes, MAX_NESTING_DEPTH);
            prop_assert_eq!(choice.is_enabled(), verdict.is_ok());
        }
    }
}
