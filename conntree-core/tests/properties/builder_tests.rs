//! Property-based tests for sibling ordering and tree flattening

use std::collections::HashSet;

use conntree_core::tree::{apply_sort_as_custom_order, build_children, build_visible_rows};
use conntree_core::{Node, SortBy, SortDirection, SortPolicy};
use proptest::prelude::*;
use proptest::sample::Index;
use uuid::Uuid;

use super::forest::arb_forest;

// ========== Generators ==========

fn arb_policy() -> impl Strategy<Value = SortPolicy> {
    (
        prop::sample::select(SortBy::ALL.to_vec()),
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
        any::<bool>(),
    )
        .prop_map(|(sort_by, direction, reorder)| {
            SortPolicy::new(sort_by, direction).with_reorder_enabled(reorder)
        })
}

fn parents_of(nodes: &[Node]) -> Vec<Option<Uuid>> {
    std::iter::once(None)
        .chain(nodes.iter().filter(|n| n.is_group).map(|n| Some(n.id)))
        .collect()
}

fn ids(children: &[&Node]) -> Vec<Uuid> {
    children.iter().map(|n| n.id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Ordering depends only on the node data, not on snapshot order
    #[test]
    fn children_order_is_deterministic(nodes in arb_forest(40), policy in arb_policy()) {
        let mut reversed = nodes.clone();
        reversed.reverse();

        for parent in parents_of(&nodes) {
            let first = ids(&build_children(&nodes, parent, &policy));
            let again = ids(&build_children(&nodes, parent, &policy));
            let from_reversed = ids(&build_children(&reversed, parent, &policy));
            prop_assert_eq!(&first, &again);
            prop_assert_eq!(&first, &from_reversed);
        }
    }

    /// Groups always come before connections
    #[test]
    fn groups_come_first(nodes in arb_forest(40), policy in arb_policy()) {
        for parent in parents_of(&nodes) {
            let children = build_children(&nodes, parent, &policy);
            let first_leaf = children.iter().position(|n| !n.is_group).unwrap_or(children.len());
            prop_assert!(children[first_leaf..].iter().all(|n| !n.is_group));
        }
    }

    /// With every group expanded, each node appears exactly once at its depth
    #[test]
    fn expanded_rows_cover_every_node(nodes in arb_forest(40), policy in arb_policy()) {
        let expanded: Vec<Node> = nodes
            .iter()
            .cloned()
            .map(|n| {
                let is_group = n.is_group;
                n.with_expanded(is_group)
            })
            .collect();
        let rows = build_visible_rows(&expanded, &policy);

        prop_assert_eq!(rows.len(), nodes.len());
        let unique: HashSet<Uuid> = rows.iter().map(|r| r.id).collect();
        prop_assert_eq!(unique.len(), nodes.len());
        for row in &rows {
            prop_assert_eq!(row.depth, conntree_core::tree::depth_of(row.id, &nodes));
        }
    }

    /// Rows of collapsed groups hide their contents
    #[test]
    fn collapsed_groups_hide_children(nodes in arb_forest(40), policy in arb_policy()) {
        let rows = build_visible_rows(&nodes, &policy);
        let visible: HashSet<Uuid> = rows.iter().map(|r| r.id).collect();

        for node in &nodes {
            if let Some(parent_id) = node.parent_id {
                let parent = nodes.iter().find(|n| n.id == parent_id).unwrap();
                let parent_shows_children = parent.expanded && visible.contains(&parent_id);
                prop_assert_eq!(visible.contains(&node.id), parent_shows_children);
            } else {
                prop_assert!(visible.contains(&node.id));
            }
        }
    }

    /// Freezing a sort into custom order reproduces the same sibling order
    #[test]
    fn applied_sort_matches_custom_order(
        nodes in arb_forest(40),
        policy in arb_policy(),
        pick in any::<Index>(),
    ) {
        let parents = parents_of(&nodes);
        let parent = parents[pick.index(parents.len())];

        let expected = ids(&build_children(&nodes, parent, &policy));
        let frozen = apply_sort_as_custom_order(&nodes, parent, &policy);
        let actual = ids(&build_children(&frozen, parent, &SortPolicy::custom()));

        prop_assert_eq!(actual, expected);
        let orders: Vec<i32> = build_children(&frozen, parent, &SortPolicy::custom())
            .iter()
            .map(|n| n.sort_order)
            .collect();
        let count = frozen.iter().filter(|n| n.parent_id == parent).count() as i32;
        prop_assert_eq!(orders, (0..count).collect::<Vec<_>>());
    }
}
