//! Property-based tests for drop position resolution

use conntree_core::tree::{resolve_position, DropPosition, RowRect, GROUP_EDGE_RATIO};
use proptest::prelude::*;

fn rank(position: DropPosition) -> u8 {
    match position {
        DropPosition::Before => 0,
        DropPosition::Inside => 1,
        DropPosition::After => 2,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Connections never accept an Inside drop
    #[test]
    fn connections_never_resolve_inside(
        top in -1000.0f64..1000.0,
        height in 1.0f64..200.0,
        offset in -50.0f64..250.0,
    ) {
        let position = resolve_position(top + offset, RowRect::new(top, height), false);
        prop_assert_ne!(position, DropPosition::Inside);
    }

    /// Moving the pointer down never moves the drop position back up
    #[test]
    fn positions_are_monotonic(
        top in -1000.0f64..1000.0,
        height in 1.0f64..200.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        is_group in any::<bool>(),
    ) {
        let rect = RowRect::new(top, height);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let upper = resolve_position(top + low * height, rect, is_group);
        let lower = resolve_position(top + high * height, rect, is_group);
        prop_assert!(rank(upper) <= rank(lower));
    }

    /// The middle half of a group row always means Inside
    #[test]
    fn group_middle_is_inside(
        top in -1000.0f64..1000.0,
        height in 4.0f64..200.0,
        fraction in 0.26f64..0.74,
    ) {
        let position = resolve_position(top + fraction * height, RowRect::new(top, height), true);
        prop_assert_eq!(position, DropPosition::Inside);
    }

    /// The edge quarters of a group row mean Before and After
    #[test]
    fn group_edges_are_siblings(
        top in -1000.0f64..1000.0,
        height in 4.0f64..200.0,
        fraction in 0.0f64..0.24,
    ) {
        let rect = RowRect::new(top, height);
        prop_assert!(fraction < GROUP_EDGE_RATIO);
        let upper = resolve_position(top + fraction * height, rect, true);
        let lower = resolve_position(top + (1.0 - fraction) * height, rect, true);
        prop_assert_eq!(upper, DropPosition::Before);
        prop_assert_eq!(lower, DropPosition::After);
    }
}
