//! Property-based tests for tree and settings persistence through ConfigManager

use conntree_core::config::{AppSettings, ConfigManager, LoggingSettings, TreeSettings};
use conntree_core::tree::{move_node, MAX_NESTING_DEPTH};
use conntree_core::{SortBy, SortDirection};
use proptest::prelude::*;
use proptest::sample::Index;
use tempfile::TempDir;

use super::forest::{arb_forest, arb_position};

// ========== Generators ==========

fn arb_tree_settings() -> impl Strategy<Value = TreeSettings> {
    (
        prop::sample::select(SortBy::ALL.to_vec()),
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
        any::<bool>(),
        1usize..10,
    )
        .prop_map(|(sort_by, sort_direction, reorder_enabled, max_nesting_depth)| TreeSettings {
            sort_by,
            sort_direction,
            reorder_enabled,
            max_nesting_depth,
        })
}

fn arb_settings() -> impl Strategy<Value = AppSettings> {
    (
        arb_tree_settings(),
        prop_oneof![Just("warn"), Just("info"), Just("debug"), Just("conntree_core=trace")],
    )
        .prop_map(|(tree, level)| AppSettings {
            tree,
            logging: LoggingSettings {
                level: level.to_string(),
            },
        })
}

fn create_test_manager() -> (ConfigManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_config_dir(temp_dir.path().to_path_buf());
    (manager, temp_dir)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Saved trees load back unchanged, record order included
    #[test]
    fn tree_round_trip(nodes in arb_forest(30)) {
        let (manager, _temp) = create_test_manager();
        manager.save_nodes(&nodes).expect("Should save tree");
        let loaded = manager.load_nodes().expect("Should load tree");
        prop_assert_eq!(loaded, nodes);
    }

    /// Committed moves survive a save/load cycle
    #[test]
    fn moved_tree_round_trip(
        nodes in arb_forest(30),
        dragged in any::<Index>(),
        target in any::<Index>(),
        position in arb_position(),
    ) {
        let (manager, _temp) = create_test_manager();
        let dragged_id = nodes[dragged.index(nodes.len())].id;
        let target_id = nodes[target.index(nodes.len())].id;

        let current = move_node(&nodes, dragged_id, target_id, position, MAX_NESTING_DEPTH)
            .map_or(nodes, |commit| commit.nodes);
        manager.save_nodes(&current).expect("Should save tree");
        prop_assert_eq!(manager.load_nodes().expect("Should load tree"), current);
    }

    /// Settings load back unchanged
    #[test]
    fn settings_round_trip(settings in arb_settings()) {
        let (manager, _temp) = create_test_manager();
        manager.save_settings(&settings).expect("Should save settings");
        prop_assert_eq!(manager.load_settings().expect("Should load settings"), settings);
    }
}
