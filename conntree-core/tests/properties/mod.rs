//! Property-based tests for ConnTree core library

mod builder_tests;
mod config_tests;
mod drop_position_tests;
mod guard_tests;
mod reorder_tests;
