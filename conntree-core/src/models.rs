//! Core data models for `ConnTree`
//!
//! This module defines the tree node record shared by connections and groups,
//! the protocol identifiers a connection may carry, and the sort policy used
//! to order siblings.

mod node;
mod protocol;
mod sort;

pub use node::Node;
pub use protocol::ProtocolType;
pub use sort::{SortBy, SortDirection, SortPolicy};
