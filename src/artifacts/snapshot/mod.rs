//! Tree synthesis
//!
//! - `tree_graph`: reconstructs a hierarchical directory snapshot from the
//!   flat index and emits the tree objects bottom-up

pub mod tree_graph;
