//! Commit history traversal
//!
//! - `commit_graph`: breadth-first loading of the commit DAG and merge-base
//!   discovery by intersecting reachable sets

pub mod commit_graph;
