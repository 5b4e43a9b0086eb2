//! Data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `config`: User identity loaded from the user-scoped config file
//! - `core`: Shared utilities (pager-backed output writer)
//! - `history`: Commit graph traversal and merge-base discovery
//! - `index`: Index/staging area binary format
//! - `objects`: Object types (blob, tree, commit)
//! - `snapshot`: Tree synthesis from the flat index

pub mod config;
pub mod core;
pub mod history;
pub mod index;
pub mod objects;
pub mod snapshot;
