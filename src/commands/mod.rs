//! Command implementations
//!
//! Each porcelain command is implemented as an `impl Repository` block in its
//! own file, composing the areas (database, index, refs, workspace) into a
//! user-facing workflow.

pub mod porcelain;
