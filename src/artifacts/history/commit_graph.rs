//! Commit DAG loading and merge-base discovery
//!
//! The graph is held as an arena: commits in a vector in breadth-first order,
//! with a handle map from object ID to arena index. Lookups are O(1) through
//! the map and traversal needs no auxiliary color state, because the handle
//! map doubles as the visited set. The walk is cycle-safe even though a
//! well-formed repository has no cycles.

use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, VecDeque};

/// Commits reachable from a single tip, in breadth-first order
#[derive(Debug)]
pub struct CommitGraph {
    /// Object IDs in visit order, tip first
    order: Vec<ObjectId>,
    /// Parsed commits, parallel to `order`
    commits: Vec<Commit>,
    /// Object ID to arena index
    handles: HashMap<ObjectId, usize>,
}

impl CommitGraph {
    /// Load every commit reachable from `tip`, memoizing by object ID
    pub fn load(database: &Database, tip: ObjectId) -> Result<Self> {
        let mut graph = CommitGraph {
            order: Vec::new(),
            commits: Vec::new(),
            handles: HashMap::new(),
        };

        let mut queue = VecDeque::from([tip]);
        while let Some(oid) = queue.pop_front() {
            if graph.handles.contains_key(&oid) {
                continue;
            }

            let commit = database
                .parse_object_as_commit(&oid)?
                .ok_or_else(|| anyhow!("object {oid} is not a commit"))?;

            graph.handles.insert(oid, graph.order.len());
            graph.order.push(oid);
            for parent in commit.parents() {
                if !graph.handles.contains_key(parent) {
                    queue.push_back(*parent);
                }
            }
            graph.commits.push(commit);
        }

        Ok(graph)
    }

    /// Iterate all loaded commits in breadth-first order
    pub fn commits(&self) -> impl Iterator<Item = (&ObjectId, &Commit)> {
        self.order.iter().zip(self.commits.iter())
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.handles.contains_key(oid)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Find the merge base with another history
    ///
    /// The base is the first commit, in the breadth-first order of the
    /// shorter history, that is reachable from both tips. `None` means the
    /// histories share no commit at all.
    pub fn merge_base(&self, other: &CommitGraph) -> Option<ObjectId> {
        let (shorter, longer) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };

        shorter
            .order
            .iter()
            .find(|oid| longer.contains(oid))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Author;
    use crate::artifacts::objects::object::Object;
    use crate::artifacts::objects::tree::Tree;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;

    struct Scratch {
        _dir: assert_fs::TempDir,
        database: Database,
        empty_tree: ObjectId,
        clock: i64,
    }

    impl Scratch {
        fn new() -> Self {
            let dir = assert_fs::TempDir::new().unwrap();
            let database = Database::new(dir.path().join("objects").into_boxed_path());
            let empty_tree = Tree::default().object_id().unwrap();
            database.store(&Tree::default()).unwrap();

            Scratch {
                _dir: dir,
                database,
                empty_tree,
                clock: 1_700_000_000,
            }
        }

        fn commit(&mut self, parents: Vec<ObjectId>, message: &str) -> ObjectId {
            self.clock += 60;
            let timestamp = FixedOffset::east_opt(0)
                .unwrap()
                .timestamp_opt(self.clock, 0)
                .unwrap();
            let author = Author::new_at("T".to_string(), "t@example.com".to_string(), timestamp);
            let commit = Commit::new(parents, self.empty_tree, author, message.to_string());

            self.database.store(&commit).unwrap();
            commit.object_id().unwrap()
        }
    }

    #[test]
    fn loads_linear_history_tip_first() {
        let mut scratch = Scratch::new();
        let a = scratch.commit(vec![], "a");
        let b = scratch.commit(vec![a], "b");
        let c = scratch.commit(vec![b], "c");

        let graph = CommitGraph::load(&scratch.database, c).unwrap();
        let order: Vec<ObjectId> = graph.commits().map(|(oid, _)| *oid).collect();

        assert_eq!(order, vec![c, b, a]);
        assert!(graph.contains(&a));
    }

    #[test]
    fn a_merge_commit_is_visited_once_through_both_parents() {
        let mut scratch = Scratch::new();
        let a = scratch.commit(vec![], "a");
        let b = scratch.commit(vec![a], "b");
        let c = scratch.commit(vec![a], "c");
        let d = scratch.commit(vec![b, c], "d");

        let graph = CommitGraph::load(&scratch.database, d).unwrap();

        assert_eq!(graph.len(), 4);
        let order: Vec<ObjectId> = graph.commits().map(|(oid, _)| *oid).collect();
        assert_eq!(order, vec![d, b, c, a]);
    }

    #[test]
    fn merge_base_of_an_ancestor_is_the_ancestor() {
        let mut scratch = Scratch::new();
        let a = scratch.commit(vec![], "a");
        let b = scratch.commit(vec![a], "b");
        let c = scratch.commit(vec![b], "c");

        let history_b = CommitGraph::load(&scratch.database, b).unwrap();
        let history_c = CommitGraph::load(&scratch.database, c).unwrap();

        assert_eq!(history_b.merge_base(&history_c), Some(b));
        assert_eq!(history_c.merge_base(&history_b), Some(b));
    }

    #[test]
    fn merge_base_of_diverged_branches_is_the_fork_point() {
        let mut scratch = Scratch::new();
        let a = scratch.commit(vec![], "a");
        let b = scratch.commit(vec![a], "on master");
        let c = scratch.commit(vec![a], "on dev");

        let history_b = CommitGraph::load(&scratch.database, b).unwrap();
        let history_c = CommitGraph::load(&scratch.database, c).unwrap();

        assert_eq!(history_b.merge_base(&history_c), Some(a));
    }

    #[test]
    fn unrelated_roots_have_no_merge_base() {
        let mut scratch = Scratch::new();
        let a = scratch.commit(vec![], "root one");
        let b = scratch.commit(vec![], "root two");

        let history_a = CommitGraph::load(&scratch.database, a).unwrap();
        let history_b = CommitGraph::load(&scratch.database, b).unwrap();

        assert_eq!(history_a.merge_base(&history_b), None);
    }
}
