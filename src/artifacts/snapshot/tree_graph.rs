//! Directory graph built from flat index paths
//!
//! The index stores `a/b/c.txt`; trees are hierarchical. This graph bridges
//! the two: each index entry is walked component by component, materializing
//! a tree node per directory prefix and a blob node at the leaf.
//!
//! Nodes live in an arena vector with a handle map keyed by the full
//! sub-path, so inserting a node is idempotent and edge insertion is a set
//! operation. Emission is a post-order depth-first walk: a directory is
//! serialized only after every child has its object ID, which is exactly the
//! order the object store needs.

use crate::areas::database::Database;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{EntryMode, Tree};
use anyhow::{anyhow, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Tree,
    Blob,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    /// Last path component, as it appears in the parent tree
    basename: String,
    /// Known up front for blobs, stamped after emission for trees
    oid: Option<ObjectId>,
    /// Arena indices of children (tree nodes only)
    children: Vec<usize>,
}

/// Handle of the root node, inserted at construction
const ROOT: usize = 0;

/// Directory graph over the paths of a staged snapshot
#[derive(Debug)]
pub struct TreeGraph {
    nodes: Vec<Node>,
    /// Full sub-path to arena index
    handles: HashMap<String, usize>,
}

impl TreeGraph {
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Tree,
            basename: String::new(),
            oid: None,
            children: Vec::new(),
        };

        TreeGraph {
            nodes: vec![root],
            handles: HashMap::from([(String::from("/"), ROOT)]),
        }
    }

    /// Add one index entry, materializing any missing directory prefixes
    pub fn add_entry(&mut self, path: &str, oid: ObjectId) {
        let components: Vec<&str> = path.split('/').collect();
        let mut parent = ROOT;

        for depth in 1..=components.len() {
            let sub_path = components[..depth].join("/");
            let basename = components[depth - 1];

            let node = if depth == components.len() {
                self.add_node(&sub_path, NodeKind::Blob, basename, Some(oid))
            } else {
                self.add_node(&sub_path, NodeKind::Tree, basename, None)
            };

            self.add_edge(parent, node);
            parent = node;
        }
    }

    /// Write every tree object bottom-up and return the root tree's ID
    pub fn write_objects(&mut self, database: &Database) -> Result<ObjectId> {
        self.emit(ROOT, database)
    }

    fn add_node(
        &mut self,
        sub_path: &str,
        kind: NodeKind,
        basename: &str,
        oid: Option<ObjectId>,
    ) -> usize {
        if let Some(&handle) = self.handles.get(sub_path) {
            return handle;
        }

        let handle = self.nodes.len();
        self.nodes.push(Node {
            kind,
            basename: basename.to_string(),
            oid,
            children: Vec::new(),
        });
        self.handles.insert(sub_path.to_string(), handle);

        handle
    }

    fn add_edge(&mut self, source: usize, target: usize) {
        if !self.nodes[source].children.contains(&target) {
            self.nodes[source].children.push(target);
        }
    }

    fn emit(&mut self, handle: usize, database: &Database) -> Result<ObjectId> {
        let children = self.nodes[handle].children.clone();
        let mut tree = Tree::default();

        for child in children {
            let (mode, child_oid) = match self.nodes[child].kind {
                NodeKind::Tree => (EntryMode::Directory, self.emit(child, database)?),
                NodeKind::Blob => (
                    EntryMode::Regular,
                    self.nodes[child]
                        .oid
                        .ok_or_else(|| anyhow!("blob node has no object id"))?,
                ),
            };

            tree.add(mode, &self.nodes[child].basename, child_oid);
        }

        let oid = tree.object_id()?;
        database.store(&tree)?;
        self.nodes[handle].oid = Some(oid);

        Ok(oid)
    }
}

impl Default for TreeGraph {
    fn default() -> Self {
        Self::new()
    }
}
