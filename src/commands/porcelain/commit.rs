use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::config::UserConfig;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::snapshot::tree_graph::TreeGraph;
use anyhow::Result;
use std::io::Write;

impl Repository {
    /// Record the staged snapshot as a commit on the current history tip
    ///
    /// Side effects land in store order: tree objects first, then the commit,
    /// then the ref advance, so a ref never names an object that is not yet
    /// durable.
    pub fn commit(&mut self, message: &str) -> Result<()> {
        let tree_oid = self.write_tree()?;

        let head = self.refs().read_head()?;
        let parents: Vec<ObjectId> = self.refs().head_tip(&head)?.into_iter().collect();
        let is_root = parents.is_empty();

        // The identity is loaded here and handed to the commit as a value;
        // the timestamp and offset are captured once for both idents.
        let author = UserConfig::load()?.author();
        let commit = Commit::new(parents, tree_oid, author, message.trim().to_string());
        let commit_oid = commit.object_id()?;

        self.database().store(&commit)?;
        self.refs().advance_head(&head, commit_oid)?;

        let location = match &head {
            Head::Attached { branch } => branch.as_str(),
            Head::Detached(_) => "detached HEAD",
        };
        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            location,
            if is_root { " (root-commit)" } else { "" },
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    fn write_tree(&self) -> Result<ObjectId> {
        let mut index = self.index();
        index.rehydrate()?;

        let mut tree_graph = TreeGraph::new();
        for entry in index.entries() {
            tree_graph.add_entry(&entry.path, entry.oid);
        }

        tree_graph.write_objects(self.database())
    }
}
