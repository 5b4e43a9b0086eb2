use crate::areas::repository::Repository;
use crate::artifacts::history::commit_graph::CommitGraph;
use crate::artifacts::index::index_entry::IndexEntry;
use anyhow::{anyhow, bail, Result};
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Fast-forward the current branch to the tip of `target`
    ///
    /// The merge base must be the current tip; anything else is refused
    /// before any state is written. On success the ref moves first, then the
    /// target snapshot is staged without stat data, checked out, and finally
    /// re-staged with the fresh stat metadata of the files just written.
    pub fn merge(&mut self, target: &str) -> Result<()> {
        let head = self.refs().read_head()?;
        let current_tip = self.refs().head_tip(&head)?.ok_or_else(|| {
            anyhow!("the current branch does not have any commits yet")
        })?;

        let target_branch = self.refs().load_branch(target)?;
        let target_tip = target_branch
            .tip()
            .copied()
            .ok_or_else(|| anyhow!("branch '{target}' does not have any commits yet"))?;

        let current_history = CommitGraph::load(self.database(), current_tip)?;
        let target_history = CommitGraph::load(self.database(), target_tip)?;

        let base = current_history
            .merge_base(&target_history)
            .ok_or_else(|| anyhow!("cannot find a merge base"))?;
        if base != current_tip {
            bail!("only fast-forward merge is supported");
        }

        self.refs().advance_head(&head, target_tip)?;

        let target_commit = self
            .database()
            .parse_object_as_commit(&target_tip)?
            .ok_or_else(|| anyhow!("object {target_tip} is not a commit"))?;
        let files = self.database().flatten_tree(target_commit.tree_oid())?;

        // seed stage-0 entries without stat data so checkout can find them
        {
            let mut index = self.index();
            index.rehydrate()?;
            index.clear();
            for (path, oid) in &files {
                index.add(IndexEntry::new_minimal(path.clone(), *oid, 0));
            }
            index.write_updates()?;
        }

        let paths: Vec<String> = files.iter().map(|(path, _)| path.clone()).collect();
        self.checkout(&paths)?;

        // re-stage with the stat metadata of the files just written
        {
            let mut index = self.index();
            index.rehydrate()?;
            index.clear();
            for (path, oid) in &files {
                let metadata = self.workspace().stat_file(Path::new(path))?;
                index.add(IndexEntry::new(path.clone(), *oid, metadata));
            }
            index.write_updates()?;
        }

        writeln!(self.writer(), "Fast-forward merge")?;

        Ok(())
    }
}
