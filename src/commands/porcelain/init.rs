use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use anyhow::{Context, Result};
use std::io::Write;

impl Repository {
    /// Create the repository layout: objects, refs/heads, and a HEAD attached
    /// to the default branch. Safe to re-run on an existing repository.
    pub fn init(&mut self) -> Result<()> {
        std::fs::create_dir_all(self.database().objects_path())
            .context("failed to create the objects directory")?;
        std::fs::create_dir_all(self.refs().heads_path())
            .context("failed to create the refs/heads directory")?;

        self.refs().point_head_at_branch(DEFAULT_BRANCH)?;

        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
