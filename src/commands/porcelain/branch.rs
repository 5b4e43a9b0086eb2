use crate::areas::refs::Branch;
use crate::areas::repository::Repository;
use anyhow::{bail, Result};

impl Repository {
    /// Create a branch pointing at the commit HEAD currently resolves to
    pub fn branch(&mut self, name: &str) -> Result<()> {
        if self.refs().branch_exists(name) {
            bail!("a branch named '{name}' already exists");
        }

        let head = self.refs().read_head()?;
        let tip = self.refs().head_tip(&head)?;

        let mut branch = Branch::unborn(name);
        if let Some(tip) = tip {
            branch.set_tip(tip);
        }

        // an unborn HEAD leaves the tip empty, which the store refuses
        self.refs().store_branch(&branch)
    }
}
