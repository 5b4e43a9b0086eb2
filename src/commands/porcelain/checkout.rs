use crate::areas::repository::Repository;
use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Restore the staged blobs for the given paths into the working tree
    ///
    /// Every path must have a stage-0 index entry; the lookup happens for all
    /// paths before any file is written, so a bad path leaves the working
    /// tree untouched. Missing parent directories are created.
    pub fn checkout(&mut self, paths: &[String]) -> Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let mut selected = Vec::with_capacity(paths.len());
        for path in paths {
            let entry = index.entry_by_path(path).ok_or_else(|| {
                anyhow!("pathspec '{path}' did not match any file(s) known to git")
            })?;
            selected.push(entry.clone());
        }

        for entry in &selected {
            let blob = self
                .database()
                .parse_object_as_blob(&entry.oid)?
                .ok_or_else(|| anyhow!("object {} is not a blob", entry.oid))?;

            self.workspace()
                .write_file(Path::new(&entry.path), blob.content())?;
        }

        writeln!(self.writer(), "Updated {} paths from the index", selected.len())?;

        Ok(())
    }
}
