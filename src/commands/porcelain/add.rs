use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use anyhow::Result;
use std::path::Path;

impl Repository {
    /// Hash the given files into blobs and stage them
    ///
    /// Directories expand to the files they contain. Paths that do not exist
    /// or cannot be read are skipped rather than fatal.
    pub fn add(&mut self, paths: &[String]) -> Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        for path in paths {
            let files = match self.workspace().list_files(Path::new(path)) {
                Ok(files) => files,
                Err(_) => continue,
            };

            for file in files {
                let data = match self.workspace().read_file(Path::new(&file)) {
                    Ok(data) => data,
                    Err(_) => continue,
                };

                let blob = Blob::new(data);
                let blob_oid = blob.object_id()?;
                self.database().store(&blob)?;

                let metadata = self.workspace().stat_file(Path::new(&file))?;
                index.add(IndexEntry::new(file, blob_oid, metadata));
            }
        }

        index.write_updates()
    }
}
