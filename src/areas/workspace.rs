use crate::artifacts::index::index_entry::EntryMetadata;
use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".git", ".", ".."];

/// Working directory operations
///
/// All paths handed out are relative to the repository root, '/'-separated.
#[derive(Debug, new)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the files under a path, relative to the repository root
    ///
    /// A file path yields itself; a directory is walked recursively, skipping
    /// `.git`. The path may be absolute or relative to the root.
    pub fn list_files(&self, start: &Path) -> Result<Vec<String>> {
        let start = if start.is_absolute() {
            start.to_path_buf()
        } else {
            self.path.join(start)
        };
        let start = start
            .canonicalize()
            .with_context(|| format!("the specified path does not exist: {}", start.display()))?;

        if start.is_dir() {
            Ok(WalkDir::new(&start)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .filter_map(|entry| self.relative_path(entry.path()))
                .collect())
        } else {
            self.relative_path(&start)
                .map(|path| vec![path])
                .ok_or_else(|| anyhow!("path {} is outside the repository", start.display()))
        }
    }

    /// Read a file's bytes verbatim, with no normalization
    pub fn read_file(&self, path: &Path) -> Result<Bytes> {
        let file_path = self.path.join(path);
        let content = std::fs::read(&file_path)
            .with_context(|| format!("unable to read file {}", file_path.display()))?;

        Ok(Bytes::from(content))
    }

    /// Capture stat metadata for a file with a single probe
    pub fn stat_file(&self, path: &Path) -> Result<EntryMetadata> {
        let file_path = self.path.join(path);
        let metadata = std::fs::metadata(&file_path)
            .with_context(|| format!("unable to stat file {}", file_path.display()))?;

        Ok(EntryMetadata::from(&metadata))
    }

    /// Write a file, creating any missing parent directories
    pub fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("unable to create directory {}", parent.display())
            })?;
        }

        std::fs::write(&file_path, data)
            .with_context(|| format!("unable to write file {}", file_path.display()))
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
            } else {
                false
            }
        })
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        if Self::is_ignored(relative) {
            return None;
        }

        relative.to_str().map(str::to_string)
    }
}
