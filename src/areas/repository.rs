//! Repository facade
//!
//! Coordinates the lower-level areas (database, index, workspace, refs) and
//! hosts the porcelain commands, which are implemented as `impl Repository`
//! blocks under `commands::porcelain`.
//!
//! The core is single-threaded and synchronous; the index sits behind a
//! `RefCell` so commands can borrow it mutably through a shared facade.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::Output;
use anyhow::Result;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Repository directory name
const GIT_DIR: &str = ".git";

/// Object database directory name, inside the repository directory
const DATABASE_DIR: &str = "objects";

/// Index file name, inside the repository directory
const INDEX_FILE: &str = "index";

/// High-level repository handle
pub struct Repository {
    /// Repository root (the working tree)
    path: Box<Path>,
    /// Output writer (stdout or pager)
    writer: RefCell<Output>,
    /// Staging area
    index: RefCell<Index>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// Reference manager
    refs: Refs,
}

impl Repository {
    pub fn new(path: PathBuf, writer: Output) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }
        let path = path.canonicalize()?;

        let index = Index::new(path.join(GIT_DIR).join(INDEX_FILE).into_boxed_path());
        let database = Database::new(path.join(GIT_DIR).join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(GIT_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(GIT_DIR)
    }

    pub fn writer(&self) -> RefMut<'_, Output> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
