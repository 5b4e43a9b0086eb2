//! References (branches and HEAD)
//!
//! A branch is a file under `refs/heads/<name>` holding a commit digest in
//! hex plus a newline. HEAD is either symbolic, `ref: refs/heads/<name>`
//! (attached), or a literal digest (detached).
//!
//! An attached HEAD whose branch file does not exist yet is the unborn state
//! of a fresh repository; the branch springs into existence with the first
//! commit.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{anyhow, Context, Result};
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Pattern for the symbolic HEAD shape
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Branch a fresh repository starts on
pub const DEFAULT_BRANCH: &str = "master";

/// Where HEAD currently points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD names a branch (which may not have a tip yet)
    Attached { branch: String },
    /// HEAD holds a commit digest directly
    Detached(ObjectId),
}

impl Head {
    pub fn branch_name(&self) -> Option<&str> {
        match self {
            Head::Attached { branch } => Some(branch),
            Head::Detached(_) => None,
        }
    }
}

/// A branch pointer: a name and, once the first commit lands, a tip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: String,
    tip: Option<ObjectId>,
}

impl Branch {
    /// A branch with no tip yet
    pub fn unborn(name: &str) -> Self {
        Branch {
            name: name.to_string(),
            tip: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tip(&self) -> Option<&ObjectId> {
        self.tip.as_ref()
    }

    pub fn set_tip(&mut self, oid: ObjectId) {
        self.tip = Some(oid);
    }
}

/// Reference manager rooted at `.git`
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Parse HEAD into its attached or detached shape
    pub fn read_head(&self) -> Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("unable to read {}", head_path.display()))?;
        let content = content.trim();

        if let Some(captures) = regex::Regex::new(SYMREF_REGEX)?.captures(content) {
            let ref_path = &captures[1];
            let branch = ref_path.rsplit('/').next().unwrap_or(ref_path).to_string();

            Ok(Head::Attached { branch })
        } else {
            Ok(Head::Detached(ObjectId::from_hex(content)?))
        }
    }

    /// Rewrite HEAD to name a branch (attached)
    pub fn point_head_at_branch(&self, branch: &str) -> Result<()> {
        self.write_ref_file(&self.head_path(), &format!("ref: refs/heads/{branch}\n"))
    }

    /// Rewrite HEAD to hold a digest (detached)
    pub fn point_head_at_oid(&self, oid: &ObjectId) -> Result<()> {
        self.write_ref_file(&self.head_path(), &format!("{oid}\n"))
    }

    /// Resolve HEAD to a commit digest, if it has one
    ///
    /// An attached HEAD on an unborn branch resolves to `None`.
    pub fn head_tip(&self, head: &Head) -> Result<Option<ObjectId>> {
        match head {
            Head::Attached { branch } => Ok(self.load_branch(branch)?.tip().copied()),
            Head::Detached(oid) => Ok(Some(*oid)),
        }
    }

    /// Move the current tip forward: the branch file when attached, the HEAD
    /// file itself when detached
    pub fn advance_head(&self, head: &Head, oid: ObjectId) -> Result<()> {
        match head {
            Head::Attached { branch } => {
                let mut branch = self.load_branch(branch)?;
                branch.set_tip(oid);
                self.store_branch(&branch)
            }
            Head::Detached(_) => self.point_head_at_oid(&oid),
        }
    }

    /// Load a branch; an absent file yields an unborn branch
    pub fn load_branch(&self, name: &str) -> Result<Branch> {
        let branch_path = self.heads_path().join(name);
        if !branch_path.exists() {
            return Ok(Branch::unborn(name));
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("unable to read branch file {}", branch_path.display()))?;
        let tip = ObjectId::from_hex(content.trim())?;

        Ok(Branch {
            name: name.to_string(),
            tip: Some(tip),
        })
    }

    /// Write a branch file; a branch must name a commit
    pub fn store_branch(&self, branch: &Branch) -> Result<()> {
        let tip = branch.tip().ok_or_else(|| {
            anyhow!(
                "refusing to create branch '{}' without any commit",
                branch.name()
            )
        })?;

        self.write_ref_file(&self.heads_path().join(branch.name()), &format!("{tip}\n"))
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.heads_path().join(name).exists()
    }

    /// Overwrite a ref file under an exclusive lock, creating parents
    fn write_ref_file(&self, path: &Path, raw_ref: &str) -> Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("invalid ref file path {}", path.display())
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("unable to open ref file {}", path.display()))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }
}
