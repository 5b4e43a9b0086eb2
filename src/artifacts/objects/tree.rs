//! Tree object
//!
//! Trees are directory snapshots. Each entry is
//!
//! ```text
//! <mode> <basename>\0<20-byte oid>
//! ```
//!
//! with no separator between entries. This core writes exactly two modes:
//! `100644` for regular files and `040000` for subdirectories. Entries are
//! stored in canonical order: plain byte order of the name, except that
//! directory names compare as if they ended in `/`.

use crate::artifacts::objects::object::{frame, Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Mode of a tree entry
///
/// The textual octal forms here are a tree-only encoding; index entries carry
/// the raw stat(2) mode instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Regular,
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Directory => "040000",
        }
    }

    /// Classify a raw mode value by its file-type bits
    pub fn from_raw(mode: u32) -> Self {
        if mode & 0o170000 == 0o040000 {
            EntryMode::Directory
        } else {
            EntryMode::Regular
        }
    }

    /// Parse a textual octal mode, tolerating forms this core does not write
    pub fn from_octal_str(mode: &str) -> Result<Self> {
        let mode = u32::from_str_radix(mode, 8)
            .with_context(|| format!("tree entry has a non-octal mode '{mode}'"))?;

        Ok(Self::from_raw(mode))
    }
}

/// A single child of a tree: its mode and object ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct TreeRecord {
    pub mode: EntryMode,
    pub oid: ObjectId,
}

/// Tree object representing one directory level
///
/// Entries are keyed by name, with directory names suffixed by `/` so that the
/// map's byte ordering is exactly the canonical tree order. The suffix is
/// stripped again on serialization and when iterating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeRecord>,
}

impl Tree {
    /// Add a child entry by basename
    pub fn add(&mut self, mode: EntryMode, basename: &str, oid: ObjectId) {
        let key = match mode {
            EntryMode::Directory => format!("{basename}/"),
            EntryMode::Regular => basename.to_string(),
        };

        self.entries.insert(key, TreeRecord::new(mode, oid));
    }

    /// Iterate entries in canonical order, with clean basenames
    pub fn entries(&self) -> impl Iterator<Item = (&str, &TreeRecord)> {
        self.entries
            .iter()
            .map(|(name, record)| (name.trim_end_matches('/'), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut payload = Vec::new();

        for (name, record) in self.entries() {
            payload.extend_from_slice(record.mode.as_str().as_bytes());
            payload.push(b' ');
            payload.extend_from_slice(name.as_bytes());
            payload.push(b'\0');
            payload.extend_from_slice(record.oid.as_bytes());
        }

        Ok(frame(self.object_type(), &payload))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> Result<Self> {
        let mut tree = Tree::default();
        let mut reader = reader;

        loop {
            let mut mode = Vec::new();
            let n = reader.read_until(b' ', &mut mode)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode.pop() != Some(b' ') {
                return Err(anyhow!("unexpected end of tree entry mode"));
            }
            let mode = std::str::from_utf8(&mode).context("tree entry mode is not valid UTF-8")?;
            let mode = EntryMode::from_octal_str(mode)?;

            let mut name = Vec::new();
            reader.read_until(b'\0', &mut name)?;
            if name.pop() != Some(b'\0') {
                return Err(anyhow!("unexpected end of tree entry name"));
            }
            let name = std::str::from_utf8(&name)
                .context("tree entry name is not valid UTF-8")?
                .to_owned();

            let oid = ObjectId::read_raw_from(&mut reader)
                .context("unexpected end of tree entry object id")?;

            tree.add(mode, &name, oid);
        }

        Ok(tree)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
