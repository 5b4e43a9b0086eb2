//! Index (staging area)
//!
//! The index is the flat, sorted list of paths that will make up the next
//! commit, each carrying a blob object ID and stat metadata.
//!
//! An absent or empty index file reads as an empty index (fresh repository);
//! a bad signature or version is fatal. Every save rewrites the whole file
//! and appends a SHA-1 checksum over it.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_MIN_SIZE, HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::ops::DerefMut;
use std::path::Path;

/// Staging area
///
/// Entries are keyed by (path, stage), which makes the map's iteration order
/// exactly the on-disk order: ascending path bytes, ties broken by stage.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Tracked files, sorted by (path bytes, stage)
    entries: BTreeMap<(String, u8), IndexEntry>,
    /// Header written back on save
    header: IndexHeader,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            header: IndexHeader::empty(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk
    ///
    /// An absent or empty file yields an empty index. Otherwise the header is
    /// validated, all entries are parsed, and the trailing checksum verified.
    ///
    /// # Locking
    ///
    /// Holds a shared lock on the index file while reading.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    fn parse_header(&self, reader: &mut Checksum) -> Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("invalid index file signature"));
        }
        if header.version != VERSION {
            return Err(anyhow!("unsupported index file version: {}", header.version));
        }

        Ok(header.entries_count)
    }

    /// Parse all entries, growing each record in 8-byte blocks until its
    /// trailing NUL padding shows up
    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> Result<()> {
        for _ in 0..entries_count {
            let mut entry_bytes = reader.read(ENTRY_MIN_SIZE)?.to_vec();

            while entry_bytes[entry_bytes.len() - 1] != 0 {
                entry_bytes.extend_from_slice(&reader.read(ENTRY_BLOCK)?);
            }

            let entry = IndexEntry::deserialize(std::io::Cursor::new(Bytes::from(entry_bytes)))?;
            self.entries
                .insert((entry.path.clone(), entry.stage()), entry);
        }

        self.header.entries_count = self.entries.len() as u32;

        Ok(())
    }

    /// Insert an entry, replacing any existing entry with the same path and
    /// stage
    pub fn add(&mut self, entry: IndexEntry) {
        self.entries
            .insert((entry.path.clone(), entry.stage()), entry);
        self.header.entries_count = self.entries.len() as u32;
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.header = IndexHeader::empty();
    }

    /// Look up the stage-0 entry for a path
    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(&(path.to_string(), 0))
    }

    /// Iterate entries in on-disk order
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the index file: header, sorted entries, trailing checksum
    ///
    /// # Locking
    ///
    /// Holds an exclusive lock on the index file while writing.
    pub fn write_updates(&mut self) -> Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())
            .with_context(|| format!("unable to open index file {}", self.path.display()))?;
        let lock = file_guard::lock(&mut index_file, Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        self.header = IndexHeader {
            entries_count: self.entries.len() as u32,
            ..self.header.clone()
        };
        writer.write(&self.header.serialize()?)?;

        for entry in self.entries.values() {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()
    }
}
