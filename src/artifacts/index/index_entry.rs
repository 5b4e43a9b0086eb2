//! Index entry representation
//!
//! Each entry records one tracked file: its path, blob object ID, and the
//! stat(2) metadata used for fast change detection.
//!
//! ## Binary layout
//!
//! A 62-byte big-endian prefix (ten u32 stat fields, the 20-byte object ID,
//! and a u16 flags word), followed by the NUL-terminated path and 1-8 NUL pad
//! bytes so the record length is a multiple of eight.
//!
//! The flags word packs, high to low: a 1-bit assume-valid flag, a 1-bit
//! extended flag (zero in version 2), a 2-bit merge stage, and the path length
//! capped at 0xFFF.

use crate::artifacts::index::{ENTRY_BLOCK, MAX_PATH_SIZE};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{anyhow, Result};
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use std::fs::Metadata;
use std::io::{BufRead, Write};

/// stat(2) metadata captured for a tracked file
///
/// The `mode` field is the raw stat mode word, not the textual octal encoding
/// trees use. The two encodings intentionally differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl From<&Metadata> for EntryMetadata {
    fn from(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        EntryMetadata {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: metadata.mode(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        }
    }
}

/// One tracked file in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Path relative to the repository root, '/'-separated, no leading slash
    pub path: String,
    /// Object ID of the staged blob
    pub oid: ObjectId,
    /// stat(2) metadata (all zero for minimal entries)
    pub metadata: EntryMetadata,
    flags: u16,
}

impl IndexEntry {
    /// Create a stage-0 entry carrying full stat metadata
    pub fn new(path: String, oid: ObjectId, metadata: EntryMetadata) -> Self {
        let flags = Self::name_length_bits(&path);

        IndexEntry {
            path,
            oid,
            metadata,
            flags,
        }
    }

    /// Create an entry with zeroed stat fields, used to seed merge results
    pub fn new_minimal(path: String, oid: ObjectId, stage: u8) -> Self {
        let flags = (u16::from(stage & 0x3) << 12) | Self::name_length_bits(&path);

        IndexEntry {
            path,
            oid,
            metadata: EntryMetadata::default(),
            flags,
        }
    }

    /// Merge stage recorded in the flags word
    pub fn stage(&self) -> u8 {
        ((self.flags >> 12) & 0x3) as u8
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    fn name_length_bits(path: &str) -> u16 {
        path.len().min(MAX_PATH_SIZE) as u16
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes> {
        let mut bytes = Vec::new();
        bytes.write_u32::<NetworkEndian>(self.metadata.ctime)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.ctime_nsec)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.mtime)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.mtime_nsec)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.dev)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.ino)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.mode)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.uid)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.gid)?;
        bytes.write_u32::<NetworkEndian>(self.metadata.size)?;
        bytes.write_all(self.oid.as_bytes())?;
        bytes.write_u16::<NetworkEndian>(self.flags)?;
        bytes.write_all(self.path.as_bytes())?;

        // NUL-terminate the path, then pad to the 8-byte boundary
        bytes.push(0);
        while bytes.len() % ENTRY_BLOCK != 0 {
            bytes.push(0);
        }

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(reader: impl BufRead) -> Result<Self> {
        let mut reader = reader;

        let metadata = EntryMetadata {
            ctime: reader.read_u32::<NetworkEndian>()?,
            ctime_nsec: reader.read_u32::<NetworkEndian>()?,
            mtime: reader.read_u32::<NetworkEndian>()?,
            mtime_nsec: reader.read_u32::<NetworkEndian>()?,
            dev: reader.read_u32::<NetworkEndian>()?,
            ino: reader.read_u32::<NetworkEndian>()?,
            mode: reader.read_u32::<NetworkEndian>()?,
            uid: reader.read_u32::<NetworkEndian>()?,
            gid: reader.read_u32::<NetworkEndian>()?,
            size: reader.read_u32::<NetworkEndian>()?,
        };
        let oid = ObjectId::read_raw_from(&mut reader)?;
        let flags = reader.read_u16::<NetworkEndian>()?;

        let mut tail = Vec::new();
        reader.read_to_end(&mut tail)?;
        let path_end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| anyhow!("index entry path is not NUL-terminated"))?;
        let path = std::str::from_utf8(&tail[..path_end])
            .map_err(|_| anyhow!("index entry path is not valid UTF-8"))?
            .to_string();

        Ok(IndexEntry {
            path,
            oid,
            metadata,
            flags,
        })
    }
}
