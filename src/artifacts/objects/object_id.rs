//! Object identifier (SHA-1 digest)
//!
//! Object IDs are 20-byte SHA-1 digests. They uniquely identify every object
//! in the store (blobs, trees, commits).
//!
//! ## Forms
//!
//! - Raw: 20 bytes, as embedded in tree entries and index entries
//! - Hex: 40 lowercase hex characters, as written in ref files
//! - Short: first 7 hex characters, for display

use anyhow::{anyhow, Result};
use sha1::{Digest, Sha1};
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

/// Size of a raw object ID in bytes
pub const OBJECT_ID_RAW_SIZE: usize = 20;

/// Size of a hex-encoded object ID in characters
pub const OBJECT_ID_HEX_SIZE: usize = 40;

/// Object identifier
///
/// Holds the raw 20-byte SHA-1 digest. Hex encoding happens only at the
/// boundaries (ref files, display); the binary formats embed the raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_RAW_SIZE]);

impl ObjectId {
    /// Compute the object ID of a serialized object (header included)
    pub fn hash(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        ObjectId(hasher.finalize().into())
    }

    /// Parse and validate an object ID from its 40-character hex form
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != OBJECT_ID_HEX_SIZE {
            return Err(anyhow!("invalid object id length: {}", hex.len()));
        }

        let mut raw = [0u8; OBJECT_ID_RAW_SIZE];
        for (i, pair) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(pair)
                .map_err(|_| anyhow!("invalid object id characters: {}", hex))?;
            raw[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| anyhow!("invalid object id characters: {}", hex))?;
        }

        Ok(ObjectId(raw))
    }

    /// Read the raw 20-byte form, as embedded in tree and index entries
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; OBJECT_ID_RAW_SIZE];
        reader.read_exact(&mut raw)?;

        Ok(ObjectId(raw))
    }

    /// Get the raw 20-byte form
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the 40-character hex form
    pub fn to_hex(&self) -> String {
        self.0.iter().fold(
            String::with_capacity(OBJECT_ID_HEX_SIZE),
            |mut hex, byte| {
                let _ = write!(hex, "{byte:02x}");
                hex
            },
        )
    }

    /// Convert to the on-disk storage path `xx/yyyy...`
    ///
    /// The first two hex characters form a fan-out directory, which keeps the
    /// number of entries per directory bounded.
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);

        PathBuf::from(dir).join(file)
    }

    /// Get the abbreviated form (first 7 hex characters)
    pub fn to_short_oid(&self) -> String {
        self.to_hex()[..7].to_string()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
