//! Index file format (version 2)
//!
//! The index tracks the files that will make up the next commit.
//!
//! ## File layout
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 62-byte fixed prefix, big-endian integers
//!   - NUL-terminated path, then 1-8 NUL pad bytes to an 8-byte boundary
//!   - Sorted by (path bytes, stage)
//!
//! Checksum (20 bytes):
//!   - SHA-1 over everything before it
//! ```

pub mod checksum;
pub mod index_entry;
pub mod index_header;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "DIRC";

/// Index file format version
pub const VERSION: u32 = 2;

/// Size of the index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Size of the trailing SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the fixed entry prefix in bytes (everything before the path)
pub const ENTRY_PREFIX_SIZE: usize = 62;

/// Alignment unit for entries
pub const ENTRY_BLOCK: usize = 8;

/// Smallest possible entry: prefix, one path byte, one NUL, aligned to 8
pub const ENTRY_MIN_SIZE: usize = 64;

/// Largest path length representable in the flags field
pub const MAX_PATH_SIZE: usize = 0xFFF;
