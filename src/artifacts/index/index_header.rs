use crate::artifacts::index::{SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::Result;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// 12-byte index file header: signature, version, entry count
#[derive(Debug, Clone, new)]
pub struct IndexHeader {
    pub(crate) marker: String,
    pub(crate) version: u32,
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn empty() -> Self {
        IndexHeader {
            marker: String::from(SIGNATURE),
            version: VERSION,
            entries_count: 0,
        }
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> Result<Bytes> {
        let mut bytes = Vec::new();
        bytes.write_all(self.marker.as_bytes())?;
        bytes.write_u32::<NetworkEndian>(self.version)?;
        bytes.write_u32::<NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    fn deserialize(reader: impl BufRead) -> Result<Self> {
        let mut reader = reader;

        let mut marker = [0u8; 4];
        reader.read_exact(&mut marker)?;
        let marker = String::from_utf8_lossy(&marker).to_string();

        let version = reader.read_u32::<NetworkEndian>()?;
        let entries_count = reader.read_u32::<NetworkEndian>()?;

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_and_stays_twelve_bytes() {
        let header = IndexHeader::new(String::from(SIGNATURE), VERSION, 3);

        let bytes = header.serialize().unwrap();
        assert_eq!(bytes.len(), crate::artifacts::index::HEADER_SIZE);
        assert_eq!(&bytes[..4], b"DIRC");

        let parsed = IndexHeader::deserialize(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(parsed.marker, SIGNATURE);
        assert_eq!(parsed.version, VERSION);
        assert_eq!(parsed.entries_count, 3);
    }
}
