//! Core object traits
//!
//! - `Packable`: serialization to the binary object format
//! - `Unpackable`: deserialization from the binary object format
//! - `Object`: common operations (digest, storage path)
//!
//! Serialization always includes the `<type> <size>\0` header; the digest is
//! computed over the full framing, and compression happens at the database
//! layer.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;
use std::path::PathBuf;

/// Trait for serializing objects to the binary object format
pub trait Packable {
    /// Serialize the object to bytes (including header)
    fn serialize(&self) -> Result<Bytes>;
}

/// Trait for deserializing objects from the binary object format
pub trait Unpackable {
    /// Deserialize the object from a reader (header already consumed)
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Core object trait, implemented by Blob, Tree, and Commit
pub trait Object: Packable {
    /// Get the object's type
    fn object_type(&self) -> ObjectType;

    /// Compute the object ID (SHA-1 over the serialized framing)
    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::hash(&self.serialize()?))
    }

    /// Get the path where this object is stored, relative to the objects directory
    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Frame a payload as `<type> <size>\0<payload>`
pub(crate) fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());
    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(payload);

    Bytes::from(framed)
}
