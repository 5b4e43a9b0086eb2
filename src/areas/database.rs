//! Object database
//!
//! Content-addressable storage for blobs, trees, and commits. Each object is
//! framed as `<type> <size>\0<payload>`, hashed with SHA-1, compressed with
//! zlib, and written to `objects/xx/yyyy...` where `xx` is the first two hex
//! characters of the digest.
//!
//! The store is append-only and writes are idempotent: an object that is
//! already present is never rewritten, since equal digests imply equal bytes.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{EntryMode, Tree};
use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use std::io::{Cursor, Read, Write};
use std::path::Path;

/// Object database rooted at `.git/objects`
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Get the path to the objects directory
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object, creating the fan-out directory if needed
    ///
    /// A no-op when the object already exists.
    pub fn store(&self, object: &impl Object) -> Result<()> {
        let object_path = self.path.join(object.object_path()?);
        if object_path.exists() {
            return Ok(());
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, object.serialize()?)
    }

    /// Load and decompress an object's full framing (header included)
    pub fn load(&self, oid: &ObjectId) -> Result<Bytes> {
        let object_path = self.path.join(oid.to_path());
        let compressed = std::fs::read(&object_path)
            .with_context(|| format!("unable to read object file {}", object_path.display()))?;

        Self::decompress(&compressed)
            .with_context(|| format!("object {oid} is corrupt: bad zlib stream"))
    }

    /// Parse an object as a Blob, if it is one
    pub fn parse_object_as_blob(&self, oid: &ObjectId) -> Result<Option<Blob>> {
        let (object_type, reader) = self.parse_object_as_bytes(oid)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Tree, if it is one
    pub fn parse_object_as_tree(&self, oid: &ObjectId) -> Result<Option<Tree>> {
        let (object_type, reader) = self.parse_object_as_bytes(oid)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(reader)?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a Commit, if it is one
    pub fn parse_object_as_commit(&self, oid: &ObjectId) -> Result<Option<Commit>> {
        let (object_type, reader) = self.parse_object_as_bytes(oid)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(reader)?)),
            _ => Ok(None),
        }
    }

    /// Recursively flatten a tree into `(path, blob oid)` pairs
    ///
    /// Paths are '/'-separated and relative to the tree's root, in canonical
    /// tree order.
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> Result<Vec<(String, ObjectId)>> {
        let mut files = Vec::new();
        self.flatten_tree_into(tree_oid, "", &mut files)?;

        Ok(files)
    }

    fn flatten_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: &str,
        files: &mut Vec<(String, ObjectId)>,
    ) -> Result<()> {
        let tree = self
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| anyhow!("object {tree_oid} is not a tree"))?;

        for (name, record) in tree.entries() {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            };

            match record.mode {
                EntryMode::Directory => self.flatten_tree_into(&record.oid, &path, files)?,
                EntryMode::Regular => files.push((path, record.oid)),
            }
        }

        Ok(())
    }

    fn parse_object_as_bytes(&self, oid: &ObjectId) -> Result<(ObjectType, Cursor<Bytes>)> {
        let content = self.load(oid)?;
        let mut reader = Cursor::new(content);

        let (object_type, declared_size) = ObjectType::parse_header(&mut reader)
            .with_context(|| format!("object {oid} is corrupt"))?;

        let actual_size = reader.get_ref().len() - reader.position() as usize;
        if actual_size != declared_size {
            return Err(anyhow!(
                "object {oid} is corrupt: header declares {declared_size} bytes, found {actual_size}"
            ));
        }

        Ok((object_type, reader))
    }

    fn write_object(&self, object_path: &Path, content: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        let temp_path = object_dir.join(format!("tmp-obj-{}", std::process::id()));

        let compressed = Self::compress(&content)?;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("unable to open object file {}", temp_path.display()))?;
        file.write_all(&compressed)
            .with_context(|| format!("unable to write object file {}", temp_path.display()))?;

        // the rename makes the object visible atomically
        std::fs::rename(&temp_path, object_path).with_context(|| {
            format!("unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: &[u8]) -> Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .map(Bytes::from)
            .context("unable to finish compressing object content")
    }

    fn decompress(data: &[u8]) -> Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("unable to decompress object content")?;

        Ok(Bytes::from(decompressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_database(dir: &assert_fs::TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[test]
    fn stored_blobs_read_back_verbatim() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = scratch_database(&dir);
        let blob = Blob::new(Bytes::from_static(b"hello\n"));

        database.store(&blob).unwrap();
        let oid = blob.object_id().unwrap();

        let loaded = database.parse_object_as_blob(&oid).unwrap().unwrap();
        assert_eq!(loaded.content(), b"hello\n");

        // full framing survives the zlib round trip
        assert_eq!(&database.load(&oid).unwrap()[..], b"blob 6\0hello\n");
    }

    #[test]
    fn storing_twice_is_a_no_op() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = scratch_database(&dir);
        let blob = Blob::new(Bytes::from_static(b"same bytes"));

        database.store(&blob).unwrap();
        let object_path = dir.path().join("objects").join(blob.object_path().unwrap());
        let first_write = std::fs::metadata(&object_path).unwrap().modified().unwrap();

        database.store(&blob).unwrap();
        let second_write = std::fs::metadata(&object_path).unwrap().modified().unwrap();
        assert_eq!(first_write, second_write);
    }

    #[test]
    fn a_size_mismatch_is_reported_as_corruption() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = scratch_database(&dir);

        let framed = b"blob 99\0hello\n";
        let oid = ObjectId::hash(framed);
        let object_path = dir.path().join("objects").join(oid.to_path());
        std::fs::create_dir_all(object_path.parent().unwrap()).unwrap();
        std::fs::write(&object_path, Database::compress(framed).unwrap()).unwrap();

        let error = database.parse_object_as_blob(&oid).unwrap_err();
        assert!(error.to_string().contains("corrupt"));
    }

    #[test]
    fn a_missing_object_is_an_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = scratch_database(&dir);
        let oid = ObjectId::hash(b"nothing stored under this digest");

        assert!(database.load(&oid).is_err());
    }

    #[test]
    fn type_probes_return_none_on_mismatch() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = scratch_database(&dir);
        let blob = Blob::new(Bytes::from_static(b"not a tree"));
        database.store(&blob).unwrap();
        let oid = blob.object_id().unwrap();

        assert!(database.parse_object_as_tree(&oid).unwrap().is_none());
        assert!(database.parse_object_as_commit(&oid).unwrap().is_none());
        assert!(database.parse_object_as_blob(&oid).unwrap().is_some());
    }

    #[test]
    fn flatten_tree_walks_nested_directories() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = scratch_database(&dir);

        let x_blob = Blob::new(Bytes::from_static(b"x\n"));
        let m_blob = Blob::new(Bytes::from_static(b"m\n"));
        database.store(&x_blob).unwrap();
        database.store(&m_blob).unwrap();

        let mut lib = Tree::default();
        lib.add(EntryMode::Regular, "x.txt", x_blob.object_id().unwrap());
        database.store(&lib).unwrap();

        let mut src = Tree::default();
        src.add(EntryMode::Directory, "lib", lib.object_id().unwrap());
        src.add(EntryMode::Regular, "main.txt", m_blob.object_id().unwrap());
        database.store(&src).unwrap();

        let mut root = Tree::default();
        root.add(EntryMode::Directory, "src", src.object_id().unwrap());
        database.store(&root).unwrap();

        let files = database.flatten_tree(&root.object_id().unwrap()).unwrap();
        assert_eq!(
            files,
            vec![
                ("src/lib/x.txt".to_string(), x_blob.object_id().unwrap()),
                ("src/main.txt".to_string(), m_blob.object_id().unwrap()),
            ]
        );
    }
}
