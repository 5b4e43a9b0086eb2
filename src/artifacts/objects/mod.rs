//! Object types (blob, tree, commit)
//!
//! Every object is stored under its content digest:
//!
//! ```text
//! <type> <size>\0<payload>
//! ```
//!
//! The digest is the SHA-1 of that framing, computed before zlib compression.
//! Because the type is hashed along with the payload, a blob and a tree with
//! identical payload bytes never collide.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;
