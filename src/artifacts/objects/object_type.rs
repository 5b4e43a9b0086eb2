use anyhow::{anyhow, Context, Result};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Parse the `<type> <size>\0` header, leaving the reader at the payload
    ///
    /// Returns the object type and the declared payload size. The caller is
    /// responsible for checking the declared size against the actual payload.
    pub fn parse_header(reader: &mut impl BufRead) -> Result<(ObjectType, usize)> {
        let mut kind = Vec::new();
        reader.read_until(b' ', &mut kind)?;
        if kind.pop() != Some(b' ') {
            return Err(anyhow!("object header is missing its type"));
        }
        let kind = std::str::from_utf8(&kind).context("object header type is not valid UTF-8")?;
        let kind = ObjectType::try_from(kind)?;

        let mut size = Vec::new();
        reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            return Err(anyhow!("object header is missing its size"));
        }
        let size = std::str::from_utf8(&size)
            .ok()
            .and_then(|size| size.parse::<usize>().ok())
            .ok_or_else(|| anyhow!("object header has a malformed size"))?;

        Ok((kind, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow!("unknown object type '{}'", value)),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
