//! Commit object
//!
//! ## Format
//!
//! ```text
//! tree <tree-oid>
//! parent <parent-oid>        (zero or more)
//! author <name> <email> <unix-seconds> <±HHMM>
//! committer <name> <email> <unix-seconds> <±HHMM>
//!
//! <message>
//! ```
//!
//! Serialization always terminates the message with exactly one newline, and
//! parsing strips exactly one, so a parsed commit re-serializes to the same
//! bytes and the same digest.

use crate::artifacts::objects::object::{frame, Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

/// Author or committer identity
///
/// The timestamp carries its own UTC offset, captured once when the identity
/// is created. Serialization never consults the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create an identity stamped with the current local time and offset
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    /// Create an identity with an explicit timestamp
    pub fn new_at(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Format as `Name <email> <unix-seconds> <±HHMM>`
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    fn parse_offset(offset: &str) -> Result<FixedOffset> {
        if offset.len() != 5 {
            return Err(anyhow!("invalid timezone offset '{offset}'"));
        }
        let (sign, digits) = offset.split_at(1);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(anyhow!("invalid timezone offset '{offset}'"));
        }
        let hours: i32 = digits[..2].parse()?;
        let minutes: i32 = digits[2..].parse()?;
        let seconds = hours * 3600 + minutes * 60;

        match sign {
            "+" => FixedOffset::east_opt(seconds),
            "-" => FixedOffset::west_opt(seconds),
            _ => None,
        }
        .ok_or_else(|| anyhow!("invalid timezone offset '{offset}'"))
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        // "Name <email> <unix-seconds> <±HHMM>", split from the right since
        // the name may contain spaces
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() != 3 {
            return Err(anyhow!("invalid identity '{value}'"));
        }

        let offset = Self::parse_offset(parts[0])?;
        let seconds: i64 = parts[1]
            .parse()
            .map_err(|_| anyhow!("invalid identity timestamp '{}'", parts[1]))?;
        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| anyhow!("invalid identity timestamp '{}'", parts[1]))?
            .with_timezone(&offset);

        let name_and_email = parts[2];
        let email_start = name_and_email
            .find('<')
            .ok_or_else(|| anyhow!("invalid identity '{value}': missing '<'"))?;
        let email_end = name_and_email
            .find('>')
            .ok_or_else(|| anyhow!("invalid identity '{value}': missing '>'"))?;

        Ok(Author {
            name: name_and_email[..email_start].trim().to_string(),
            email: name_and_email[email_start + 1..email_end].to_string(),
            timestamp,
        })
    }
}

/// Commit object
///
/// A snapshot of the repository: the tree it records, the parents it follows,
/// the identities involved, and the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit; the author identity doubles as the committer
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    fn from_parts(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        Commit {
            parents,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message, for one-line summaries
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut lines = Vec::new();

        lines.push(format!("tree {}", self.tree_oid));
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(format!("{}\n", self.message));

        Ok(frame(self.object_type(), lines.join("\n").as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        let mut reader = reader;
        reader.read_to_string(&mut content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("invalid commit object: missing blank line before message")?;
        let message = message.strip_suffix('\n').unwrap_or(message).to_string();

        let mut lines = headers.lines();

        let tree_line = lines
            .next()
            .context("invalid commit object: missing tree header")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("invalid commit object: malformed tree header")?;
        let tree_oid = ObjectId::from_hex(tree_oid)?;

        let mut parents = Vec::new();
        let mut next_line = lines
            .next()
            .context("invalid commit object: missing author header")?;
        while let Some(parent) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::from_hex(parent)?);
            next_line = lines
                .next()
                .context("invalid commit object: missing author header")?;
        }

        let author = next_line
            .strip_prefix("author ")
            .context("invalid commit object: malformed author header")?;
        let author = Author::try_from(author)?;

        let committer_line = lines
            .next()
            .context("invalid commit object: missing committer header")?;
        let committer = committer_line
            .strip_prefix("committer ")
            .context("invalid commit object: malformed committer header")?;
        let committer = Author::try_from(committer)?;

        Ok(Self::from_parts(parents, tree_oid, author, committer, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
