//! User identity configuration
//!
//! The committer identity comes from the user-scoped `~/.gitconfig`, an INI
//! file of which only the `[user]` section's `name` and `email` keys are
//! consumed. The parse is deliberately tolerant: whitespace around keys and
//! values is ignored, unknown keys and sections are skipped, and `#`/`;`
//! comment lines are allowed.

use crate::artifacts::objects::commit::Author;
use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// The `[user]` identity from the user-scoped config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    name: String,
    email: String,
}

impl UserConfig {
    /// Load `$HOME/.gitconfig`
    pub fn load() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME is not set; cannot locate ~/.gitconfig")?;

        Self::load_from(Path::new(&home).join(".gitconfig"))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("in config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let mut in_user_section = false;
        let mut name = None;
        let mut email = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') {
                in_user_section = line == "[user]";
                continue;
            }
            if !in_user_section {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("syntax error on line '{line}'"))?;
            match key.trim() {
                "name" => name = Some(value.trim().to_string()),
                "email" => email = Some(value.trim().to_string()),
                _ => {}
            }
        }

        Ok(UserConfig {
            name: name.ok_or_else(|| anyhow!("user.name is not set"))?,
            email: email.ok_or_else(|| anyhow!("user.email is not set"))?,
        })
    }

    /// Build an identity stamped with the current time and offset
    pub fn author(&self) -> Author {
        Author::new(self.name.clone(), self.email.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
