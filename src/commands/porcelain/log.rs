use crate::areas::repository::Repository;
use crate::artifacts::history::commit_graph::CommitGraph;
use anyhow::{anyhow, Result};
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Emit the history reachable from HEAD, newest commit first
    ///
    /// Each commit renders as a yellow header line, the author and committer
    /// idents, and the message indented by four spaces. The caller decides
    /// whether the assembled text goes to a pager or straight to stdout.
    pub fn log(&self) -> Result<()> {
        let head = self.refs().read_head()?;
        let tip = self
            .refs()
            .head_tip(&head)?
            .ok_or_else(|| match head.branch_name() {
                Some(branch) => {
                    anyhow!("your current branch '{branch}' does not have any commits yet")
                }
                None => anyhow!("HEAD does not point at any commit"),
            })?;

        let graph = CommitGraph::load(self.database(), tip)?;

        for (oid, commit) in graph.commits() {
            writeln!(self.writer(), "{}", format!("commit {oid}").as_str().yellow())?;
            writeln!(self.writer(), "Author: {}", commit.author().display())?;
            writeln!(self.writer(), "Committer: {}", commit.committer().display())?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {line}")?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }
}
