//! Shared utilities
//!
//! The output writer commands print through. `log` wants its text paged, but
//! the minus pager does not implement `std::io::Write`, and the pager is not
//! always available (pipes, tests). `Output` adapts both destinations behind
//! one `Write` implementation so the commands never care which one is active.

use minus::Pager;
use std::io::{self, Write};

/// Command output destination: direct stdout, or the pager
pub enum Output {
    Stdout(io::Stdout),
    Pager(Pager),
}

impl Output {
    pub fn stdout() -> Self {
        Output::Stdout(io::stdout())
    }

    pub fn pager(pager: Pager) -> Self {
        Output::Pager(pager)
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(out) => out.write(buf),
            Output::Pager(pager) => {
                let text = std::str::from_utf8(buf)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                pager.push_str(text).map_err(io::Error::other)?;

                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(out) => out.flush(),
            Output::Pager(_) => Ok(()),
        }
    }
}
