//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit
//! - `checkout`: Restore staged paths into the working tree
//! - `log`: Show commit history
//! - `branch`: Create a branch at the current tip
//! - `merge`: Fast-forward merge

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
