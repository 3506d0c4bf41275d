//! Porcelain commands (user-facing Git operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `commit`: Snapshot the working directory and advance the current branch
//! - `clone`: Fetch a remote repository and check out its default branch

pub mod clone;
pub mod commit;
pub mod init;
