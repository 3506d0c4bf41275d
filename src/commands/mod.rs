//! Command implementations
//!
//! - `plumbing`: low-level commands over objects, trees and packs
//!   (cat-file, hash-object, ls-tree, write-tree, commit-tree, ls-remote,
//!   unpack-objects)
//! - `porcelain`: user-facing workflows composed from them (init, commit,
//!   clone)
//!
//! Each command is an `impl Repository` block writing its console output to
//! the repository's writer.

pub mod plumbing;
pub mod porcelain;
