//! Plumbing commands (low-level Git operations)
//!
//! ## Commands
//!
//! - `cat-file`: Print an object
//! - `hash-object`: Compute a blob id and optionally store the blob
//! - `ls-tree`: List the contents of a tree object
//! - `write-tree`: Snapshot the working directory as a tree
//! - `commit-tree`: Create a commit from a tree
//! - `ls-remote`: List the refs of a remote repository
//! - `unpack-objects`: Store the objects of a pack

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_remote;
pub mod ls_tree;
pub mod unpack_objects;
pub mod write_tree;
