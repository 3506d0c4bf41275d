//! Stateful on-disk areas of a repository
//!
//! - `database`: loose object store under `.git/objects`
//! - `refs`: HEAD and branch references
//! - `repository`: wires the areas together for the commands
//! - `workspace`: working directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
