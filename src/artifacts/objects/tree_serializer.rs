//! Snapshot a directory into tree and blob objects
//!
//! The walk is post-order: a directory's tree can only be encoded once every
//! child has an id, so children are written first and the tree last. Nesting
//! is bounded by `max_depth` to keep pathological inputs from exhausting the
//! stack.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Directory holding the repository's own metadata, never snapshotted
pub const METADATA_DIR: &str = ".git";

pub struct TreeSerializer<'s, S: ObjectStore> {
    store: &'s S,
    max_depth: usize,
}

impl<'s, S: ObjectStore> TreeSerializer<'s, S> {
    pub fn new(store: &'s S, max_depth: usize) -> Self {
        TreeSerializer { store, max_depth }
    }

    /// Write `path` to the store and return its id
    ///
    /// A regular file is written as a blob and that blob's id returned. A
    /// directory is written as a tree; empty subdirectories are left out,
    /// but an empty root still yields the empty tree.
    pub fn serialize_tree(&self, path: &Path) -> Result<ObjectId> {
        let metadata = std::fs::symlink_metadata(path)?;

        if metadata.is_dir() {
            match self.serialize_dir(path, 0)? {
                Some(oid) => Ok(oid),
                None => self.store.write(ObjectType::Tree, b""),
            }
        } else {
            let (oid, _) = self.serialize_file(path, &metadata)?;
            Ok(oid)
        }
    }

    fn serialize_dir(&self, dir: &Path, depth: usize) -> Result<Option<ObjectId>> {
        if depth > self.max_depth {
            return Err(Error::TreeTooDeep {
                path: dir.display().to_string(),
                max_depth: self.max_depth,
            });
        }

        let mut tree = Tree::default();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().into_string().map_err(|name| {
                Error::InvalidTreeEntry(format!("{} is not valid UTF-8", name.to_string_lossy()))
            })?;
            if name == METADATA_DIR {
                continue;
            }

            let path = entry.path();
            let metadata = std::fs::symlink_metadata(&path)?;

            if metadata.is_dir() {
                if let Some(oid) = self.serialize_dir(&path, depth + 1)? {
                    tree.add_entry(&name, DatabaseEntry::new(oid, EntryMode::Directory))?;
                }
            } else if metadata.is_file() || metadata.file_type().is_symlink() {
                let (oid, mode) = self.serialize_file(&path, &metadata)?;
                tree.add_entry(&name, DatabaseEntry::new(oid, mode.into()))?;
            } else {
                debug!(path = %path.display(), "skipping special file");
            }
        }

        if tree.is_empty() && depth > 0 {
            debug!(path = %dir.display(), "skipping empty directory");
            return Ok(None);
        }

        let oid = self.store.store(&tree)?;
        debug!(%oid, path = %dir.display(), entries = tree.len(), "wrote tree");

        Ok(Some(oid))
    }

    fn serialize_file(
        &self,
        path: &Path,
        metadata: &std::fs::Metadata,
    ) -> Result<(ObjectId, FileMode)> {
        if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(path)?;
            let oid = self.store.write(ObjectType::Blob, &link_target_bytes(&target))?;
            return Ok((oid, FileMode::Symlink));
        }

        let content = std::fs::read(path)?;
        let oid = self.store.write(ObjectType::Blob, &content)?;
        let mode = if is_executable::is_executable(path) {
            FileMode::Executable
        } else {
            FileMode::Regular
        };

        Ok((oid, mode))
    }
}

#[cfg(unix)]
fn link_target_bytes(target: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    target.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn link_target_bytes(target: &Path) -> Vec<u8> {
    target.to_string_lossy().replace('\\', "/").into_bytes()
}
