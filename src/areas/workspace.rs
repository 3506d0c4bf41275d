use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::Error;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Working directory of a repository
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a file given relative to the workspace (or absolute)
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {file_path:?}"))?;

        Ok(content.into())
    }

    /// Write the contents of a tree into the workspace, returning how many
    /// files were created
    ///
    /// Existing files with the same names are overwritten; nothing is
    /// removed.
    pub fn checkout_tree<S: ObjectStore>(
        &self,
        store: &S,
        tree_oid: &ObjectId,
        max_depth: usize,
    ) -> anyhow::Result<usize> {
        self.checkout_dir(store, tree_oid, &self.path, 0, max_depth)
    }

    fn checkout_dir<S: ObjectStore>(
        &self,
        store: &S,
        tree_oid: &ObjectId,
        dir_path: &Path,
        depth: usize,
        max_depth: usize,
    ) -> anyhow::Result<usize> {
        if depth > max_depth {
            return Err(Error::TreeTooDeep {
                path: dir_path.display().to_string(),
                max_depth,
            }
            .into());
        }

        let tree = store
            .parse_object_as_tree(tree_oid)?
            .with_context(|| format!("{tree_oid} is not a tree"))?;
        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {dir_path:?}"))?;

        let mut written = 0;
        for (name, entry) in tree.entries() {
            let path = dir_path.join(name);

            match entry.mode {
                EntryMode::Directory => {
                    written += self.checkout_dir(store, &entry.oid, &path, depth + 1, max_depth)?;
                }
                // submodules are not fetched; git leaves an empty directory
                EntryMode::Gitlink => {
                    std::fs::create_dir_all(&path)
                        .with_context(|| format!("Failed to create directory: {path:?}"))?;
                }
                EntryMode::File(mode) => {
                    let blob = store.read(&entry.oid)?;
                    Self::write_file(&path, &blob.payload, mode)?;
                    debug!(oid = %entry.oid, path = %path.display(), "checked out file");
                    written += 1;
                }
            }
        }

        Ok(written)
    }

    fn write_file(path: &Path, data: &[u8], mode: FileMode) -> anyhow::Result<()> {
        if path.symlink_metadata().is_ok() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove file: {path:?}"))?;
        }

        #[cfg(unix)]
        if mode == FileMode::Symlink {
            use std::os::unix::ffi::OsStrExt;
            let target = std::ffi::OsStr::from_bytes(data);
            std::os::unix::fs::symlink(target, path)
                .with_context(|| format!("Failed to create symlink: {path:?}"))?;
            return Ok(());
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open file: {path:?}"))?;
        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {path:?}"))?;

        // update file mode if necessary
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = match mode {
                FileMode::Executable => 0o755,
                _ => 0o644,
            };
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(permissions))
                .with_context(|| format!("Failed to set permissions for file: {path:?}"))?;
        }

        Ok(())
    }
}
