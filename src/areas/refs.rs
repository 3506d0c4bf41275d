//! HEAD and branch references
//!
//! References are text files under `.git` holding either
//! - a 40-character object id followed by a newline (direct reference)
//! - `ref: <name>` for symbolic references, e.g. `ref: refs/heads/main`
//!
//! HEAD is normally symbolic. Writing through it updates the branch it
//! points at, creating that branch on its first commit.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.git`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Longest chain of symbolic references followed before giving up
const MAX_SYMREF_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    SymRef(String),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {path:?}"))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref_match {
            Some(symref_match) => Ok(Some(SymRefOrOid::SymRef(symref_match[1].to_string()))),
            None => Ok(Some(SymRefOrOid::Oid(
                ObjectId::try_parse(content)
                    .with_context(|| format!("invalid ref file at {path:?}"))?,
            ))),
        }
    }
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    /// Object HEAD resolves to, `None` before the first commit
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(HEAD_REF_NAME)
    }

    /// Resolve a ref by its full name (`HEAD`, `refs/heads/main`)
    pub fn read_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let mut name = name.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.ref_path(&name)?)? {
                Some(SymRefOrOid::SymRef(target)) => name = target,
                Some(SymRefOrOid::Oid(oid)) => return Ok(Some(oid)),
                None => return Ok(None),
            }
        }

        anyhow::bail!("symbolic ref chain starting at {name} is too deep")
    }

    /// Name of the ref HEAD finally points at (`HEAD` itself when detached)
    pub fn current_ref(&self) -> anyhow::Result<String> {
        let mut name = HEAD_REF_NAME.to_string();

        for _ in 0..MAX_SYMREF_DEPTH {
            match SymRefOrOid::read_symref_or_oid(&self.ref_path(&name)?)? {
                Some(SymRefOrOid::SymRef(target)) => name = target,
                Some(SymRefOrOid::Oid(_)) | None => return Ok(name),
            }
        }

        anyhow::bail!("symbolic ref chain starting at HEAD is too deep")
    }

    /// Move whatever HEAD points at to `oid`
    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        let target = self.current_ref()?;
        self.update_ref(&target, oid)
    }

    /// Point HEAD at a branch, which need not exist yet
    pub fn set_head_to_branch(&self, branch: &str) -> anyhow::Result<()> {
        let target = format!("{HEADS_PREFIX}{branch}");
        self.ref_path(&target)?;

        self.update_ref_file(&self.head_path(), &format!("ref: {target}\n"))
    }

    pub fn update_ref(&self, name: &str, oid: ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.ref_path(name)?, &format!("{oid}\n"))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {path:?}")
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    /// Path of a ref file, refusing names that would leave `.git`
    fn ref_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        let valid = name == HEAD_REF_NAME
            || (name.starts_with("refs/")
                && name
                    .split('/')
                    .all(|part| !part.is_empty() && part != "." && part != ".."));
        if !valid {
            anyhow::bail!("invalid ref name {name:?}");
        }

        Ok(self.path.join(name))
    }
}
