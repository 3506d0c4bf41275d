//! Git tree object
//!
//! Trees represent directory snapshots in Git. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Ordering
//!
//! Entries are sorted bytewise by name, except that directory names compare
//! as if they ended in `/`. So `banana.txt` (file) sorts before `banana`
//! (directory), because `.` < `/`. The tree keeps its entries keyed by that
//! sort key, which makes the serialized order (and therefore the tree id)
//! a pure function of the entries.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree_serializer::METADATA_DIR;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Git tree object representing a directory snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    /// Entries keyed by their sort key (directory names carry a trailing `/`)
    entries: BTreeMap<String, DatabaseEntry>,
}

impl Tree {
    /// Key an entry is ordered by inside a tree
    pub fn sort_key(name: &str, mode: &EntryMode) -> String {
        if mode.is_tree() {
            format!("{name}/")
        } else {
            name.to_string()
        }
    }

    /// Add an entry, rejecting invalid names and duplicates
    pub fn add_entry(&mut self, name: &str, entry: DatabaseEntry) -> Result<()> {
        Self::validate_name(name)?;

        let file_key = name.to_string();
        let dir_key = format!("{name}/");
        if self.entries.contains_key(&file_key) || self.entries.contains_key(&dir_key) {
            return Err(Error::InvalidTreeEntry(format!("duplicate entry {name:?}")));
        }

        self.entries.insert(Self::sort_key(name, &entry.mode), entry);
        Ok(())
    }

    /// Entries in tree order, with directory names stripped of their sort suffix
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DatabaseEntry)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.trim_end_matches('/'), entry))
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.entries.into_iter().map(|(mut key, entry)| {
            if entry.is_tree() {
                key.pop();
            }
            (key, entry)
        })
    }

    pub fn get(&self, name: &str) -> Option<&DatabaseEntry> {
        self.entries
            .get(name)
            .or_else(|| self.entries.get(&format!("{name}/")))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(Error::InvalidTreeEntry(format!("invalid name {name:?}")));
        }
        if name.contains('/') || name.contains('\0') {
            return Err(Error::InvalidTreeEntry(format!(
                "name {name:?} contains '/' or NUL"
            )));
        }
        // a checkout would write into the repository's own metadata
        if name.eq_ignore_ascii_case(METADATA_DIR) {
            return Err(Error::InvalidTreeEntry(format!("reserved name {name:?}")));
        }

        Ok(())
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for (name, entry) in self.entries() {
            write!(content, "{} {}", entry.mode.as_str(), name)?;
            content.push(0);
            entry.oid.write_raw_to(&mut content)?;
        }

        Ok(content.into())
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut tree = Tree::default();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(Error::CorruptObject("unexpected EOF in tree entry mode".into()));
            }

            let mode = std::str::from_utf8(&mode_bytes)
                .map_err(|_| Error::CorruptObject("tree entry mode is not ASCII".into()))?;
            let mode = EntryMode::from_octal_str(mode)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(Error::CorruptObject("unexpected EOF in tree entry name".into()));
            }
            let name = std::str::from_utf8(&name_bytes)
                .map_err(|_| Error::CorruptObject("tree entry name is not UTF-8".into()))?
                .to_owned();

            let oid = ObjectId::read_raw_from(&mut reader).map_err(|_| {
                Error::CorruptObject(format!("unexpected EOF in object id of {name:?}"))
            })?;

            let key = Tree::sort_key(&name, &mode);
            if let Some((previous, _)) = tree.entries.last_key_value()
                && previous.as_str() >= key.as_str()
            {
                return Err(Error::InvalidTreeOrdering {
                    previous: previous.clone(),
                    current: key,
                });
            }

            tree.add_entry(&name, DatabaseEntry::new(oid, mode))?;
        }

        Ok(tree)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries()
            .map(|(name, entry)| {
                let object_type = match entry.mode {
                    EntryMode::Directory => ObjectType::Tree,
                    EntryMode::Gitlink => ObjectType::Commit,
                    EntryMode::File(_) => ObjectType::Blob,
                };
                format!("{} {} {}\t{}\n", entry.mode, object_type, entry.oid, name)
            })
            .collect()
    }
}
