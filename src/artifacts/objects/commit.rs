//! Git commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - At most one parent commit ID (none for a root commit)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;
use tracing::debug;

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new author with the current timestamp
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Format complete author info including timestamp
    ///
    /// # Returns
    ///
    /// String in format "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load the author identity from `GIT_AUTHOR_NAME`, `GIT_AUTHOR_EMAIL`
    /// and the optional `GIT_AUTHOR_DATE`
    pub fn load_from_env() -> anyhow::Result<Self> {
        Self::load_identity("AUTHOR")
    }

    /// Load the committer identity, falling back to the author's
    pub fn load_committer_from_env(author: &Author) -> anyhow::Result<Self> {
        if std::env::var("GIT_COMMITTER_NAME").is_ok() {
            Self::load_identity("COMMITTER")
        } else {
            Ok(author.clone())
        }
    }

    fn load_identity(role: &str) -> anyhow::Result<Self> {
        let name_var = format!("GIT_{role}_NAME");
        let email_var = format!("GIT_{role}_EMAIL");
        let date_var = format!("GIT_{role}_DATE");

        let name = std::env::var(&name_var).with_context(|| format!("{name_var} not set"))?;
        let email = std::env::var(&email_var).with_context(|| format!("{email_var} not set"))?;
        let timestamp = std::env::var(&date_var)
            .ok()
            .and_then(|date_str| Self::parse_date(&date_str));

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    fn parse_date(date_str: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        chrono::DateTime::parse_from_rfc2822(date_str)
            .or_else(|_| chrono::DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S %z"))
            .ok()
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::CorruptObject(format!("{reason}: {value:?}"));

        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(invalid("invalid identity line"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| invalid("invalid timestamp"))?;
        let name_email_part = parts[2]; // "name <email>"

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| invalid("missing '<'"))?;
        let email_end = name_email_part
            .rfind('>')
            .filter(|end| *end > email_start)
            .ok_or_else(|| invalid("missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let offset = *chrono::DateTime::parse_from_str(
            &format!("1970-01-01 00:00:00 {timezone}"),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .map_err(|_| invalid("invalid timezone"))?
        .offset();
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| invalid("timestamp out of range"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Git commit object
///
/// Holds a parent list so commits fetched from a remote with several
/// parents still decode, but commits built locally carry at most one.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for initial commit)
    parents: Vec<ObjectId>,
    /// Tree object ID representing the directory snapshot
    tree_oid: ObjectId,
    /// Author who wrote the changes
    author: Author,
    /// Committer who recorded the commit
    committer: Author,
    /// Commit message, always ending in a newline
    message: String,
}

impl Commit {
    /// Create a new commit
    ///
    /// # Arguments
    ///
    /// * `parent` - Parent commit ID (None for initial commit)
    /// * `tree_oid` - Tree object representing the snapshot
    /// * `author` - Author (also used as committer)
    /// * `message` - Commit message; a trailing newline is added if missing
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: impl Into<String>,
    ) -> Self {
        let mut message = message.into();
        if !message.ends_with('\n') {
            message.push('\n');
        }

        Commit {
            parents: parent.into_iter().collect(),
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    pub fn with_committer(mut self, committer: Author) -> Self {
        self.committer = committer;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    fn render(&self) -> String {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}

/// Build a commit and write it to `store`
///
/// The author also signs as committer unless `committer` is given.
pub fn make_commit<S: ObjectStore>(
    store: &S,
    tree_oid: ObjectId,
    parent: Option<ObjectId>,
    message: &str,
    author: Author,
    committer: Option<Author>,
) -> Result<ObjectId> {
    let mut commit = Commit::new(parent, tree_oid, author, message);
    if let Some(committer) = committer {
        commit = commit.with_committer(committer);
    }
    let oid = store.store(&commit)?;
    debug!(%oid, tree = %tree_oid, root = parent.is_none(), "wrote commit");

    Ok(oid)
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Bytes::from(self.render()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| Error::CorruptObject("commit is not UTF-8".into()))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| Error::CorruptObject("commit has no message separator".into()))?;

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            // continuation lines of multi-line headers such as gpgsig
            if line.starts_with(' ') {
                continue;
            }

            match line.split_once(' ') {
                Some(("tree", oid)) => {
                    if tree_oid.replace(ObjectId::try_parse(oid)?).is_some() {
                        return Err(Error::CorruptObject("commit has two tree lines".into()));
                    }
                }
                Some(("parent", oid)) => parents.push(ObjectId::try_parse(oid)?),
                Some(("author", identity)) => author = Some(Author::try_from(identity)?),
                Some(("committer", identity)) => committer = Some(Author::try_from(identity)?),
                _ => {}
            }
        }

        let missing = |field: &str| Error::CorruptObject(format!("commit is missing {field}"));
        let author = author.ok_or_else(|| missing("author"))?;

        Ok(Commit {
            parents,
            tree_oid: tree_oid.ok_or_else(|| missing("tree"))?,
            committer: committer.ok_or_else(|| missing("committer"))?,
            author,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::database::memory_store::MemoryStore;
    use crate::artifacts::objects::object::Object;
    use rstest::{fixture, rstest};

    #[fixture]
    fn author() -> Author {
        let timestamp =
            chrono::DateTime::parse_from_str("2023-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z")
                .unwrap();
        Author::new_with_timestamp("Jane Doe".into(), "jane@example.com".into(), timestamp)
    }

    #[fixture]
    fn tree_oid() -> ObjectId {
        crate::artifacts::core::codec::digest_of(ObjectType::Tree, b"")
    }

    #[rstest]
    fn root_commit_has_no_parent_and_one_blank_line(author: Author, tree_oid: ObjectId) {
        let store = MemoryStore::default();
        let oid = make_commit(&store, tree_oid, None, "init", author, None).unwrap();

        let raw = store.read(&oid).unwrap();
        let text = String::from_utf8(raw.payload.to_vec()).unwrap();

        pretty_assertions::assert_eq!(
            text,
            format!(
                "tree {tree_oid}\n\
                 author Jane Doe <jane@example.com> 1672567200 +0200\n\
                 committer Jane Doe <jane@example.com> 1672567200 +0200\n\
                 \n\
                 init\n"
            )
        );
        assert!(!text.contains("parent"));
        assert_eq!(text.matches("\n\n").count(), 1);
    }

    #[rstest]
    fn commit_with_parent_round_trips(author: Author, tree_oid: ObjectId) {
        let parent = crate::artifacts::core::codec::digest_of(ObjectType::Commit, b"parent");
        let commit = Commit::new(Some(parent), tree_oid, author, "second\n\nbody text");

        let decoded = Commit::deserialize(commit.serialize().unwrap().as_ref()).unwrap();

        pretty_assertions::assert_eq!(decoded, commit);
        assert_eq!(decoded.parent(), Some(&parent));
        assert_eq!(decoded.message(), "second\n\nbody text\n");
    }

    #[rstest]
    fn decodes_extra_headers_and_multiple_parents(author: Author, tree_oid: ObjectId) {
        let text = format!(
            "tree {tree_oid}\nparent {tree_oid}\nparent {tree_oid}\n\
             author {a}\ncommitter {a}\ngpgsig -----BEGIN-----\n abc\n -----END-----\n\nmerge\n",
            a = author.display()
        );

        let decoded = Commit::deserialize(text.as_bytes()).unwrap();
        let reencoded = String::from_utf8(decoded.serialize().unwrap().to_vec()).unwrap();
        assert_eq!(reencoded.matches("\nparent ").count(), 2);
        assert_eq!(decoded.author(), &author);
        assert_eq!(decoded.committer(), &author);
        assert_eq!(decoded.message(), "merge\n");
    }

    #[test]
    fn rejects_commit_without_tree() {
        let text = "author A <a@b> 0 +0000\ncommitter A <a@b> 0 +0000\n\nmsg\n";
        assert!(matches!(
            Commit::deserialize(text.as_bytes()),
            Err(Error::CorruptObject(_))
        ));
    }

    #[rstest]
    fn object_id_is_stable(author: Author, tree_oid: ObjectId) {
        let first = Commit::new(None, tree_oid, author.clone(), "same");
        let second = Commit::new(None, tree_oid, author, "same");

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
    }
}
