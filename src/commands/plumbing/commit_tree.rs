use crate::areas::repository::Repository;
use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::commit::{Author, make_commit};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::io::Write;

impl Repository {
    pub fn commit_tree(
        &self,
        tree: &str,
        parent: Option<&str>,
        message: &str,
    ) -> anyhow::Result<()> {
        let tree_oid = self.resolve_revision(tree)?;
        let parent = parent
            .map(|parent| self.resolve_revision(parent))
            .transpose()?;

        let commit_oid = self.write_commit(tree_oid, parent, message)?;
        writeln!(self.writer(), "{commit_oid}")?;

        Ok(())
    }

    /// Write a commit of `tree_oid` signed with the identity from the
    /// environment
    pub(crate) fn write_commit(
        &self,
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        message: &str,
    ) -> anyhow::Result<ObjectId> {
        self.database()
            .parse_object_as_tree(&tree_oid)?
            .with_context(|| format!("{tree_oid} is not a tree"))?;
        if let Some(parent) = parent {
            self.database()
                .parse_object_as_commit(&parent)?
                .with_context(|| format!("{parent} is not a commit"))?;
        }

        let author = Author::load_from_env()?;
        let committer = Author::load_committer_from_env(&author)?;

        Ok(make_commit(
            self.database(),
            tree_oid,
            parent,
            message,
            author,
            Some(committer),
        )?)
    }
}
