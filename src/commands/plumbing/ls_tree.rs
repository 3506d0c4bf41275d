use crate::areas::repository::Repository;
use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::object::{Object, ObjectBox};
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// List a tree, or the tree of a commit
    pub fn ls_tree(&self, revision: &str, name_only: bool) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;

        let tree = match self.database().parse_object(&oid)? {
            ObjectBox::Tree(tree) => *tree,
            ObjectBox::Commit(commit) => self
                .database()
                .parse_object_as_tree(commit.tree_oid())?
                .with_context(|| format!("{} is not a tree", commit.tree_oid()))?,
            other => anyhow::bail!("{oid} is a {}, not a tree", other.object_type()),
        };

        if !name_only {
            write!(self.writer(), "{}", tree.display())?;
            return Ok(());
        }

        for (name, _) in tree.entries() {
            writeln!(self.writer(), "{name}")?;
        }

        Ok(())
    }
}
