use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree_serializer::TreeSerializer;
use std::io::Write;

impl Repository {
    pub fn write_tree(&self) -> anyhow::Result<()> {
        let tree_oid = self.snapshot_workspace()?;

        writeln!(self.writer(), "{tree_oid}")?;

        Ok(())
    }

    /// Store the working directory as a tree and return its id
    pub(crate) fn snapshot_workspace(&self) -> anyhow::Result<ObjectId> {
        let serializer = TreeSerializer::new(self.database(), self.config().max_tree_depth);

        Ok(serializer.serialize_tree(self.workspace().path())?)
    }
}
