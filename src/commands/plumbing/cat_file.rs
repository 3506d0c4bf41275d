use crate::areas::repository::Repository;
use crate::artifacts::database::object_store::ObjectStore;
use std::io::Write;

impl Repository {
    pub fn cat_file(&self, revision: &str) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;
        let object = self.database().parse_object(&oid)?;

        self.writer().write_all(&object.display_bytes())?;

        Ok(())
    }
}
