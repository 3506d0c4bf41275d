use crate::areas::repository::Repository;
use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use std::io::Write;

impl Repository {
    pub fn hash_object(&self, object_path: &str, write: bool) -> anyhow::Result<()> {
        let object_data = self.workspace().read_file(object_path.as_ref())?;
        let blob = Blob::new(object_data);

        // write (if write is true) as compressed object file
        let object_id = if write {
            self.database().store(&blob)?
        } else {
            blob.object_id()?
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
