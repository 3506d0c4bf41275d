use crate::artifacts::core::codec;
use crate::artifacts::database::object_store::{ObjectStore, RawObject};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use bytes::Bytes;
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const TEMP_OBJECT_PREFIX: &str = "tmp-obj-";

/// Loose object database under `.git/objects`
///
/// Each object lives at `<first-2-hex>/<remaining-38-hex>` and holds the
/// zlib-compressed `"<kind> <len>\0" || payload`.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.path.join(oid.to_path())
    }

    /// Ids of every object in the store, in fan-out order
    pub fn object_ids(&self) -> Result<Vec<ObjectId>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut oids = Vec::new();
        for entry in WalkDir::new(&self.path).min_depth(2).max_depth(2).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let dir = entry.path().parent().and_then(Path::file_name);
            let file = entry.file_name().to_str();
            if let (Some(dir), Some(file)) = (dir.and_then(|d| d.to_str()), file)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir}{file}"))
            {
                oids.push(oid);
            }
        }

        Ok(oids)
    }

    pub fn object_count(&self) -> Result<usize> {
        Ok(self.object_ids()?.len())
    }

    // Write to a temp file in the fan-out directory, then rename it over the
    // final path, so a reader either sees the complete object or nothing.
    fn write_object(&self, object_path: &Path, compressed: &[u8]) -> Result<()> {
        let object_dir = object_path.parent().ok_or_else(|| {
            Error::Io(std::io::Error::other(format!(
                "invalid object path {}",
                object_path.display()
            )))
        })?;
        std::fs::create_dir_all(object_dir)?;

        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let written = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .and_then(|mut file| file.write_all(compressed))
            .and_then(|_| std::fs::rename(&temp_object_path, object_path));

        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(e.into());
        }

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("{TEMP_OBJECT_PREFIX}{}", rand::random::<u32>())
    }
}

impl ObjectStore for Database {
    fn write(&self, kind: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        let oid = codec::digest_of(kind, payload);
        let object_path = self.object_path(&oid);

        // write the object to disk unless it already exists
        if object_path.exists() {
            debug!(%oid, %kind, "object already stored");
            return Ok(oid);
        }

        let compressed = codec::compress(&codec::encode(kind, payload))?;
        self.write_object(&object_path, &compressed)?;
        debug!(%oid, %kind, size = payload.len(), "stored object");

        Ok(oid)
    }

    fn read(&self, oid: &ObjectId) -> Result<RawObject> {
        let object_path = self.object_path(oid);

        let compressed = match std::fs::read(&object_path) {
            Ok(compressed) => compressed,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(oid.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let data: Bytes = codec::decompress(&compressed)?;
        let (kind, payload) = ObjectType::split_header(&data)?;

        Ok(RawObject::new(kind, data.slice_ref(payload)))
    }

    fn exists(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }
}
