use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::Result;
use bytes::Bytes;
use derive_new::new;

/// An object as read back from a store: its kind and header-less payload
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RawObject {
    pub kind: ObjectType,
    pub payload: Bytes,
}

/// Content-addressed object storage
///
/// Writes are idempotent: storing the same `(kind, payload)` twice keeps a
/// single copy and returns the same id. Implementations hide where and how
/// the compressed bytes live.
pub trait ObjectStore {
    fn write(&self, kind: ObjectType, payload: &[u8]) -> Result<ObjectId>;

    /// Fails with `ObjectNotFound` for unknown ids and `CorruptObject` for
    /// stored bytes that do not decompress into a well-formed object
    fn read(&self, oid: &ObjectId) -> Result<RawObject>;

    fn exists(&self, oid: &ObjectId) -> bool;

    fn store(&self, object: &impl Object) -> Result<ObjectId>
    where
        Self: Sized,
    {
        self.write(object.object_type(), &object.serialize()?)
    }

    fn parse_object(&self, oid: &ObjectId) -> Result<ObjectBox> {
        let RawObject { kind, payload } = self.read(oid)?;

        Ok(match kind {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(payload.as_ref())?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(payload.as_ref())?)),
            ObjectType::Commit => {
                ObjectBox::Commit(Box::new(Commit::deserialize(payload.as_ref())?))
            }
            ObjectType::Tag => ObjectBox::Tag(payload),
        })
    }

    fn parse_object_as_tree(&self, oid: &ObjectId) -> Result<Option<Tree>> {
        let RawObject { kind, payload } = self.read(oid)?;

        match kind {
            ObjectType::Tree => Ok(Some(Tree::deserialize(payload.as_ref())?)),
            _ => Ok(None),
        }
    }

    fn parse_object_as_commit(&self, oid: &ObjectId) -> Result<Option<Commit>> {
        let RawObject { kind, payload } = self.read(oid)?;

        match kind {
            ObjectType::Commit => Ok(Some(Commit::deserialize(payload.as_ref())?)),
            _ => Ok(None),
        }
    }
}
