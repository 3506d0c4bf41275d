use crate::artifacts::core::codec;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::error::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Encode an object's payload (everything after the loose-object header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decode an object from its payload; the header has already been split off
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        let payload = self.serialize()?;
        Ok(codec::digest_of(self.object_type(), &payload))
    }
}

#[derive(Debug, Clone)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
    Tag(Bytes),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
            ObjectBox::Tag(_) => ObjectType::Tag,
        }
    }

    /// Human-readable form, as printed by `cat-file -p`
    pub fn display_bytes(&self) -> Bytes {
        match self {
            ObjectBox::Blob(blob) => blob.content().clone(),
            ObjectBox::Tree(tree) => Bytes::from(tree.display()),
            ObjectBox::Commit(commit) => Bytes::from(commit.display()),
            ObjectBox::Tag(payload) => payload.clone(),
        }
    }
}
