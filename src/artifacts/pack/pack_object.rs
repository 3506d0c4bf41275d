use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use bytes::Bytes;
use derive_new::new;

/// Kind code carried in a pack object header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
    OfsDelta,
    RefDelta,
}

impl PackObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackObjectKind::Commit => "commit",
            PackObjectKind::Tree => "tree",
            PackObjectKind::Blob => "blob",
            PackObjectKind::Tag => "tag",
            PackObjectKind::OfsDelta => "ofs-delta",
            PackObjectKind::RefDelta => "ref-delta",
        }
    }

    /// Object kind stored for this entry, `None` for delta entries
    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            PackObjectKind::Commit => Some(ObjectType::Commit),
            PackObjectKind::Tree => Some(ObjectType::Tree),
            PackObjectKind::Blob => Some(ObjectType::Blob),
            PackObjectKind::Tag => Some(ObjectType::Tag),
            PackObjectKind::OfsDelta | PackObjectKind::RefDelta => None,
        }
    }
}

impl TryFrom<u8> for PackObjectKind {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(PackObjectKind::Commit),
            2 => Ok(PackObjectKind::Tree),
            3 => Ok(PackObjectKind::Blob),
            4 => Ok(PackObjectKind::Tag),
            6 => Ok(PackObjectKind::OfsDelta),
            7 => Ok(PackObjectKind::RefDelta),
            _ => Err(Error::CorruptObject(format!("invalid pack object kind {code}"))),
        }
    }
}

impl std::fmt::Display for PackObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One inflated, non-delta pack entry
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct PackObject {
    pub object_type: ObjectType,
    pub declared_size: u64,
    pub payload: Bytes,
}
