use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Build the loose-object header `"<kind> <byte-length>\0"`
    pub fn header(&self, payload_len: usize) -> Vec<u8> {
        format!("{} {}\0", self.as_str(), payload_len).into_bytes()
    }

    /// Split a decompressed loose object into its kind and payload
    ///
    /// The declared length must match the payload length exactly, so a
    /// partially written object never reads back as a shorter one.
    pub fn split_header(data: &[u8]) -> Result<(ObjectType, &[u8])> {
        let nul = data
            .iter()
            .position(|byte| *byte == b'\0')
            .ok_or_else(|| Error::CorruptObject("missing NUL after object header".into()))?;
        let (header, payload) = (&data[..nul], &data[nul + 1..]);

        let header = std::str::from_utf8(header)
            .map_err(|_| Error::CorruptObject("object header is not ASCII".into()))?;
        let (kind, size) = header
            .split_once(' ')
            .ok_or_else(|| Error::CorruptObject(format!("malformed object header {header:?}")))?;

        let kind = ObjectType::try_from(kind)?;
        let size = size
            .parse::<usize>()
            .map_err(|_| Error::CorruptObject(format!("invalid object size {size:?}")))?;

        if size != payload.len() {
            return Err(Error::CorruptObject(format!(
                "{kind} declares {size} bytes but holds {}",
                payload.len()
            )));
        }

        Ok((kind, payload))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            "tag" => Ok(ObjectType::Tag),
            _ => Err(Error::CorruptObject(format!("invalid object type {value:?}"))),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
