//! Git object identifier (SHA-1 digest)
//!
//! Object IDs are 20-byte SHA-1 digests, shown as 40-character lowercase
//! hexadecimal strings. They uniquely identify all objects (blobs, trees,
//! commits, tags).
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use crate::error::{Error, Result};
use std::io;
use std::path::PathBuf;

/// Git object identifier (SHA-1 hash)
///
/// An opaque 20-byte value. Components hold these instead of references
/// into storage and ask the object store for the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_RAW_LENGTH]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; OBJECT_ID_RAW_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse and validate an object ID from its 40-character hex form
    pub fn try_parse(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::InvalidObjectId(format!(
                "expected {OBJECT_ID_LENGTH} hex digits, got {}: {id:?}",
                id.len()
            )));
        }

        let mut bytes = [0u8; OBJECT_ID_RAW_LENGTH];
        hex::decode_to_slice(id, &mut bytes)
            .map_err(|_| Error::InvalidObjectId(format!("invalid hex digits: {id:?}")))?;

        Ok(Self(bytes))
    }

    /// Build an object ID from a slice that must hold exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; OBJECT_ID_RAW_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidObjectId(format!(
                "expected {OBJECT_ID_RAW_LENGTH} raw bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_RAW_LENGTH] {
        &self.0
    }

    /// Write the object ID in binary format (20 bytes)
    ///
    /// Used when serializing tree entries.
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)
    }

    /// Read an object ID from binary format (20 bytes)
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; OBJECT_ID_RAW_LENGTH];
        reader.read_exact(&mut bytes)?;

        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first byte.
    /// For example, `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> String {
        self.to_hex()[..7].to_string()
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
