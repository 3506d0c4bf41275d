//! Streaming pack decoder
//!
//! The whole pack is one contiguous buffer. The reader walks it with a
//! cursor through these states:
//!
//! ```text
//! ReadHeader -> ReadObjectHeader -> InflateObjectBody -> (repeat) -> Done
//! ```
//!
//! The size in an object header is the inflated length, not the compressed
//! one, so the cursor advances by however many bytes the zlib stream
//! actually occupied. Anything after the last object (the trailer checksum)
//! is left unread.

use crate::artifacts::core::codec;
use crate::artifacts::database::object_store::ObjectStore;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::pack::pack_object::{PackObject, PackObjectKind};
use crate::artifacts::pack::{PACK_HEADER_LENGTH, PACK_SIGNATURE, SUPPORTED_PACK_VERSIONS, varint};
use crate::error::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt};
use tracing::{debug, info};

/// Largest output buffer preallocated from an untrusted declared size
const MAX_PREALLOCATION: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    ReadHeader,
    ReadObjectHeader {
        remaining: u32,
    },
    InflateObjectBody {
        object_type: ObjectType,
        declared_size: u64,
        remaining: u32,
    },
    Done,
}

/// Iterator over the entries of a pack buffer
///
/// Yields each non-delta entry in stream order. After the first error the
/// iterator is exhausted.
#[derive(Debug)]
pub struct PackReader<'a> {
    data: &'a [u8],
    cursor: usize,
    state: DecoderState,
    object_count: Option<u32>,
}

impl<'a> PackReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        PackReader {
            data,
            cursor: 0,
            state: DecoderState::ReadHeader,
            object_count: None,
        }
    }

    /// Object count from the pack header, once the header has been read
    pub fn object_count(&self) -> Option<u32> {
        self.object_count
    }

    /// Bytes after the last object, once every object has been read
    pub fn trailer(&self) -> Option<&'a [u8]> {
        match self.state {
            DecoderState::Done if self.object_count.is_some() => Some(&self.data[self.cursor..]),
            _ => None,
        }
    }

    fn read_header(data: &[u8]) -> Result<u32> {
        if data.len() < PACK_HEADER_LENGTH {
            return Err(Error::BadPackHeader(format!(
                "expected {PACK_HEADER_LENGTH} header bytes, got {}",
                data.len()
            )));
        }
        if &data[..4] != PACK_SIGNATURE {
            return Err(Error::BadPackHeader(format!(
                "invalid signature {:?}",
                String::from_utf8_lossy(&data[..4])
            )));
        }

        let mut fields = &data[4..PACK_HEADER_LENGTH];
        let version = fields.read_u32::<BigEndian>()?;
        if !SUPPORTED_PACK_VERSIONS.contains(&version) {
            return Err(Error::BadPackHeader(format!("unsupported version {version}")));
        }

        Ok(fields.read_u32::<BigEndian>()?)
    }

    fn step(&mut self) -> Result<Option<PackObject>> {
        loop {
            match self.state {
                DecoderState::ReadHeader => {
                    let count = Self::read_header(self.data)?;
                    debug!(objects = count, "read pack header");

                    self.cursor = PACK_HEADER_LENGTH;
                    self.object_count = Some(count);
                    self.state = match count {
                        0 => DecoderState::Done,
                        _ => DecoderState::ReadObjectHeader { remaining: count },
                    };
                }
                DecoderState::ReadObjectHeader { remaining } => {
                    let offset = self.cursor;
                    let rest = &self.data[offset..];
                    let total = self.object_count.unwrap_or(remaining);

                    if rest.is_empty() {
                        return Err(Error::CorruptObject(format!(
                            "pack ended after {} of {total} objects",
                            total - remaining
                        )));
                    }

                    let (code, size) = varint::decode_object_header(rest).ok_or_else(|| {
                        Error::CorruptObject(format!("truncated object header at offset {offset}"))
                    })?;
                    let kind = PackObjectKind::try_from(code)?;
                    self.cursor += size.length;

                    let object_type = kind.object_type().ok_or(Error::UnsupportedDeltaObject {
                        kind: kind.as_str(),
                        offset,
                    })?;

                    self.state = DecoderState::InflateObjectBody {
                        object_type,
                        declared_size: size.value,
                        remaining,
                    };
                }
                DecoderState::InflateObjectBody {
                    object_type,
                    declared_size,
                    remaining,
                } => {
                    let size_hint = usize::try_from(declared_size)
                        .unwrap_or(MAX_PREALLOCATION)
                        .min(MAX_PREALLOCATION);
                    let inflated = codec::decompress_prefix(&self.data[self.cursor..], size_hint)?;

                    if inflated.data.len() as u64 != declared_size {
                        return Err(Error::CorruptObject(format!(
                            "{object_type} at offset {} declares {declared_size} bytes but inflates to {}",
                            self.cursor,
                            inflated.data.len()
                        )));
                    }
                    self.cursor += inflated.consumed;

                    self.state = match remaining {
                        1 => DecoderState::Done,
                        _ => DecoderState::ReadObjectHeader {
                            remaining: remaining - 1,
                        },
                    };

                    return Ok(Some(PackObject::new(
                        object_type,
                        declared_size,
                        inflated.data,
                    )));
                }
                DecoderState::Done => return Ok(None),
            }
        }
    }
}

impl Iterator for PackReader<'_> {
    type Item = Result<PackObject>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Some(object)) => Some(Ok(object)),
            Ok(None) => None,
            Err(e) => {
                self.state = DecoderState::Done;
                self.object_count = None;
                Some(Err(e))
            }
        }
    }
}

/// Decodes a pack buffer and writes every entry to an object store
pub struct PackDecoder<'s, S: ObjectStore> {
    store: &'s S,
}

impl<'s, S: ObjectStore> PackDecoder<'s, S> {
    pub fn new(store: &'s S) -> Self {
        PackDecoder { store }
    }

    /// Write every object of `data` to the store, returning their ids in
    /// stream order
    ///
    /// Fails on the first entry that cannot be decoded. Entries before it
    /// stay written.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<ObjectId>> {
        let mut reader = PackReader::new(data);
        let mut written = Vec::new();

        for object in reader.by_ref() {
            let object = object?;
            let oid = self.store.write(object.object_type, &object.payload)?;
            debug!(%oid, kind = %object.object_type, size = object.declared_size, "unpacked object");
            written.push(oid);
        }

        info!(
            objects = written.len(),
            trailer = reader.trailer().map_or(0, <[u8]>::len),
            "decoded pack"
        );

        Ok(written)
    }
}
