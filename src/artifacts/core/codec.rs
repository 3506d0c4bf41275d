//! Digest and compression codec
//!
//! An object's identity is the SHA-1 of `"<kind> <len>\0" || payload`, and
//! that same byte string is what gets zlib-compressed on disk.
//!
//! [`decompress_prefix`] inflates a single zlib stream that may be followed
//! by unrelated bytes and reports how much input the stream occupied. Pack
//! files concatenate many such streams, and this is how the pack decoder
//! finds the start of the next object without an index.

use crate::artifacts::objects::OBJECT_ID_RAW_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::error::{Error, Result};
use bytes::Bytes;
use flate2::{Decompress, FlushDecompress, Status};
use sha1::{Digest, Sha1};
use std::io::Write;

const MIN_INFLATE_CHUNK: usize = 1024;

/// Result of inflating one zlib stream out of a larger buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflated {
    pub data: Bytes,
    /// Compressed bytes the stream occupied, trailer checksum included
    pub consumed: usize,
}

/// Compute the object ID of `payload` stored as `kind`
pub fn digest_of(kind: ObjectType, payload: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(kind.header(payload.len()));
    hasher.update(payload);

    let mut digest = [0u8; OBJECT_ID_RAW_LENGTH];
    digest.copy_from_slice(&hasher.finalize());
    ObjectId::from_bytes(digest)
}

/// Header-prefixed loose object bytes, as hashed and stored
pub fn encode(kind: ObjectType, payload: &[u8]) -> Bytes {
    let mut data = kind.header(payload.len());
    data.extend_from_slice(payload);

    Bytes::from(data)
}

pub fn compress(data: &[u8]) -> Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;

    Ok(encoder.finish()?.into())
}

/// Inflate a buffer that holds exactly one zlib stream
pub fn decompress(data: &[u8]) -> Result<Bytes> {
    let inflated = decompress_prefix(data, data.len())?;

    if inflated.consumed != data.len() {
        return Err(Error::CorruptObject(format!(
            "{} unexpected bytes after compressed stream",
            data.len() - inflated.consumed
        )));
    }

    Ok(inflated.data)
}

/// Inflate the zlib stream at the start of `input`
///
/// `size_hint` only pre-sizes the output buffer. Input that ends before the
/// stream is complete fails with `CorruptObject` instead of returning the
/// bytes inflated so far.
pub fn decompress_prefix(input: &[u8], size_hint: usize) -> Result<Inflated> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(size_hint.max(MIN_INFLATE_CHUNK));

    loop {
        if output.len() == output.capacity() {
            output.reserve(output.capacity().max(MIN_INFLATE_CHUNK));
        }

        let (before_in, before_out) = (inflater.total_in(), inflater.total_out());
        let consumed = before_in as usize;

        let status = inflater
            .decompress_vec(&input[consumed..], &mut output, FlushDecompress::None)
            .map_err(|e| Error::CorruptObject(format!("invalid zlib stream: {e}")))?;

        match status {
            Status::StreamEnd => {
                return Ok(Inflated {
                    data: output.into(),
                    consumed: inflater.total_in() as usize,
                });
            }
            Status::Ok | Status::BufError => {
                let stalled =
                    inflater.total_in() == before_in && inflater.total_out() == before_out;
                if stalled && output.len() < output.capacity() {
                    return Err(Error::CorruptObject(format!(
                        "zlib stream truncated after {} input bytes",
                        inflater.total_in()
                    )));
                }
            }
        }
    }
}
