//! Pack stream decoding
//!
//! A pack is the binary stream a remote answers a fetch with:
//!
//! ```text
//! "PACK" | version (u32 BE) | object count (u32 BE)
//! count x ( variable-length object header | zlib-compressed body )
//! trailer checksum (20 bytes)
//! ```
//!
//! - `varint`: the continuation-bit integer routine used by object headers
//! - `pack_object`: pack entry kinds and decoded entries
//! - `decoder`: the streaming decoder that writes entries to an object store

pub mod decoder;
pub mod pack_object;
pub mod varint;

/// Magic tag every pack stream starts with
pub const PACK_SIGNATURE: &[u8; 4] = b"PACK";

/// Length of the fixed pack header (magic, version, object count)
pub const PACK_HEADER_LENGTH: usize = 12;

/// Pack versions this decoder understands
pub const SUPPORTED_PACK_VERSIONS: [u32; 2] = [2, 3];
