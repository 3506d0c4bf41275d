use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

pub const COMMIT: u8 = 1;
pub const TREE: u8 = 2;
pub const BLOB: u8 = 3;
pub const OFS_DELTA: u8 = 6;

/// Type and size header of one pack entry
pub fn object_header(kind: u8, size: usize) -> Vec<u8> {
    let mut header = Vec::new();
    let mut byte = (kind << 4) | (size & 0x0f) as u8;
    let mut rest = size >> 4;
    while rest > 0 {
        header.push(byte | 0x80);
        byte = (rest & 0x7f) as u8;
        rest >>= 7;
    }
    header.push(byte);
    header
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("Failed to compress");
    encoder.finish().expect("Failed to finish compression")
}

/// Version 2 pack holding `objects` as undeltified entries
pub fn build_pack(objects: &[(u8, &[u8])]) -> Vec<u8> {
    let mut pack = b"PACK".to_vec();
    pack.extend_from_slice(&2u32.to_be_bytes());
    pack.extend_from_slice(&(objects.len() as u32).to_be_bytes());

    for (kind, payload) in objects {
        pack.extend(object_header(*kind, payload.len()));
        pack.extend(zlib(payload));
    }

    // trailer checksum is not verified
    pack.extend_from_slice(&[0u8; 20]);
    pack
}
