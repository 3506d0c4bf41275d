//! Little-endian base-128 integers with a continuation bit
//!
//! Each byte contributes its low 7 bits, least significant group first, and
//! its high bit says whether another byte follows. Pack object headers
//! reserve the top bits of the first byte for the object kind, so the first
//! byte contributes only `first_bits` bits.

const CONTINUATION_BIT: u8 = 0x80;
const GROUP_MASK: u8 = 0x7f;

/// A decoded integer and the number of bytes it occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Varint {
    pub value: u64,
    pub length: usize,
}

/// Decode a continuation-bit integer from the start of `data`
///
/// Returns `None` when `data` ends before the last byte (high bit clear) or
/// when the value does not fit in 64 bits.
pub fn decode(data: &[u8], first_bits: u32) -> Option<Varint> {
    debug_assert!((1..=7).contains(&first_bits));

    let first = *data.first()?;
    let mut value = u64::from(first & ((1u8 << first_bits) - 1));
    let mut shift = first_bits;
    let mut length = 1;
    let mut byte = first;

    while byte & CONTINUATION_BIT != 0 {
        byte = *data.get(length)?;
        length += 1;

        let group = u64::from(byte & GROUP_MASK);
        if shift >= u64::BITS || (group << shift) >> shift != group {
            return None;
        }
        value |= group << shift;
        shift += 7;
    }

    Some(Varint { value, length })
}

/// Pack object header: kind code in bits 4-6 of the first byte, size in the
/// low 4 bits plus any continuation groups
pub fn decode_object_header(data: &[u8]) -> Option<(u8, Varint)> {
    let kind = (*data.first()? >> 4) & 0b111;
    let size = decode(data, 4)?;

    Some((kind, size))
}
