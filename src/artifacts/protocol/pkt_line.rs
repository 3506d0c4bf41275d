//! Pkt-line framing
//!
//! Every line is prefixed with its total length (prefix included) as four
//! lowercase hex digits. `0000` is the flush packet and carries no payload.

use crate::artifacts::protocol::ProtocolError;
use bytes::{BufMut, BytesMut};

pub const FLUSH_PKT: &[u8; 4] = b"0000";
pub const LENGTH_PREFIX_SIZE: usize = 4;
pub const MAX_PKT_LENGTH: usize = 65520;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PktLine<'a> {
    Flush,
    Data(&'a [u8]),
}

impl<'a> PktLine<'a> {
    /// Payload with a single trailing LF or CRLF removed
    pub fn text(&self) -> Option<&'a [u8]> {
        match self {
            PktLine::Flush => None,
            PktLine::Data(data) => Some(
                data.strip_suffix(b"\r\n")
                    .or_else(|| data.strip_suffix(b"\n"))
                    .unwrap_or(data),
            ),
        }
    }
}

pub fn write_data(buf: &mut BytesMut, payload: &[u8]) {
    buf.reserve(LENGTH_PREFIX_SIZE + payload.len());
    buf.put_slice(format!("{:04x}", LENGTH_PREFIX_SIZE + payload.len()).as_bytes());
    buf.put_slice(payload);
}

pub fn write_flush(buf: &mut BytesMut) {
    buf.put_slice(FLUSH_PKT);
}

/// Reads pkt-lines off the front of a buffer
#[derive(Debug)]
pub struct PktLineReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> PktLineReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        PktLineReader { data, cursor: 0 }
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.cursor..]
    }

    pub fn read_line(&mut self) -> Result<Option<PktLine<'a>>, ProtocolError> {
        let rest = self.remaining();
        if rest.is_empty() {
            return Ok(None);
        }
        if rest.len() < LENGTH_PREFIX_SIZE {
            return Err(ProtocolError::InvalidLength(
                String::from_utf8_lossy(rest).into_owned(),
            ));
        }

        let prefix = &rest[..LENGTH_PREFIX_SIZE];
        // from_str_radix would also take a leading sign
        let length = Some(prefix)
            .filter(|prefix| prefix.iter().all(u8::is_ascii_hexdigit))
            .and_then(|prefix| std::str::from_utf8(prefix).ok())
            .and_then(|prefix| usize::from_str_radix(prefix, 16).ok())
            .ok_or_else(|| {
                ProtocolError::InvalidLength(String::from_utf8_lossy(prefix).into_owned())
            })?;

        match length {
            0 => {
                self.cursor += LENGTH_PREFIX_SIZE;
                Ok(Some(PktLine::Flush))
            }
            // 0001-0003 are v2 delimiters, never valid in v0
            1..LENGTH_PREFIX_SIZE => Err(ProtocolError::InvalidLength(format!("{length:04x}"))),
            _ if length > MAX_PKT_LENGTH => {
                Err(ProtocolError::InvalidLength(format!("{length:04x}")))
            }
            _ if length > rest.len() => Err(ProtocolError::Truncated {
                expected: length - LENGTH_PREFIX_SIZE,
                available: rest.len() - LENGTH_PREFIX_SIZE,
            }),
            _ => {
                self.cursor += length;
                Ok(Some(PktLine::Data(&rest[LENGTH_PREFIX_SIZE..length])))
            }
        }
    }
}

impl<'a> Iterator for PktLineReader<'a> {
    type Item = Result<PktLine<'a>, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => None,
            Err(e) => {
                self.cursor = self.data.len();
                Some(Err(e))
            }
        }
    }
}
