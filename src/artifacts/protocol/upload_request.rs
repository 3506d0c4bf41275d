use crate::artifacts::pack::PACK_SIGNATURE;
use crate::artifacts::protocol::ProtocolError;
use crate::artifacts::protocol::advertisement::AdvertisedRefs;
use crate::artifacts::protocol::pkt_line::{self, PktLine, PktLineReader};
use bytes::{Bytes, BytesMut};
use std::collections::HashSet;
use tracing::debug;

/// Encode a request for every advertised object
///
/// One `want` per distinct id, in advertised order, then a flush and `done`.
/// No capabilities are requested, so the remote answers with a bare pack.
pub fn build_fetch_request(refs: &AdvertisedRefs) -> Bytes {
    let mut request = BytesMut::new();
    let mut wanted = HashSet::new();

    for remote_ref in refs.refs() {
        if wanted.insert(remote_ref.oid) {
            pkt_line::write_data(&mut request, format!("want {}\n", remote_ref.oid).as_bytes());
        }
    }
    pkt_line::write_flush(&mut request);
    pkt_line::write_data(&mut request, b"done\n");

    request.freeze()
}

/// Strip the acknowledgement lines in front of the pack
pub fn unwrap_pack_response(response: &[u8]) -> Result<&[u8], ProtocolError> {
    let mut reader = PktLineReader::new(response);

    loop {
        let rest = reader.remaining();
        if rest.starts_with(PACK_SIGNATURE) {
            return Ok(rest);
        }

        match reader.read_line()? {
            None => return Err(ProtocolError::MissingPack),
            Some(PktLine::Flush) => continue,
            Some(line) => {
                let text = line.text().unwrap_or_default();
                if let Some(message) = text.strip_prefix(b"ERR ") {
                    return Err(ProtocolError::Remote(
                        String::from_utf8_lossy(message).into_owned(),
                    ));
                }
                debug!(line = %String::from_utf8_lossy(text), "skipping response line");
            }
        }
    }
}
