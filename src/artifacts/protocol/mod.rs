//! Client side of the smart-HTTP upload-pack protocol (v0)
//!
//! - `pkt_line`: length-prefixed line framing
//! - `advertisement`: the ref list a remote answers discovery with
//! - `upload_request`: the want/done request and the envelope around the pack
//! - `transport`: the byte-level HTTP collaborator
//! - `client`: discovery and fetch on top of a transport

pub mod advertisement;
pub mod client;
pub mod pkt_line;
pub mod transport;
pub mod upload_request;

use thiserror::Error;

/// Service every request is addressed to
pub const UPLOAD_PACK_SERVICE: &str = "git-upload-pack";

/// Content type of the fetch request body
pub const UPLOAD_PACK_REQUEST_TYPE: &str = "application/x-git-upload-pack-request";

/// Content type the remote answers a fetch with
pub const UPLOAD_PACK_RESULT_TYPE: &str = "application/x-git-upload-pack-result";

/// Framing and content problems in a remote's response
///
/// The client reports these as `RefDiscoveryFailed` or `FetchFailed`
/// depending on which exchange produced them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid pkt-line length {0:?}")]
    InvalidLength(String),

    #[error("pkt-line declares {expected} bytes but only {available} remain")]
    Truncated { expected: usize, available: usize },

    #[error("malformed ref line {0:?}")]
    MalformedRef(String),

    #[error("expected flush after service announcement")]
    MissingFlush,

    #[error("remote error: {0}")]
    Remote(String),

    #[error("response carries no pack")]
    MissingPack,
}
