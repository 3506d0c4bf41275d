//! Error taxonomy for the object store, tree encoding and transfer client
//!
//! Every condition is recoverable and reported to the caller as its own
//! variant. Command-level code wraps these into `anyhow::Error` and can
//! `downcast_ref::<Error>()` to branch on the condition.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("corrupt object: {0}")]
    CorruptObject(String),

    #[error("bad pack header: {0}")]
    BadPackHeader(String),

    #[error("unsupported delta object ({kind}) at offset {offset}")]
    UnsupportedDeltaObject { kind: &'static str, offset: usize },

    #[error("ref discovery failed for {url}: {reason}")]
    RefDiscoveryFailed { url: String, reason: String },

    #[error("fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("invalid tree ordering: {previous:?} must sort before {current:?}")]
    InvalidTreeOrdering { previous: String, current: String },

    #[error("invalid tree entry: {0}")]
    InvalidTreeEntry(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("tree at {path} is nested deeper than {max_depth} levels")]
    TreeTooDeep { path: String, max_depth: usize },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
