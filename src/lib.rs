//! A minimal git: content-addressed object storage, tree and commit
//! encoding, and a smart-HTTP client that clones by decoding packs.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod error;
