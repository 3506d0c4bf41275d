//! Git data structures and algorithms
//!
//! - `core`: digest and compression codec
//! - `database`: the object store trait, the in-memory store, tree entries
//! - `objects`: Git object types (blob, tree, commit) and the tree serializer
//! - `pack`: pack stream decoding
//! - `protocol`: the smart-HTTP upload-pack client

pub mod core;
pub mod database;
pub mod objects;
pub mod pack;
pub mod protocol;
