//! Object store abstraction
//!
//! - `object_store`: the `ObjectStore` trait every component writes through
//! - `memory_store`: an in-memory store keyed by digest, used in tests
//! - `database_entry`: tree entry records (object id + mode)
//!
//! The filesystem-backed store lives in `areas::database`.

pub mod database_entry;
pub mod memory_store;
pub mod object_store;
