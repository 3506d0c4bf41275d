//! Core utilities and shared types
//!
//! - `codec`: content digests and zlib compression shared by every
//!   object read and write, loose or packed.

pub mod codec;
