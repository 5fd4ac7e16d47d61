//! Block types.
//!
//! - [`Block`] - Fixed-size, offset-aligned chunk of a stream's bytes
//! - [`BlockDigest`] - 32-byte SHA-256 content fingerprint

mod data;
mod digest;

pub use data::Block;
pub use digest::BlockDigest;
