//! Strong hash implementation for block identity.
//!
//! This module computes content fingerprints of blocks using SHA-256, the
//! hash BitTorrent v2 uses over its 16 KiB pieces.
//!
//! - [`Sha256Hasher`] - SHA-256 hash implementation

mod sha256;

pub use sha256::Sha256Hasher;
