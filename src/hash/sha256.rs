//! SHA-256 based block hashing implementation.

use sha2::{Digest, Sha256};

use crate::block::BlockDigest;

/// A hasher that computes SHA-256 digests.
#[derive(Debug, Clone, Default)]
pub struct Sha256Hasher {
    state: Sha256,
}

impl Sha256Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            state: Sha256::new(),
        }
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Finalizes and returns the digest, resetting the hasher.
    pub fn finalize(&mut self) -> BlockDigest {
        BlockDigest::new(self.state.finalize_reset().into())
    }

    /// Convenience method to hash data in one shot.
    pub fn hash(data: &[u8]) -> BlockDigest {
        BlockDigest::new(Sha256::digest(data).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash() {
        let digest = Sha256Hasher::hash(b"hello world");
        assert_eq!(digest.as_bytes().len(), 32);

        // Hash should be deterministic
        let digest2 = Sha256Hasher::hash(b"hello world");
        assert_eq!(digest, digest2);

        // Different data should give different hash
        let digest3 = Sha256Hasher::hash(b"hello world!");
        assert_ne!(digest, digest3);
    }

    #[test]
    fn test_known_vector() {
        // SHA-256 of the empty input
        let digest = Sha256Hasher::hash(b"");
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_incremental_hashing() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        let digest = hasher.finalize();

        // Should match one-shot hashing
        assert_eq!(digest, Sha256Hasher::hash(b"hello world"));
    }

    #[test]
    fn test_finalize_resets() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"some data");
        let _ = hasher.finalize();

        hasher.update(b"hello world");
        let digest = hasher.finalize();
        assert_eq!(digest, Sha256Hasher::hash(b"hello world"));
    }
}
