//! Configuration for scanning behavior.
//!
//! - [`ScanConfig`] - Controls block size and worker concurrency
//!
//! # Example
//!
//! ```
//! use blockrs::ScanConfig;
//!
//! // Custom block size
//! let config = ScanConfig::new(4096)?;
//!
//! // Deterministic single-reader run with a dedicated hashing pool
//! let config = ScanConfig::default()
//!     .with_max_readers(1)
//!     .with_hash_workers(2);
//!
//! # Ok::<(), blockrs::BlockError>(())
//! ```

use std::num::NonZeroUsize;

use crate::error::BlockError;

/// Default block size (16 KiB), the BitTorrent v2 merkle-tree piece size.
///
/// Digests produced with different block sizes are not comparable.
pub const DEFAULT_BLOCK_SIZE: usize = 16 * 1024;

/// Configuration for block scanning behavior.
///
/// `ScanConfig` controls how streams are split and how much concurrency the
/// scan pipeline uses:
///
/// - `block_size` - Length of every emitted block; trailing data shorter
///   than this is discarded, never digested.
/// - `max_readers` - Upper bound on concurrently active stream readers.
/// - `hash_workers` - Size of the dedicated hashing pool; `0` hashes inline
///   in each reader (the default, avoids a channel hop).
///
/// # Example
///
/// ```
/// use blockrs::ScanConfig;
///
/// // Use default configuration (16 KiB blocks)
/// let config = ScanConfig::default();
///
/// // Custom configuration
/// let config = ScanConfig::new(8192)?;
///
/// // Builder pattern
/// let config = ScanConfig::default()
///     .with_max_readers(4)
///     .with_hash_workers(2);
/// # Ok::<(), blockrs::BlockError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanConfig {
    /// Block size in bytes.
    block_size: usize,

    /// Maximum number of concurrently reading streams.
    max_readers: usize,

    /// Number of dedicated hashing workers (0 = hash inline).
    hash_workers: usize,
}

impl ScanConfig {
    /// Creates a new configuration with the given block size.
    ///
    /// Reader concurrency defaults to the available parallelism of the host
    /// (at least 1), hashing runs inline.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::InvalidConfig`] if `block_size` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use blockrs::ScanConfig;
    ///
    /// let config = ScanConfig::new(4096)?;
    /// assert_eq!(config.block_size(), 4096);
    /// # Ok::<(), blockrs::BlockError>(())
    /// ```
    pub fn new(block_size: usize) -> Result<Self, BlockError> {
        let config = Self {
            block_size,
            max_readers: default_max_readers(),
            hash_workers: 0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the block size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ScanConfig::validate`] to check if the configuration is valid.
    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Sets the maximum number of concurrently reading streams.
    ///
    /// `max_readers = 1` gives a fully deterministic, single-reader run.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ScanConfig::validate`] to check if the configuration is valid.
    pub fn with_max_readers(mut self, readers: usize) -> Self {
        self.max_readers = readers;
        self
    }

    /// Sets the number of dedicated hashing workers.
    ///
    /// With `0` (the default) every reader hashes its own blocks inline.
    /// A non-zero pool is worth it when hashing throughput lags reading
    /// throughput.
    pub fn with_hash_workers(mut self, workers: usize) -> Self {
        self.hash_workers = workers;
        self
    }

    /// Returns the block size in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the maximum number of concurrently reading streams.
    pub fn max_readers(&self) -> usize {
        self.max_readers
    }

    /// Returns the number of dedicated hashing workers.
    pub fn hash_workers(&self) -> usize {
        self.hash_workers
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use blockrs::ScanConfig;
    ///
    /// let config = ScanConfig::default().with_block_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), BlockError> {
        if self.block_size == 0 {
            return Err(BlockError::InvalidConfig {
                message: "block size must be non-zero",
            });
        }
        if self.max_readers == 0 {
            return Err(BlockError::InvalidConfig {
                message: "max_readers must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_readers: default_max_readers(),
            hash_workers: 0,
        }
    }
}

/// Reader concurrency default: available parallelism, at least 1.
///
/// On a single-core host the admission gate degrades to one reader rather
/// than deadlocking.
fn default_max_readers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.block_size(), DEFAULT_BLOCK_SIZE);
        assert!(config.max_readers() >= 1);
        assert_eq!(config.hash_workers(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ScanConfig::default()
            .with_block_size(8192)
            .with_max_readers(4)
            .with_hash_workers(2);

        assert_eq!(config.block_size(), 8192);
        assert_eq!(config.max_readers(), 4);
        assert_eq!(config.hash_workers(), 2);
    }

    #[test]
    fn test_invalid_zero_block_size() {
        assert!(ScanConfig::new(0).is_err());
        assert!(ScanConfig::default().with_block_size(0).validate().is_err());
    }

    #[test]
    fn test_invalid_zero_readers() {
        let config = ScanConfig::default().with_max_readers(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_hash_workers_is_valid() {
        // 0 means inline hashing, not "no hashing"
        let config = ScanConfig::default().with_hash_workers(0);
        assert!(config.validate().is_ok());
    }
}
