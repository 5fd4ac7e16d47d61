//! The Block type - a fixed-size chunk of a stream.

use std::fmt;

use bytes::Bytes;

use super::BlockDigest;
use crate::hash::Sha256Hasher;

/// A fixed-size, offset-aligned chunk of one stream's bytes.
///
/// Every block emitted by an extractor has exactly the configured block
/// length; trailing stream data shorter than that never becomes a `Block`.
/// The payload is an owned [`Bytes`] snapshot, so a block can safely cross
/// task boundaries without aliasing a reused read buffer.
///
/// # Example
///
/// ```
/// use blockrs::Block;
/// use bytes::Bytes;
///
/// let block = Block::new(Bytes::from(vec![0u8; 16]), 0);
/// assert_eq!(block.len(), 16);
/// assert_eq!(block.offset(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Block {
    /// The block payload.
    data: Bytes,

    /// Byte offset of this block within its stream.
    offset: u64,
}

impl Block {
    /// Creates a new block from a payload and its stream offset.
    pub fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
        }
    }

    /// Returns the length of the block payload.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the block has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the block payload.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the byte offset of this block within its stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Computes the SHA-256 digest of the block payload.
    ///
    /// The digest depends only on the bytes, never on the stream the block
    /// came from or its offset.
    ///
    /// # Example
    ///
    /// ```
    /// use blockrs::Block;
    ///
    /// let a = Block::new(vec![7u8; 32], 0);
    /// let b = Block::new(vec![7u8; 32], 4096);
    /// assert_eq!(a.digest(), b.digest());
    /// ```
    pub fn digest(&self) -> BlockDigest {
        Sha256Hasher::hash(&self.data)
    }

    /// Consumes the block and returns the underlying payload.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl From<Vec<u8>> for Block {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data, 0)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({} bytes @ {})", self.len(), self.offset)
    }
}
