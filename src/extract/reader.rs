//! Asynchronous block extraction - BlockReader.

use std::io::ErrorKind;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::block::Block;
use crate::error::BlockError;

/// Async extractor yielding fixed-size blocks from an [`AsyncRead`] source.
///
/// The async counterpart of [`BlockIter`](crate::BlockIter): sequential,
/// finite, full blocks only, with a stream's trailing partial data
/// discarded. Every block is an owned snapshot, safe to hand to another
/// task.
///
/// The reader itself knows nothing about cancellation; callers that need
/// it race `next_block` against their token.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use blockrs::BlockReader;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), blockrs::BlockError> {
/// let data = vec![1u8; 16 * 3 + 4];
/// let mut reader = BlockReader::new(Cursor::new(data), 16);
///
/// let mut count = 0;
/// while let Some(block) = reader.next_block().await? {
///     assert_eq!(block.len(), 16);
///     count += 1;
/// }
/// assert_eq!(count, 3);
/// # Ok(())
/// # }
/// ```
pub struct BlockReader<R> {
    reader: R,
    block_size: usize,
    offset: u64,
    finished: bool,
}

impl<R: AsyncRead + Unpin> BlockReader<R> {
    /// Creates a new async block reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The source of data to split
    /// * `block_size` - Length of every emitted block, in bytes
    pub fn new(reader: R, block_size: usize) -> Self {
        Self {
            reader,
            block_size,
            offset: 0,
            finished: false,
        }
    }

    /// Reads the next full block, or `None` at end of stream.
    ///
    /// A trailing chunk shorter than the block size terminates the stream
    /// without being emitted. Read failures other than a clean end of
    /// stream are fatal and leave the reader exhausted.
    pub async fn next_block(&mut self) -> Result<Option<Block>, BlockError> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = BytesMut::zeroed(self.block_size);
        let mut filled = 0;
        while filled < self.block_size {
            match self.reader.read(&mut buf[filled..]).await {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(e.into());
                }
            }
        }

        if filled < self.block_size {
            if filled > 0 {
                trace!("discarding trailing partial block ({} bytes)", filled);
            }
            self.finished = true;
            return Ok(None);
        }

        let block = Block::new(buf.freeze(), self.offset);
        self.offset += self.block_size as u64;
        Ok(Some(block))
    }

    /// Returns the offset the next block would start at.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}
