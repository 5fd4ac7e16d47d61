//! Synchronous block extraction - BlockIter.

use std::io::{ErrorKind, Read};

use bytes::Bytes;
use tracing::trace;

use crate::block::Block;
use crate::error::BlockError;

/// An iterator that yields fixed-size blocks from a reader.
///
/// `BlockIter` reads sequentially from a [`std::io::Read`] source and
/// yields exactly `block_size`-byte blocks. The final bytes of a stream
/// whose length is not a multiple of `block_size` are discarded, so
/// iteration over a stream of `n` bytes yields exactly
/// `n / block_size` blocks.
///
/// The iterator is lazy, finite, and not restartable; after the first
/// `None` (or error) it stays exhausted.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use blockrs::BlockIter;
///
/// // 2 full blocks plus a 5-byte tail that never becomes a block
/// let data = vec![0u8; 2 * 16 + 5];
/// let blocks: Vec<_> = BlockIter::new(Cursor::new(data), 16)
///     .collect::<Result<_, _>>()?;
///
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[1].offset(), 16);
/// # Ok::<(), blockrs::BlockError>(())
/// ```
pub struct BlockIter<R> {
    reader: R,
    block_size: usize,
    offset: u64,
    finished: bool,
}

impl<R: Read> BlockIter<R> {
    /// Creates a new block iterator.
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

    /// Reads until the buffer is full or the stream ends.
    ///
    /// Returns the number of bytes read; anything short of the buffer
    /// length means end of stream. `Interrupted` reads are retried.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, BlockError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for BlockIter<R> {
    type Item = Result<Block, BlockError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // Fresh buffer per block: the emitted Bytes must never alias a
        // buffer a later read will overwrite.
        let mut buf = vec![0u8; self.block_size];
        let filled = match self.fill(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        if filled < self.block_size {
            if filled > 0 {
                trace!("discarding trailing partial block ({} bytes)", filled);
            }
            self.finished = true;
            return None;
        }

        let block = Block::new(Bytes::from(buf), self.offset);
        self.offset += self.block_size as u64;
        Some(Ok(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_input() {
        let mut iter = BlockIter::new(Cursor::new(Vec::new()), 16);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_exact_multiple() {
        let data = vec![0xAAu8; 4 * 16];
        let blocks: Vec<_> = BlockIter::new(Cursor::new(data), 16)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 4);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.len(), 16);
            assert_eq!(block.offset(), (i * 16) as u64);
        }
    }

    #[test]
    fn test_trailing_partial_discarded() {
        let data = vec![0xAAu8; 3 * 16 + 7];
        let blocks: Vec<_> = BlockIter::new(Cursor::new(data), 16)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_input_shorter_than_one_block() {
        let data = vec![0xAAu8; 15];
        let mut iter = BlockIter::new(Cursor::new(data), 16);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_exhausted_after_none() {
        let data = vec![0u8; 16];
        let mut iter = BlockIter::new(Cursor::new(data), 16);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    /// Reader that hands out data one byte at a time, exercising the
    /// short-read assembly path.
    struct TrickleReader {
        data: Vec<u8>,
        pos: usize,
    }

    impl Read for TrickleReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_short_reads_assemble_full_blocks() {
        let reader = TrickleReader {
            data: (0..40u8).collect(),
            pos: 0,
        };
        let blocks: Vec<_> = BlockIter::new(reader, 16)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].data().as_ref(), &(0..16u8).collect::<Vec<_>>()[..]);
    }

    /// Reader that fails with Interrupted before every successful read.
    struct InterruptingReader {
        inner: Cursor<Vec<u8>>,
        interrupt_next: bool,
    }

    impl Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(std::io::Error::new(ErrorKind::Interrupted, "signal"));
            }
            self.interrupt_next = true;
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let reader = InterruptingReader {
            inner: Cursor::new(vec![0x55u8; 2 * 16]),
            interrupt_next: true,
        };
        let blocks: Vec<_> = BlockIter::new(reader, 16)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 2);
    }

    /// Reader that yields some data, then a hard error.
    struct FailingReader {
        remaining: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::other("disk on fire"));
            }
            let n = self.remaining.min(buf.len());
            buf[..n].fill(0xCC);
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn test_read_error_is_fatal() {
        let reader = FailingReader { remaining: 16 };
        let results: Vec<_> = BlockIter::new(reader, 16).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(BlockError::Io(_))));
    }
}
