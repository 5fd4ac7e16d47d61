//! Scanner - the high-level scanning API.

use std::io::Read;

use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use super::pipeline;
use super::report::ScanReport;
use crate::config::ScanConfig;
use crate::error::BlockError;
use crate::extract::BlockIter;

/// Splits byte streams into fixed-size blocks and counts duplicate content.
///
/// `Scanner` holds a [`ScanConfig`] and offers two ways in:
///
/// - [`Scanner::blocks`] - a plain iterator over one synchronous stream
/// - [`Scanner::common_blocks`] - the concurrent multi-stream scan
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use blockrs::{ScanConfig, Scanner};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), blockrs::BlockError> {
/// let scanner = Scanner::new(ScanConfig::new(16)?);
///
/// // Two streams made of the same 16-byte block, five times each
/// let streams = vec![
///     Cursor::new(vec![0u8; 5 * 16]),
///     Cursor::new(vec![0u8; 5 * 16]),
/// ];
///
/// let report = scanner
///     .common_blocks(CancellationToken::new(), streams, 10)
///     .await?;
///
/// assert_eq!(report.total_blocks(), 10);
/// assert_eq!(report.counts().len(), 1);
/// assert_eq!(report.counts().values().copied().sum::<u32>(), 10);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Creates a new scanner with the given configuration.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Returns the scanner's configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Creates a block iterator over a single synchronous stream.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use blockrs::{ScanConfig, Scanner};
    ///
    /// let scanner = Scanner::new(ScanConfig::new(16)?);
    /// let blocks: Vec<_> = scanner
    ///     .blocks(Cursor::new(vec![0u8; 40]))
    ///     .collect::<Result<_, _>>()?;
    ///
    /// assert_eq!(blocks.len(), 2); // the 8-byte tail is discarded
    /// # Ok::<(), blockrs::BlockError>(())
    /// ```
    pub fn blocks<R: Read>(&self, reader: R) -> BlockIter<R> {
        BlockIter::new(reader, self.config.block_size())
    }

    /// Scans all streams concurrently and reports block content shared by
    /// two or more blocks, within or across streams.
    ///
    /// Every stream is read sequentially to its end; only full
    /// `block_size` chunks are digested, trailing partial data is
    /// discarded. `blocks_hint` pre-sizes the count map (an estimate such
    /// as `total_bytes / block_size` is fine; it does not bound the scan).
    ///
    /// The returned [`ScanReport`] keeps only digests seen more than once,
    /// alongside the unfiltered total block count. Results are
    /// deterministic for identical inputs, regardless of scheduling.
    ///
    /// # Cancellation
    ///
    /// Cancelling `cancel` makes every worker stop at its next suspension
    /// point and the call return [`BlockError::Cancelled`]. A deadline is
    /// a token cancelled by a timer, or `tokio::time::timeout` around this
    /// future; either is honored at every blocking point. The first fatal
    /// read error cancels the token internally, so one failing stream
    /// promptly stops all others; the call returns that first error and no
    /// partial counts.
    ///
    /// Streams are only ever read, never closed; dropping them stays the
    /// caller's job.
    pub async fn common_blocks<R>(
        &self,
        cancel: CancellationToken,
        streams: Vec<R>,
        blocks_hint: usize,
    ) -> Result<ScanReport, BlockError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        pipeline::run(self.config, cancel, streams, blocks_hint).await
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}
