//! The concurrent extract/hash/aggregate pipeline.
//!
//! One task per stream reads full blocks, gated by a semaphore so at most
//! `max_readers` streams are active at once. Digests fan into a single
//! aggregator task that owns the count map, so counting needs no lock.
//! With `hash_workers > 0` the extractors instead hand block snapshots to
//! a fixed hashing pool sitting between them and the aggregator.
//!
//! Completion signaling is channel sender ownership: every producer holds
//! a clone of the sender and drops it exactly once when it terminates,
//! success or failure. The channel therefore closes exactly once, only
//! after the last producer has permanently stopped sending, and the
//! aggregator drains whatever is still buffered before observing the
//! close. No timers, no polled counters.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::report::ScanReport;
use crate::block::{Block, BlockDigest};
use crate::config::ScanConfig;
use crate::error::BlockError;
use crate::extract::BlockReader;

/// Depth of the bounded hand-off channels.
///
/// Small on purpose: when the consumer lags, producers block on send
/// instead of buffering an unbounded backlog.
const QUEUE_DEPTH: usize = 64;

/// Runs the whole pipeline and returns the filtered report.
///
/// Fails atomically: on any error the partially built counts are thrown
/// away and only the first fatal error is returned.
pub(crate) async fn run<R>(
    config: ScanConfig,
    cancel: CancellationToken,
    streams: Vec<R>,
    blocks_hint: usize,
) -> Result<ScanReport, BlockError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    config.validate()?;

    let (digest_tx, digest_rx) = mpsc::channel(QUEUE_DEPTH);
    let aggregator = tokio::spawn(aggregate(digest_rx, blocks_hint));

    let readers = Arc::new(Semaphore::new(config.max_readers()));
    let mut workers: JoinSet<Result<(), BlockError>> = JoinSet::new();

    if config.hash_workers() == 0 {
        for (index, stream) in streams.into_iter().enumerate() {
            workers.spawn(extract_stream(
                index,
                stream,
                config.block_size(),
                Arc::clone(&readers),
                cancel.clone(),
                BlockSink::Inline(digest_tx.clone()),
            ));
        }
    } else {
        let (block_tx, block_rx) = mpsc::channel(QUEUE_DEPTH);
        let block_rx = Arc::new(Mutex::new(block_rx));
        for worker in 0..config.hash_workers() {
            workers.spawn(hash_worker(
                worker,
                Arc::clone(&block_rx),
                digest_tx.clone(),
                cancel.clone(),
            ));
        }
        for (index, stream) in streams.into_iter().enumerate() {
            workers.spawn(extract_stream(
                index,
                stream,
                config.block_size(),
                Arc::clone(&readers),
                cancel.clone(),
                BlockSink::Queue(block_tx.clone()),
            ));
        }
        // The extractors now hold the only block senders; the block
        // channel closes when the last of them terminates.
    }

    // Same for the digest channel: once this clone is gone, the close
    // happens exactly when the last worker drops its sender.
    drop(digest_tx);

    let mut first_err: Option<BlockError> = None;
    let mut saw_cancelled = false;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(BlockError::Cancelled)) => saw_cancelled = true,
            Ok(Err(err)) => {
                // First fatal error wins; siblings failing as a
                // consequence of the cancellation drain out as Cancelled
                // and are suppressed above.
                if first_err.is_none() {
                    first_err = Some(err);
                }
                cancel.cancel();
            }
            Err(join_err) => {
                if join_err.is_panic() {
                    std::panic::resume_unwind(join_err.into_panic());
                }
                saw_cancelled = true;
            }
        }
    }

    let (mut counts, total_blocks) = match aggregator.await {
        Ok(result) => result,
        Err(join_err) if join_err.is_panic() => {
            std::panic::resume_unwind(join_err.into_panic())
        }
        Err(_) => return Err(BlockError::Cancelled),
    };

    if let Some(err) = first_err {
        return Err(err);
    }
    if saw_cancelled {
        return Err(BlockError::Cancelled);
    }

    // Result filter: keep duplicates only.
    counts.retain(|_, count| *count > 1);
    debug!(
        "scan complete: {} duplicate digests over {} blocks",
        counts.len(),
        total_blocks
    );
    Ok(ScanReport::new(counts, total_blocks))
}

/// Where an extractor hands its output: digests straight to the
/// aggregator (inline hashing), or block snapshots to the hashing pool.
enum BlockSink {
    Inline(mpsc::Sender<BlockDigest>),
    Queue(mpsc::Sender<Block>),
}

impl BlockSink {
    async fn deliver(&self, block: Block, cancel: &CancellationToken) -> Result<(), BlockError> {
        match self {
            BlockSink::Inline(tx) => send_cancellable(tx, block.digest(), cancel).await,
            BlockSink::Queue(tx) => send_cancellable(tx, block, cancel).await,
        }
    }
}

/// Bounded send racing the cancellation token.
///
/// A plain send failure means the receive side already shut down, which
/// only happens during teardown, so it surfaces as a cancellation too.
async fn send_cancellable<T>(
    tx: &mpsc::Sender<T>,
    value: T,
    cancel: &CancellationToken,
) -> Result<(), BlockError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BlockError::Cancelled),
        sent = tx.send(value) => sent.map_err(|_| BlockError::Cancelled),
    }
}

/// Reads one stream to its end, emitting every full block into the sink.
async fn extract_stream<R>(
    index: usize,
    stream: R,
    block_size: usize,
    readers: Arc<Semaphore>,
    cancel: CancellationToken,
    sink: BlockSink,
) -> Result<(), BlockError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    // Admission: one permit per actively reading stream, held until this
    // task exits. The permit drop on every exit path is the paired
    // release.
    let _permit = tokio::select! {
        // An already-fired token must win over a ready permit
        biased;
        _ = cancel.cancelled() => return Err(BlockError::Cancelled),
        permit = readers.acquire_owned() => permit.map_err(|_| BlockError::Cancelled)?,
    };

    let mut blocks = BlockReader::new(stream, block_size);
    let mut emitted = 0u64;
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BlockError::Cancelled),
            next = blocks.next_block() => next?,
        };
        let Some(block) = next else { break };
        sink.deliver(block, &cancel).await?;
        emitted += 1;
    }

    debug!("stream {} drained: {} blocks", index, emitted);
    Ok(())
}

/// Hashing pool worker: pulls block snapshots off the shared queue and
/// forwards their digests.
async fn hash_worker(
    worker: usize,
    blocks: Arc<Mutex<mpsc::Receiver<Block>>>,
    digests: mpsc::Sender<BlockDigest>,
    cancel: CancellationToken,
) -> Result<(), BlockError> {
    loop {
        let next = {
            let mut rx = blocks.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BlockError::Cancelled),
                next = rx.recv() => next,
            }
        };
        let Some(block) = next else { break };
        send_cancellable(&digests, block.digest(), &cancel).await?;
    }

    trace!("hash worker {} finished", worker);
    Ok(())
}

/// Single consumer owning the count map.
///
/// All producers fan into this task, so increments are exact without any
/// locking of the map itself. Runs until the digest channel closes and is
/// fully drained.
async fn aggregate(
    mut digests: mpsc::Receiver<BlockDigest>,
    blocks_hint: usize,
) -> (HashMap<BlockDigest, u32>, u64) {
    let mut counts: HashMap<BlockDigest, u32> = HashMap::with_capacity(blocks_hint);
    let mut total = 0u64;
    while let Some(digest) = digests.recv().await {
        *counts.entry(digest).or_insert(0) += 1;
        total += 1;
    }
    debug!(
        "digest channel closed: {} blocks, {} distinct",
        total,
        counts.len()
    );
    (counts, total)
}
