//! blockrs
//!
//! Block-aligned duplicate detection for byte streams.
//!
//! `blockrs` splits one or more byte streams into fixed-size blocks
//! (16 KiB by default, the BitTorrent v2 merkle-tree piece size), hashes
//! every block with SHA-256, and counts how often identical block content
//! appears within or across the streams. The answer it gives is: "how
//! many same-sized blocks are duplicated, and what fraction of the total
//! do they represent?" That figure estimates the savings of
//! content-addressed deduplication before any merkle structure is built.
//!
//! The crate intentionally:
//! - does NOT manage files or paths
//! - does NOT persist blocks or digests
//! - does NOT build merkle trees
//! - does NOT close or mutate the streams it reads
//!
//! It only does one thing: **streams in → duplicate block counts out**
//!
//! Trailing stream data shorter than one block is never digested, so a
//! stream of `n` bytes always contributes exactly `n / block_size`
//! blocks.
//!
//! # Concurrent scan
//!
//! ```no_run
//! use blockrs::{ScanConfig, Scanner};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), blockrs::BlockError> {
//!     let a = tokio::fs::File::open("a.bin").await?;
//!     let b = tokio::fs::File::open("b.bin").await?;
//!
//!     let scanner = Scanner::new(ScanConfig::default());
//!     let report = scanner
//!         .common_blocks(CancellationToken::new(), vec![a, b], 1024)
//!         .await?;
//!
//!     println!(
//!         "{} of {} blocks duplicated ({:.1}%)",
//!         report.distinct_duplicates(),
//!         report.total_blocks(),
//!         report.redundancy_percent(),
//!     );
//!     for (digest, count) in report.counts() {
//!         println!("{:>4}  {}", count, digest);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Sync, single stream
//!
//! ```no_run
//! use std::fs::File;
//! use blockrs::{ScanConfig, Scanner};
//!
//! fn main() -> Result<(), blockrs::BlockError> {
//!     let file = File::open("data.bin")?;
//!     let scanner = Scanner::new(ScanConfig::default());
//!
//!     for block in scanner.blocks(file) {
//!         let block = block?;
//!         println!("{} -> {}", block.offset(), block.digest());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod config;
mod error;
mod extract;
mod scan;

mod hash; // internal sha-256 impl

//
// Public surface (intentionally tiny)
//

pub use block::{Block, BlockDigest};
pub use config::{DEFAULT_BLOCK_SIZE, ScanConfig};
pub use error::BlockError;
pub use extract::{BlockIter, BlockReader};
pub use scan::{ScanReport, Scanner};
