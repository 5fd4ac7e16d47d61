//! Block extraction from byte streams.
//!
//! Both extractors produce only full, block-size-aligned blocks; trailing
//! stream data shorter than one block is silently discarded.
//!
//! - [`BlockIter`] - Iterator over blocks of a [`std::io::Read`] source
//! - [`BlockReader`] - Async extractor over a [`tokio::io::AsyncRead`] source

mod iter;
mod reader;

pub use iter::BlockIter;
pub use reader::BlockReader;
