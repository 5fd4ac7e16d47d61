//! Concurrent duplicate-block scanning.
//!
//! - [`Scanner`] - Entry point: splits streams into blocks and counts
//!   duplicate content
//! - [`ScanReport`] - Duplicate digest counts plus the total block count

mod engine;
mod pipeline;
mod report;

pub use engine::Scanner;
pub use report::ScanReport;
