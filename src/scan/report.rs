//! Scan results - ScanReport.

use std::collections::HashMap;
use std::fmt;

use crate::block::BlockDigest;

/// The outcome of a duplicate-block scan.
///
/// Holds the digest counts filtered to content seen more than once, plus
/// the unfiltered total number of full blocks extracted across all
/// streams. The total makes redundancy ratios computable without a second
/// pass.
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
/// let streams = vec![Cursor::new(vec![7u8; 4 * 16])];
/// let report = scanner
///     .common_blocks(CancellationToken::new(), streams, 4)
///     .await?;
///
/// assert_eq!(report.total_blocks(), 4);
/// assert_eq!(report.duplicate_blocks(), 4); // one digest, count 4
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScanReport {
    counts: HashMap<BlockDigest, u32>,
    total_blocks: u64,
}

impl ScanReport {
    /// Creates a report from filtered counts and the unfiltered total.
    pub(crate) fn new(counts: HashMap<BlockDigest, u32>, total_blocks: u64) -> Self {
        Self {
            counts,
            total_blocks,
        }
    }

    /// Occurrence counts for every digest seen more than once.
    pub fn counts(&self) -> &HashMap<BlockDigest, u32> {
        &self.counts
    }

    /// Total number of full blocks extracted, duplicated or not.
    pub fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    /// Number of distinct duplicated digests.
    pub fn distinct_duplicates(&self) -> usize {
        self.counts.len()
    }

    /// Number of block occurrences carrying duplicated content.
    pub fn duplicate_blocks(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Share of duplicated digests in the total block count, in percent:
    /// `100 * distinct_duplicates / total_blocks`.
    pub fn redundancy_percent(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        100.0 * self.counts.len() as f64 / self.total_blocks as f64
    }

    /// Returns true if no duplicated content was found.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Consumes the report and returns the filtered count map.
    pub fn into_counts(self) -> HashMap<BlockDigest, u32> {
        self.counts
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplicated digests of {} blocks ({:.2}%)",
            self.counts.len(),
            self.total_blocks,
            self.redundancy_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha256Hasher;

    fn report_with(counts: &[(&[u8], u32)], total: u64) -> ScanReport {
        let map = counts
            .iter()
            .map(|(data, c)| (Sha256Hasher::hash(data), *c))
            .collect();
        ScanReport::new(map, total)
    }

    #[test]
    fn test_empty_report() {
        let report = report_with(&[], 0);
        assert!(report.is_empty());
        assert_eq!(report.redundancy_percent(), 0.0);
        assert_eq!(report.duplicate_blocks(), 0);
    }

    #[test]
    fn test_counts_and_ratio() {
        let report = report_with(&[(b"a", 5), (b"b", 2)], 10);
        assert_eq!(report.distinct_duplicates(), 2);
        assert_eq!(report.duplicate_blocks(), 7);
        assert!((report.redundancy_percent() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        let report = report_with(&[(b"a", 2)], 4);
        let s = report.to_string();
        assert!(s.contains("1 duplicated digests of 4 blocks"));
    }
}
