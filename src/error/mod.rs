//! Error types for blockrs.

use std::fmt;

/// Errors that can occur during block extraction and scanning.
#[derive(Debug)]
pub enum BlockError {
    /// An I/O error occurred while reading a stream.
    ///
    /// Any read failure other than a clean end-of-stream aborts the
    /// whole scan.
    Io(std::io::Error),

    /// The scan was cancelled.
    ///
    /// Either the caller's [`CancellationToken`] fired, or cancellation
    /// propagated from a sibling worker's fatal error.
    ///
    /// [`CancellationToken`]: tokio_util::sync::CancellationToken
    Cancelled,

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::Io(e) => write!(f, "io error: {}", e),
            BlockError::Cancelled => write!(f, "scan cancelled"),
            BlockError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for BlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlockError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlockError {
    fn from(e: std::io::Error) -> Self {
        BlockError::Io(e)
    }
}
