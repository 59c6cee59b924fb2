//! Error types for CID estimation.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the suffix-array / LCP construction stage.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The sequence does not fit the 32-bit index type used by the arrays.
    #[error("sequence of {len} symbols exceeds the maximum of {max}")]
    TooLong { len: usize, max: usize },

    /// An intermediate array could not be allocated.
    #[error("failed to allocate {bytes} bytes for an intermediate array")]
    Allocation { bytes: usize },

    /// A suffix array (or something derived from it) is malformed.
    #[error("invariant violation: {detail}")]
    InvariantViolation { detail: String },
}

/// Error variants surfaced by the CID pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The input cannot be analysed at all (e.g. it is empty).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },

    /// Suffix-array or LCP construction failed.
    #[error("construction failed: {0}")]
    Construction(#[from] ConstructionError),

    /// A file held fewer bytes than required.
    #[error("short read from {}: expected {expected} bytes, read {read}", .path.display())]
    ShortRead {
        path: PathBuf,
        expected: usize,
        read: usize,
    },

    /// A file could not be opened or read.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn empty_sequence() -> Self {
        Error::InvalidInput {
            reason: "sequence is empty",
        }
    }

    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        Error::Construction(ConstructionError::InvariantViolation {
            detail: detail.into(),
        })
    }
}

/// A specialized Result type for CID operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Allocates a zeroed `u32` buffer, failing instead of aborting when memory is exhausted.
pub(crate) fn try_alloc_u32(len: usize) -> Result<Vec<u32>> {
    let bytes = len.saturating_mul(std::mem::size_of::<u32>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ConstructionError::Allocation { bytes })?;
    buf.resize(len, 0);
    Ok(buf)
}
