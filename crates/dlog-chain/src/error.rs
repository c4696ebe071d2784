//! Error types for chain operations.

use dlog_store::StoreError;
use thiserror::Error;

use crate::segment::Rank;

/// Errors raised by the chain.
///
/// `EmptySegment`, `IndexOutOfRange`, `CapacityExceeded` and `UnexpectedRank`
/// mean the chain code or the stored chain is broken; callers should not
/// retry them. `Store` errors pass through unchanged and a whole mutation can
/// be retried safely, since nothing is published until it succeeds.
#[derive(Debug, Error)]
pub enum ChainError {
    /// `pop_oldest` on a segment with no items.
    #[error("cannot pop from an empty segment")]
    EmptySegment,

    /// Index-based edit outside the segment.
    #[error("index {index} out of range for segment of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    /// A segment about to be persisted holds more than `L` items.
    #[error("segment of {len} items exceeds capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    /// A segment's rank does not fit its position in the chain.
    #[error("unexpected segment rank {found}: {reason}")]
    UnexpectedRank { found: Rank, reason: String },

    /// The chain configuration is unusable.
    #[error("invalid chain configuration: {0}")]
    InvalidConfig(String),

    /// Object store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for chain operations.
pub type ChainResult<T> = std::result::Result<T, ChainError>;
