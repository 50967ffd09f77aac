//! Error types for the Bloom filter engine

use thiserror::Error;

/// Malformed constructor, attachment or configuration arguments.
///
/// Always raised by the call that introduced the bad value; nothing is
/// silently clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("capacity cannot be less than 1")]
    InvalidCapacity,

    #[error("false positive rate must be between 0 and 1 (exclusive), got {rate}")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("hash count must be between 1 and {max}, got {hash_count}", max = crate::domain::MAX_HASH_COUNT)]
    InvalidHashCount { hash_count: usize },

    #[error("filter length must be at least 1 byte and addressable in bits")]
    InvalidSize,

    #[error(
        "false positive rate at full capacity {capacity} would be {projected}, \
         higher than the max false positive rate {max_false_positive_rate}"
    )]
    IncompatibleConstraints {
        capacity: usize,
        max_false_positive_rate: f64,
        projected: f64,
    },

    #[error("filter length must be given unless both capacity and max false positive rate are set")]
    MissingSize,

    #[error("hash count must be given unless capacity or max false positive rate is set")]
    MissingHashCount,

    #[error("invalid hex filter encoding: {0}")]
    InvalidHex(String),
}

/// Errors that can occur while building or mutating a filter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("invalid filter parameters: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to add entry: bloom filter at max capacity {capacity}")]
    CapacityExceeded { capacity: usize },

    #[error(
        "failed to add entry: bloom filter constrained by max false positive rate \
         {max_false_positive_rate}"
    )]
    AccuracyExceeded { max_false_positive_rate: f64 },

    #[error("cannot add constraints to loaded bloom filters")]
    LoadedFilterConstraint,
}

impl FilterError {
    /// Whether this error rejected a single insertion while leaving the
    /// filter fully usable.
    pub fn is_insert_rejection(&self) -> bool {
        matches!(
            self,
            FilterError::CapacityExceeded { .. } | FilterError::AccuracyExceeded { .. }
        )
    }
}
