//! Bloom filter configuration and validation
//!
//! # Example
//!
//! ```
//! use nonce_bloom::{BloomConfigBuilder, BloomFilter};
//!
//! // Length and hash count are derived from the constraints
//! let config = BloomConfigBuilder::new()
//!     .capacity(100)
//!     .max_false_positive_rate(0.01)
//!     .build()
//!     .expect("valid config");
//!
//! let filter = BloomFilter::from_config(&config).expect("valid filter");
//! assert_eq!(filter.capacity(), Some(100));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::constraints::{check_compatible, validate_capacity, validate_rate};
use super::filter_core::{validate_hash_count, validate_size};
use super::parameters::{
    allocate_parameters, optimal_hash_count_from_accuracy, optimal_hash_count_from_capacity,
};
use crate::error::ValidationError;

/// Resolved filter configuration
///
/// Every field is concrete except the optional constraints. Use
/// [`BloomConfigBuilder`] to derive missing values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BloomConfig {
    /// Filter length in bytes
    pub size_bytes: usize,
    /// Number of hash functions (1 to 256)
    pub hash_count: usize,
    /// Maximum number of unique entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    /// Maximum false positive rate reachable through inserts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_false_positive_rate: Option<f64>,
}

impl BloomConfig {
    /// Filter length in bits, saturating for lengths `validate` rejects
    pub fn size_bits(&self) -> usize {
        self.size_bytes.saturating_mul(8)
    }

    /// Validate every range rule and, with both constraints present, their
    /// compatibility at this length and hash count
    pub fn validate(&self) -> Result<(), ValidationError> {
        let size_bits = validate_size(self.size_bytes)?;
        validate_hash_count(self.hash_count)?;
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        if let Some(rate) = self.max_false_positive_rate {
            validate_rate(rate)?;
        }
        if let (Some(capacity), Some(rate)) = (self.capacity, self.max_false_positive_rate) {
            check_compatible(size_bits, self.hash_count, capacity, rate)?;
        }
        Ok(())
    }
}

/// Builder for [`BloomConfig`]
///
/// Missing values are derived:
/// - length: allocated from capacity and rate (both required)
/// - hash count: optimal for the capacity, else for the rate
#[derive(Clone, Debug, Default)]
pub struct BloomConfigBuilder {
    size_bytes: Option<usize>,
    hash_count: Option<usize>,
    capacity: Option<usize>,
    max_false_positive_rate: Option<f64>,
}

impl BloomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter length in bytes
    pub fn size_bytes(mut self, bytes: usize) -> Self {
        self.size_bytes = Some(bytes);
        self
    }

    pub fn hash_count(mut self, k: usize) -> Self {
        self.hash_count = Some(k);
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn max_false_positive_rate(mut self, rate: f64) -> Self {
        self.max_false_positive_rate = Some(rate);
        self
    }

    /// Resolve derived values and validate the result
    pub fn build(self) -> Result<BloomConfig, ValidationError> {
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        if let Some(rate) = self.max_false_positive_rate {
            validate_rate(rate)?;
        }

        let (size_bytes, allocated_k) = match (self.size_bytes, self.capacity, self.max_false_positive_rate) {
            (Some(bytes), _, _) => (bytes, None),
            (None, Some(capacity), Some(rate)) => {
                let params = allocate_parameters(capacity, rate)?;
                (params.size_bits / 8, Some(params.hash_count))
            }
            (None, _, _) => return Err(ValidationError::MissingSize),
        };

        let size_bits = size_bytes.saturating_mul(8);
        let hash_count = match (self.hash_count, allocated_k) {
            (Some(k), _) => k,
            (None, Some(k)) => k,
            (None, None) => match (self.capacity, self.max_false_positive_rate) {
                (Some(capacity), _) => optimal_hash_count_from_capacity(size_bits, capacity),
                (None, Some(rate)) => optimal_hash_count_from_accuracy(size_bits, rate),
                (None, None) => return Err(ValidationError::MissingHashCount),
            },
        };

        let config = BloomConfig {
            size_bytes,
            hash_count,
            capacity: self.capacity,
            max_false_positive_rate: self.max_false_positive_rate,
        };
        config.validate()?;
        debug!(?config, "Bloom filter configuration resolved");
        Ok(config)
    }
}
