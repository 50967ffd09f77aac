//! Variable-length Bloom filter
//!
//! INVARIANTS:
//! - No false negatives: once `insert` succeeds, `exists` reports present forever
//! - With both constraints attached, fpr(m, capacity, k) <= max false positive rate
//!
//! The filter length is chosen by the caller in whole bytes, or derived by
//! [`BloomFilter::allocate`] from a capacity and a maximum false positive
//! rate. Filters can be exported as raw bytes and imported elsewhere given
//! the hash count out of band; imported filters do not know how many
//! entries they hold and report [`LOADED_ACCURACY`](crate::LOADED_ACCURACY)
//! as their accuracy.

use std::fmt;

use tracing::debug;

use super::config::BloomConfig;
use super::constraints::{validate_capacity, validate_rate};
use super::filter_core::{validate_size, FilterCore, InsertOutcome, MembershipFilter};
use super::parameters::{
    allocate_parameters, optimal_hash_count_from_accuracy, optimal_hash_count_from_capacity,
};
use crate::error::{FilterError, ValidationError};

/// Bloom filter with a caller-chosen length
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilter {
    core: FilterCore,
}

impl BloomFilter {
    /// Create an unconstrained `len_bytes`-byte filter using `k` hashes
    pub fn with_hash_count(len_bytes: usize, k: usize) -> Result<Self, FilterError> {
        Ok(Self {
            core: FilterCore::new(len_bytes, k)?,
        })
    }

    /// Create a `len_bytes`-byte filter holding at most `capacity` unique
    /// entries, with the hash count optimal for that capacity
    pub fn with_capacity(len_bytes: usize, capacity: usize) -> Result<Self, FilterError> {
        validate_capacity(capacity)?;
        let k = optimal_hash_count_from_capacity(validate_size(len_bytes)?, capacity);
        let mut filter = Self::with_hash_count(len_bytes, k)?;
        filter.add_capacity_constraint(capacity)?;
        Ok(filter)
    }

    /// Create a `len_bytes`-byte filter that refuses entries once its false
    /// positive rate would pass `max_false_positive_rate`
    pub fn with_max_false_positive_rate(
        len_bytes: usize,
        max_false_positive_rate: f64,
    ) -> Result<Self, FilterError> {
        validate_rate(max_false_positive_rate)?;
        let k = optimal_hash_count_from_accuracy(validate_size(len_bytes)?, max_false_positive_rate);
        let mut filter = Self::with_hash_count(len_bytes, k)?;
        filter.add_accuracy_constraint(max_false_positive_rate)?;
        Ok(filter)
    }

    /// Create a `len_bytes`-byte filter with both constraints
    ///
    /// The hash count is optimised for the capacity. Fails when this length
    /// cannot reach the capacity within the rate.
    pub fn with_constraints(
        len_bytes: usize,
        capacity: usize,
        max_false_positive_rate: f64,
    ) -> Result<Self, FilterError> {
        validate_rate(max_false_positive_rate)?;
        let mut filter = Self::with_capacity(len_bytes, capacity)?;
        filter.add_accuracy_constraint(max_false_positive_rate)?;
        Ok(filter)
    }

    /// Allocate the shortest filter that holds `capacity` unique entries
    /// within `max_false_positive_rate`, with both constraints attached
    pub fn allocate(capacity: usize, max_false_positive_rate: f64) -> Result<Self, FilterError> {
        validate_capacity(capacity)?;
        validate_rate(max_false_positive_rate)?;

        let params = allocate_parameters(capacity, max_false_positive_rate)?;
        debug!(
            capacity,
            max_false_positive_rate,
            size_bits = params.size_bits,
            hash_count = params.hash_count,
            expected_fpr = params.expected_fpr,
            "Allocated bloom filter"
        );

        let mut filter = Self::with_hash_count(params.size_bits / 8, params.hash_count)?;
        filter.add_capacity_constraint(capacity)?;
        filter.add_accuracy_constraint(max_false_positive_rate)?;
        Ok(filter)
    }

    /// Create a filter from a validated configuration
    pub fn from_config(config: &BloomConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let mut filter = Self::with_hash_count(config.size_bytes, config.hash_count)?;
        if let Some(capacity) = config.capacity {
            filter.add_capacity_constraint(capacity)?;
        }
        if let Some(rate) = config.max_false_positive_rate {
            filter.add_accuracy_constraint(rate)?;
        }
        Ok(filter)
    }

    /// Load a filter from exported bytes and the hash count used to build it
    ///
    /// The entry count is unknown afterwards: accuracy queries return
    /// [`LOADED_ACCURACY`](crate::LOADED_ACCURACY) and constraints
    /// cannot be attached.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, k: usize) -> Result<Self, FilterError> {
        Ok(Self {
            core: FilterCore::imported(bytes.into(), k)?,
        })
    }

    /// Load a filter from its hex encoding, see [`BloomFilter::from_bytes`]
    pub fn from_hex(encoded: &str, k: usize) -> Result<Self, FilterError> {
        let bytes =
            hex::decode(encoded.trim()).map_err(|e| ValidationError::InvalidHex(e.to_string()))?;
        Self::from_bytes(bytes, k)
    }

    /// Limit the number of unique entries
    pub fn add_capacity_constraint(&mut self, capacity: usize) -> Result<(), FilterError> {
        self.core.add_capacity_constraint(capacity)
    }

    /// Limit the false positive rate reachable through inserts
    pub fn add_accuracy_constraint(
        &mut self,
        max_false_positive_rate: f64,
    ) -> Result<(), FilterError> {
        self.core.add_accuracy_constraint(max_false_positive_rate)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.core.capacity()
    }

    pub fn max_false_positive_rate(&self) -> Option<f64> {
        self.core.max_false_positive_rate()
    }

    /// Whether the filter was imported from raw bytes
    pub fn is_loaded(&self) -> bool {
        self.core.is_loaded()
    }

    /// Number of bits set to 1
    pub fn bits_set(&self) -> usize {
        self.core.bits_set()
    }

    pub fn size_bytes(&self) -> usize {
        self.core.as_bytes().len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.core.as_bytes()
    }

    /// Hex encoding of the exported bytes
    pub fn to_hex(&self) -> String {
        hex::encode(self.core.as_bytes())
    }
}

impl MembershipFilter for BloomFilter {
    fn insert(&mut self, element: impl AsRef<[u8]>) -> Result<InsertOutcome, FilterError> {
        self.core.insert(element.as_ref())
    }

    fn exists(&self, element: impl AsRef<[u8]>) -> (bool, f64) {
        self.core.exists(element.as_ref())
    }

    fn accuracy(&self) -> f64 {
        self.core.accuracy()
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.core.as_bytes().to_vec()
    }

    fn size_bits(&self) -> usize {
        self.core.size_bits()
    }

    fn hash_count(&self) -> usize {
        self.core.hash_count()
    }

    fn entry_count(&self) -> Option<usize> {
        self.core.entry_count()
    }

    fn contains(&self, element: impl AsRef<[u8]>) -> bool {
        self.core.contains(element.as_ref())
    }
}

impl fmt::Display for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.core, f)
    }
}
