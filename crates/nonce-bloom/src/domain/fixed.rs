//! Fixed-length Bloom filters
//!
//! Same hashing and constraint model as [`BloomFilter`](super::BloomFilter),
//! with the length fixed by the type. [`Bloom256`] and [`Bloom512`] cover
//! the common sizes.

use std::fmt;

use super::constraints::{validate_capacity, validate_rate};
use super::filter_core::{FilterCore, InsertOutcome, MembershipFilter};
use super::parameters::{optimal_hash_count_from_accuracy, optimal_hash_count_from_capacity};
use crate::error::FilterError;

/// Bloom filter over exactly `BYTES` bytes
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBloomFilter<const BYTES: usize> {
    core: FilterCore,
}

/// 256-bit filter
pub type Bloom256 = FixedBloomFilter<32>;

/// 512-bit filter
pub type Bloom512 = FixedBloomFilter<64>;

impl<const BYTES: usize> FixedBloomFilter<BYTES> {
    /// Length in bits
    pub const SIZE_BITS: usize = BYTES * 8;

    /// Unconstrained filter using `k` hashes
    pub fn with_hash_count(k: usize) -> Result<Self, FilterError> {
        Ok(Self {
            core: FilterCore::new(BYTES, k)?,
        })
    }

    /// Filter holding at most `capacity` unique entries, hash count
    /// optimised for that capacity
    pub fn with_capacity(capacity: usize) -> Result<Self, FilterError> {
        validate_capacity(capacity)?;
        let mut filter =
            Self::with_hash_count(optimal_hash_count_from_capacity(Self::SIZE_BITS, capacity))?;
        filter.core.add_capacity_constraint(capacity)?;
        Ok(filter)
    }

    /// Filter refusing entries that would push its false positive rate past
    /// `max_false_positive_rate`
    pub fn with_max_false_positive_rate(max_false_positive_rate: f64) -> Result<Self, FilterError> {
        validate_rate(max_false_positive_rate)?;
        let mut filter = Self::with_hash_count(optimal_hash_count_from_accuracy(
            Self::SIZE_BITS,
            max_false_positive_rate,
        ))?;
        filter.core.add_accuracy_constraint(max_false_positive_rate)?;
        Ok(filter)
    }

    /// Filter with both constraints; fails when they cannot both hold at
    /// this length
    pub fn with_constraints(
        capacity: usize,
        max_false_positive_rate: f64,
    ) -> Result<Self, FilterError> {
        validate_rate(max_false_positive_rate)?;
        let mut filter = Self::with_capacity(capacity)?;
        filter.core.add_accuracy_constraint(max_false_positive_rate)?;
        Ok(filter)
    }

    pub fn add_capacity_constraint(&mut self, capacity: usize) -> Result<(), FilterError> {
        self.core.add_capacity_constraint(capacity)
    }

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

    pub fn bits_set(&self) -> usize {
        self.core.bits_set()
    }

    /// Exported bytes as a fixed-size array
    pub fn to_array(&self) -> [u8; BYTES] {
        let mut out = [0u8; BYTES];
        out.copy_from_slice(self.core.as_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.core.as_bytes())
    }
}

impl<const BYTES: usize> MembershipFilter for FixedBloomFilter<BYTES> {
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
        Self::SIZE_BITS
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

impl<const BYTES: usize> fmt::Display for FixedBloomFilter<BYTES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.core, f)
    }
}
