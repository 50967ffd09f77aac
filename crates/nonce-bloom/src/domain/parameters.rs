//! Rate model: false positive mathematics and parameter selection
//!
//! Formulas:
//! - fpr = (1 - (1 - 1/m)^(n*k))^k          -- false positive rate
//! - k   = (m/n) * ln(2)                     -- optimal hash count for a capacity
//! - k   = ln(fpr) / ln(1/2)                 -- optimal hash count for an accuracy
//! - m   = n * ln(fpr) / (ln(1/2) * ln(2))   -- minimum bits for (capacity, accuracy)
//!
//! Only the allocator can fail. Callers validate that rates lie in (0, 1)
//! and that capacities are at least 1 before calling in.

use std::f64::consts::LN_2;

use super::hash_functions::MAX_HASH_COUNT;
use crate::error::ValidationError;

/// Parameters chosen by the allocator
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter (always a multiple of 8)
    pub size_bits: usize,
    /// Number of hash functions
    pub hash_count: usize,
    /// False positive rate once the filter holds `capacity` entries
    pub expected_fpr: f64,
}

/// False positive rate of an `m_bits` filter holding `n` entries with `k`
/// hash functions.
///
/// Returns exactly 0 when `n == 0`.
pub fn false_positive_rate(m_bits: usize, n: usize, k: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    // ln_1p keeps 1 - 1/m distinguishable from 1 on very long filters
    let all_miss = (n as f64 * k as f64 * (-1.0 / m_bits as f64).ln_1p()).exp();
    (1.0 - all_miss).powf(k as f64)
}

/// Hash count minimising the false positive rate of an `m_bits` filter at
/// `n` entries.
pub fn optimal_hash_count_from_capacity(m_bits: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let k = (LN_2 * m_bits as f64 / n as f64).round() as usize;
    k.clamp(1, MAX_HASH_COUNT)
}

/// Hash count for a target accuracy.
///
/// Substituting the capacity-optimal `n = ln(2) * m / k` into
/// `fpr = (1 - e^(-kn/m))^k` leaves `fpr = (1/2)^k`, independent of the
/// length. More hashes than bits is fine: positions may repeat.
pub fn optimal_hash_count_from_accuracy(_m_bits: usize, target_rate: f64) -> usize {
    let k = (target_rate.ln() / 0.5f64.ln()).round() as usize;
    k.clamp(1, MAX_HASH_COUNT)
}

/// Minimum filter length, in bits, that holds `capacity` entries within
/// `target_rate`.
///
/// Rounded up to a whole byte. Rounding down could let the real rate pass
/// the bound before capacity is reached. Saturates at the largest
/// byte-aligned `usize`.
pub fn required_bit_length(capacity: usize, target_rate: f64) -> usize {
    let bits = capacity as f64 * target_rate.ln() / (0.5f64.ln() * LN_2);
    let bytes = (bits / 8.0).ceil().max(1.0) as usize;
    bytes.min(usize::MAX / 8) * 8
}

/// Size and hash count for a `(capacity, target_rate)` pair.
///
/// The closed form in [`required_bit_length`] comes from the `e^(-kn/m)`
/// approximation and the hash count is rounded, so the exact rate at full
/// capacity can land a hair above the target. The length grows a byte at a
/// time until it does not.
///
/// Fails with [`ValidationError::InvalidSize`] when the length would not
/// fit in a `usize`.
pub fn allocate_parameters(
    capacity: usize,
    target_rate: f64,
) -> Result<BloomFilterParams, ValidationError> {
    let mut size_bits = required_bit_length(capacity, target_rate);
    loop {
        let hash_count = optimal_hash_count_from_capacity(size_bits, capacity);
        let expected_fpr = false_positive_rate(size_bits, capacity, hash_count);
        if expected_fpr <= target_rate {
            return Ok(BloomFilterParams {
                size_bits,
                hash_count,
                expected_fpr,
            });
        }
        size_bits = size_bits
            .checked_add(8)
            .ok_or(ValidationError::InvalidSize)?;
    }
}
