//! Capacity and accuracy constraints
//!
//! A filter may carry a maximum number of unique entries, a maximum false
//! positive rate, or both. When both are present the rate at full capacity
//! must stay within the bound; this is checked whenever either one is
//! attached.

use tracing::debug;

use super::parameters::false_positive_rate;
use crate::error::{FilterError, ValidationError};

/// Reject capacities below 1
pub fn validate_capacity(capacity: usize) -> Result<(), ValidationError> {
    if capacity < 1 {
        return Err(ValidationError::InvalidCapacity);
    }
    Ok(())
}

/// Reject rates outside the open interval (0, 1), NaN included
pub fn validate_rate(rate: f64) -> Result<(), ValidationError> {
    if !(rate > 0.0 && rate < 1.0) {
        return Err(ValidationError::InvalidFalsePositiveRate { rate });
    }
    Ok(())
}

/// Check that a filter of `m_bits` bits and `k` hashes stays within
/// `max_false_positive_rate` once it holds `capacity` entries.
pub fn check_compatible(
    m_bits: usize,
    k: usize,
    capacity: usize,
    max_false_positive_rate: f64,
) -> Result<(), ValidationError> {
    let projected = false_positive_rate(m_bits, capacity, k);
    if projected > max_false_positive_rate {
        return Err(ValidationError::IncompatibleConstraints {
            capacity,
            max_false_positive_rate,
            projected,
        });
    }
    Ok(())
}

/// Constraints attached to a locally built filter
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Constraints {
    capacity: Option<usize>,
    max_false_positive_rate: Option<f64>,
}

impl Constraints {
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn max_false_positive_rate(&self) -> Option<f64> {
        self.max_false_positive_rate
    }

    pub fn is_empty(&self) -> bool {
        self.capacity.is_none() && self.max_false_positive_rate.is_none()
    }

    /// Attach (or replace) the capacity constraint
    pub fn set_capacity(
        &mut self,
        capacity: usize,
        m_bits: usize,
        k: usize,
    ) -> Result<(), ValidationError> {
        validate_capacity(capacity)?;
        if let Some(rate) = self.max_false_positive_rate {
            check_compatible(m_bits, k, capacity, rate)?;
        }
        debug!(capacity, m_bits, k, "Capacity constraint attached");
        self.capacity = Some(capacity);
        Ok(())
    }

    /// Attach (or replace) the accuracy constraint
    pub fn set_max_false_positive_rate(
        &mut self,
        rate: f64,
        m_bits: usize,
        k: usize,
    ) -> Result<(), ValidationError> {
        validate_rate(rate)?;
        if let Some(capacity) = self.capacity {
            check_compatible(m_bits, k, capacity, rate)?;
        }
        debug!(max_false_positive_rate = rate, m_bits, k, "Accuracy constraint attached");
        self.max_false_positive_rate = Some(rate);
        Ok(())
    }

    /// Decide whether a filter holding `entry_count` entries may take one
    /// more unique entry.
    pub fn admit(&self, m_bits: usize, k: usize, entry_count: usize) -> Result<(), FilterError> {
        if let Some(capacity) = self.capacity {
            if entry_count >= capacity {
                return Err(FilterError::CapacityExceeded { capacity });
            }
        }
        if let Some(max_false_positive_rate) = self.max_false_positive_rate {
            if false_positive_rate(m_bits, entry_count + 1, k) > max_false_positive_rate {
                return Err(FilterError::AccuracyExceeded {
                    max_false_positive_rate,
                });
            }
        }
        Ok(())
    }
}
