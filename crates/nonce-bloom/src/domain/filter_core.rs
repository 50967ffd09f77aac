//! Filter state shared by the fixed-length and variable-length filters

use std::fmt;

use tracing::{debug, trace};

use super::bit_store::{bit_length, BitStore};
use super::constraints::Constraints;
use super::hash_functions::{compute_hash_positions, MAX_HASH_COUNT};
use super::parameters::false_positive_rate;
use crate::error::{FilterError, ValidationError};

/// Accuracy reported by filters imported from raw bytes, whose entry count
/// is unknown. Lies outside `[0, 1]` on purpose.
pub const LOADED_ACCURACY: f64 = -1.0;

/// Result of a successful insertion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// All bits were set and the entry count grew by one
    Inserted,
    /// Every position was already set; nothing changed
    AlreadyPresent,
}

/// Operations shared by every filter variant
pub trait MembershipFilter {
    /// Insert an element, subject to any attached constraints
    ///
    /// Inserting an element that already tests present is a no-op and never
    /// fails. A false positive can therefore mask a new element as a
    /// duplicate.
    fn insert(&mut self, element: impl AsRef<[u8]>) -> Result<InsertOutcome, FilterError>;

    /// Membership test with its false positive probability
    ///
    /// Returns `(true, accuracy())` when every position is set and
    /// `(false, 0.0)` otherwise: absence is always certain.
    fn exists(&self, element: impl AsRef<[u8]>) -> (bool, f64);

    /// Current false positive rate: 1 while empty, [`LOADED_ACCURACY`] for
    /// imported filters
    fn accuracy(&self) -> f64;

    /// Raw bit-vector bytes, `size_bits() / 8` long, no header
    fn to_bytes(&self) -> Vec<u8>;

    fn size_bits(&self) -> usize;

    fn hash_count(&self) -> usize;

    /// Unique entries inserted, `None` when the filter was imported
    fn entry_count(&self) -> Option<usize>;

    fn contains(&self, element: impl AsRef<[u8]>) -> bool {
        self.exists(element).0
    }
}

/// Where a filter's bits came from
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Provenance {
    /// Built up by local inserts
    Local {
        entry_count: usize,
        constraints: Constraints,
    },
    /// Imported from exported bytes; entry count and constraints unknown
    Imported,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FilterCore {
    bits: BitStore,
    k: usize,
    provenance: Provenance,
}

/// Bit length of a `len_bytes` filter, rejecting empty and unaddressable
/// lengths
pub(crate) fn validate_size(len_bytes: usize) -> Result<usize, ValidationError> {
    match bit_length(len_bytes) {
        Some(bits) if bits > 0 => Ok(bits),
        _ => Err(ValidationError::InvalidSize),
    }
}

pub(crate) fn validate_hash_count(k: usize) -> Result<(), ValidationError> {
    if k < 1 || k > MAX_HASH_COUNT {
        return Err(ValidationError::InvalidHashCount { hash_count: k });
    }
    Ok(())
}

impl FilterCore {
    /// Empty, unconstrained filter of `len_bytes` bytes
    pub(crate) fn new(len_bytes: usize, k: usize) -> Result<Self, ValidationError> {
        let size_bits = validate_size(len_bytes)?;
        validate_hash_count(k)?;
        debug!(size_bits, hash_count = k, "Bloom filter created");
        Ok(Self {
            bits: BitStore::zeroed(len_bytes),
            k,
            provenance: Provenance::Local {
                entry_count: 0,
                constraints: Constraints::default(),
            },
        })
    }

    /// Filter over exported bytes
    pub(crate) fn imported(bytes: Vec<u8>, k: usize) -> Result<Self, ValidationError> {
        let size_bits = validate_size(bytes.len())?;
        validate_hash_count(k)?;
        debug!(size_bits, hash_count = k, "Bloom filter loaded from bytes");
        Ok(Self {
            bits: BitStore::from_bytes(bytes),
            k,
            provenance: Provenance::Imported,
        })
    }

    fn positions(&self, element: &[u8]) -> Vec<usize> {
        compute_hash_positions(element, self.k, self.bits.len_bits())
    }

    pub(crate) fn insert(&mut self, element: &[u8]) -> Result<InsertOutcome, FilterError> {
        let positions = self.positions(element);
        if self.bits.all_set(&positions) {
            return Ok(InsertOutcome::AlreadyPresent);
        }

        let m = self.bits.len_bits();
        if let Provenance::Local {
            entry_count,
            constraints,
        } = &mut self.provenance
        {
            if let Err(err) = constraints.admit(m, self.k, *entry_count) {
                debug!(entry_count = *entry_count, error = %err, "Insert rejected");
                return Err(err);
            }
            *entry_count += 1;
        }

        for pos in positions {
            self.bits.set_bit(pos);
        }
        trace!(entry_count = ?self.entry_count(), "Entry inserted");
        Ok(InsertOutcome::Inserted)
    }

    pub(crate) fn contains(&self, element: &[u8]) -> bool {
        self.bits.all_set(&self.positions(element))
    }

    pub(crate) fn exists(&self, element: &[u8]) -> (bool, f64) {
        if self.contains(element) {
            (true, self.accuracy())
        } else {
            (false, 0.0)
        }
    }

    pub(crate) fn accuracy(&self) -> f64 {
        match self.provenance {
            Provenance::Imported => LOADED_ACCURACY,
            Provenance::Local { entry_count: 0, .. } => 1.0,
            Provenance::Local { entry_count, .. } => {
                false_positive_rate(self.bits.len_bits(), entry_count, self.k)
            }
        }
    }

    fn constraints_mut(&mut self) -> Result<&mut Constraints, FilterError> {
        match &mut self.provenance {
            Provenance::Local { constraints, .. } => Ok(constraints),
            Provenance::Imported => Err(FilterError::LoadedFilterConstraint),
        }
    }

    pub(crate) fn add_capacity_constraint(&mut self, capacity: usize) -> Result<(), FilterError> {
        let (m, k) = (self.bits.len_bits(), self.k);
        self.constraints_mut()?.set_capacity(capacity, m, k)?;
        Ok(())
    }

    pub(crate) fn add_accuracy_constraint(&mut self, rate: f64) -> Result<(), FilterError> {
        let (m, k) = (self.bits.len_bits(), self.k);
        self.constraints_mut()?.set_max_false_positive_rate(rate, m, k)?;
        Ok(())
    }

    fn constraints(&self) -> Option<&Constraints> {
        match &self.provenance {
            Provenance::Local { constraints, .. } => Some(constraints),
            Provenance::Imported => None,
        }
    }

    pub(crate) fn capacity(&self) -> Option<usize> {
        self.constraints().and_then(Constraints::capacity)
    }

    pub(crate) fn max_false_positive_rate(&self) -> Option<f64> {
        self.constraints().and_then(Constraints::max_false_positive_rate)
    }

    pub(crate) fn entry_count(&self) -> Option<usize> {
        match self.provenance {
            Provenance::Local { entry_count, .. } => Some(entry_count),
            Provenance::Imported => None,
        }
    }

    pub(crate) fn is_loaded(&self) -> bool {
        matches!(self.provenance, Provenance::Imported)
    }

    pub(crate) fn hash_count(&self) -> usize {
        self.k
    }

    pub(crate) fn size_bits(&self) -> usize {
        self.bits.len_bits()
    }

    pub(crate) fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.bits.as_bytes()
    }
}

impl fmt::Display for FilterCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit bloom filter: ", self.bits.len_bits())?;
        let constraints = match &self.provenance {
            Provenance::Imported => return write!(f, "unknown entries (loaded)"),
            Provenance::Local {
                entry_count,
                constraints,
            } => {
                write!(f, "{entry_count} unique entries")?;
                constraints
            }
        };
        if let Some(capacity) = constraints.capacity() {
            write!(f, ", max cap {capacity}")?;
        }
        if let Some(rate) = constraints.max_false_positive_rate() {
            write!(f, ", max false positive rate {rate:.6}")?;
        }
        if constraints.is_empty() {
            write!(f, ", no constraints")?;
        }
        Ok(())
    }
}
