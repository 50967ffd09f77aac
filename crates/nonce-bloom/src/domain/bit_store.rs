//! Byte-aligned bit storage
//!
//! Bit `p` lives in byte `p / 8` under mask `1 << (p % 8)` (LSB first), which
//! is also the layout of exported filters.

use bitvec::prelude::*;

/// Bit length of a `len_bytes` store, `None` when that many bits cannot be
/// addressed
pub fn bit_length(len_bytes: usize) -> Option<usize> {
    len_bytes
        .checked_mul(8)
        .filter(|&bits| bits <= BitSlice::<u8, Lsb0>::MAX_BITS)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitStore {
    bits: BitVec<u8, Lsb0>,
}

impl BitStore {
    /// All-zero storage of `len_bytes * 8` bits
    pub fn zeroed(len_bytes: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; len_bytes * 8],
        }
    }

    /// Storage over previously exported bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bits: BitVec::from_vec(bytes),
        }
    }

    /// Set a bit to 1. Positions past the end are ignored.
    pub fn set_bit(&mut self, position: usize) {
        if let Some(mut bit) = self.bits.get_mut(position) {
            *bit = true;
        }
    }

    /// Whether a bit is 1. Positions past the end read as 0.
    pub fn test_bit(&self, position: usize) -> bool {
        self.bits.get(position).map(|bit| *bit).unwrap_or(false)
    }

    pub fn all_set(&self, positions: &[usize]) -> bool {
        positions.iter().all(|&pos| self.test_bit(pos))
    }

    pub fn len_bits(&self) -> usize {
        self.bits.len()
    }

    pub fn len_bytes(&self) -> usize {
        self.bits.as_raw_slice().len()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }
}
