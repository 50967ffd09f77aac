//! Hash indexer for Bloom filters
//!
//! Every slot `i` re-hashes the element with SHA-256 and a one byte nonce
//! appended: `SHA-256(element || i)`. The first 8 digest bytes, read as a
//! big-endian integer, are reduced modulo the filter length. A single change
//! in the input flips the whole digest, so each nonce yields an independent
//! position no matter how large the filter is.

use sha2::{Digest, Sha256};

/// Largest supported hash count: one distinct nonce per byte value
pub const MAX_HASH_COUNT: usize = 256;

/// Hash an element with the given slot nonce and return the 64-bit prefix
pub fn nonce_hash(element: &[u8], nonce: u8) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(element);
    hasher.update([nonce]);
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Compute the `k` bit positions of an element in an `m`-bit filter
///
/// `k` must not exceed [`MAX_HASH_COUNT`]; filters validate this on
/// construction.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize) -> Vec<usize> {
    debug_assert!(k <= MAX_HASH_COUNT, "hash count {k} exceeds nonce space");
    let m = m as u64;
    (0..k)
        .map(|i| (nonce_hash(element, i as u8) % m) as usize)
        .collect()
}
