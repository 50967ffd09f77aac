//! # Nonce Bloom
//!
//! Bloom filters indexed by nonce-rehashed SHA-256, with optional capacity
//! and accuracy constraints and a raw byte export format.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - Rate model: false positive rate, hash count and length selection
//!   - Hash indexer: `SHA-256(element || i)` reduced to bit positions
//!   - `BloomFilter`: variable-length filter, importable from raw bytes
//!   - `FixedBloomFilter`: length fixed by type (`Bloom256`, `Bloom512`)
//!   - `BloomConfig` / `BloomConfigBuilder`: serialisable parameters
//!
//! - **Metrics** (`metrics`): counters and an `Instrumented` wrapper
//!
//! ## Invariants
//!
//! - **No false negatives**: once inserted, `exists` reports present
//! - **Constraints hold**: a constrained filter never accepts the entry that
//!   would exceed its capacity or push its rate past the bound
//! - **Loaded filters are opaque**: an imported filter has no entry count,
//!   reports [`LOADED_ACCURACY`] and refuses constraints
//!
//! ## Usage Example
//!
//! ```
//! use nonce_bloom::{BloomFilter, FilterError, MembershipFilter};
//!
//! let mut filter = BloomFilter::allocate(100, 0.01)?;
//! filter.insert("0xABCD")?;
//!
//! let (present, rate) = filter.exists("0xABCD");
//! assert!(present);
//! assert!(rate <= 0.01);
//!
//! let copy = BloomFilter::from_bytes(filter.to_bytes(), filter.hash_count())?;
//! assert!(copy.contains("0xABCD"));
//! assert_eq!(copy.accuracy(), nonce_bloom::LOADED_ACCURACY);
//! # Ok::<(), FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod metrics;

// Re-exports for convenience
pub use domain::{
    allocate_parameters, false_positive_rate, optimal_hash_count_from_accuracy,
    optimal_hash_count_from_capacity, required_bit_length, Bloom256, Bloom512, BloomConfig,
    BloomConfigBuilder, BloomFilter, BloomFilterParams, FixedBloomFilter, InsertOutcome,
    MembershipFilter, LOADED_ACCURACY, MAX_HASH_COUNT,
};
pub use error::{FilterError, ValidationError};
pub use metrics::{Instrumented, Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
