//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Rate model (false positive mathematics, parameter selection)
//! - Hash indexer (nonce-rehashed SHA-256 positions)
//! - Bit storage
//! - Constraint enforcement
//! - Fixed-length and variable-length filters
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bit_store;
pub mod bloom_filter;
pub mod config;
pub mod constraints;
pub mod filter_core;
pub mod fixed;
pub mod hash_functions;
pub mod parameters;

pub use bit_store::BitStore;
pub use bloom_filter::BloomFilter;
pub use config::{BloomConfig, BloomConfigBuilder};
pub use constraints::Constraints;
pub use filter_core::{InsertOutcome, MembershipFilter, LOADED_ACCURACY};
pub use fixed::{Bloom256, Bloom512, FixedBloomFilter};
pub use hash_functions::{compute_hash_positions, MAX_HASH_COUNT};
pub use parameters::{
    allocate_parameters, false_positive_rate, optimal_hash_count_from_accuracy,
    optimal_hash_count_from_capacity, required_bit_length, BloomFilterParams,
};
