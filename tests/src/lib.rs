//! # Nonce Bloom Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/            # Cross-module flows
//!     ├── wire_format.rs      # Export, import and hex layout
//!     ├── constraints.rs      # Constraint lifecycles across filter kinds
//!     └── false_positives.rs  # Empirical rate against the model
//!
//! tests/benches/
//! └── filter_benchmarks.rs    # Insert/exists across lengths and hash counts
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p nonce-bloom-tests
//!
//! # By category
//! cargo test -p nonce-bloom-tests integration::
//!
//! # Benchmarks
//! cargo bench -p nonce-bloom-tests
//! ```
