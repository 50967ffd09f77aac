//! Metrics and timing hooks for filter operations
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use nonce_bloom::{BloomFilter, Instrumented, MembershipFilter, Metrics};
//!
//! let metrics = Arc::new(Metrics::new());
//! let filter = BloomFilter::with_hash_count(64, 4).unwrap();
//! let mut filter = Instrumented::new(filter, metrics.clone());
//!
//! filter.insert("alpha").unwrap();
//! filter.exists("alpha");
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.inserts_accepted, 1);
//! assert_eq!(snapshot.lookups_positive, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::{InsertOutcome, MembershipFilter};
use crate::error::FilterError;

/// Counters for filter operations
///
/// Atomic, so one collector can be shared by several filters.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Inserts that set bits
    pub inserts_accepted: AtomicU64,
    /// Inserts of entries that already tested present
    pub inserts_duplicate: AtomicU64,
    /// Inserts refused by a capacity constraint
    pub inserts_rejected_capacity: AtomicU64,
    /// Inserts refused by an accuracy constraint
    pub inserts_rejected_accuracy: AtomicU64,
    /// Total lookups performed
    pub lookups_performed: AtomicU64,
    /// Lookups that reported present (possibly false positives)
    pub lookups_positive: AtomicU64,
    /// Cumulative insert time in nanoseconds
    pub insert_time_ns: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of an insert
    pub fn record_insert(&self, duration: Duration, result: &Result<InsertOutcome, FilterError>) {
        let counter = match result {
            Ok(InsertOutcome::Inserted) => &self.inserts_accepted,
            Ok(InsertOutcome::AlreadyPresent) => &self.inserts_duplicate,
            Err(FilterError::CapacityExceeded { .. }) => &self.inserts_rejected_capacity,
            Err(FilterError::AccuracyExceeded { .. }) => &self.inserts_rejected_accuracy,
            Err(_) => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.insert_time_ns
            .fetch_add(saturating_nanos(duration), Ordering::Relaxed);
    }

    /// Record a lookup
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(saturating_nanos(duration), Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts_accepted: self.inserts_accepted.load(Ordering::Relaxed),
            inserts_duplicate: self.inserts_duplicate.load(Ordering::Relaxed),
            inserts_rejected_capacity: self.inserts_rejected_capacity.load(Ordering::Relaxed),
            inserts_rejected_accuracy: self.inserts_rejected_accuracy.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            avg_insert_ns: self.avg_insert_time_ns(),
            avg_lookup_ns: self.avg_lookup_time_ns(),
        }
    }

    fn inserts_recorded(&self) -> u64 {
        self.inserts_accepted.load(Ordering::Relaxed)
            + self.inserts_duplicate.load(Ordering::Relaxed)
            + self.inserts_rejected_capacity.load(Ordering::Relaxed)
            + self.inserts_rejected_accuracy.load(Ordering::Relaxed)
    }

    pub fn avg_insert_time_ns(&self) -> u64 {
        let total = self.insert_time_ns.load(Ordering::Relaxed);
        match self.inserts_recorded() {
            0 => 0,
            count => total / count,
        }
    }

    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        match self.lookups_performed.load(Ordering::Relaxed) {
            0 => 0,
            count => total / count,
        }
    }

    /// Ratio of positive lookups to all lookups
    ///
    /// Includes true positives, so it only bounds the false positive rate
    /// from above when every queried element was never inserted.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.inserts_accepted,
            &self.inserts_duplicate,
            &self.inserts_rejected_capacity,
            &self.inserts_rejected_accuracy,
            &self.lookups_performed,
            &self.lookups_positive,
            &self.insert_time_ns,
            &self.lookup_time_ns,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub inserts_accepted: u64,
    pub inserts_duplicate: u64,
    pub inserts_rejected_capacity: u64,
    pub inserts_rejected_accuracy: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub avg_insert_ns: u64,
    pub avg_lookup_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward filter activity to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_insert(&self, duration: Duration, result: &Result<InsertOutcome, FilterError>);

    fn record_lookup(&self, duration: Duration, found: bool);
}

/// Recorder that drops everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_insert(&self, _: Duration, _: &Result<InsertOutcome, FilterError>) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_insert(&self, duration: Duration, result: &Result<InsertOutcome, FilterError>) {
        Metrics::record_insert(self, duration, result);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }
}

impl<R: MetricsRecorder + ?Sized> MetricsRecorder for Arc<R> {
    fn record_insert(&self, duration: Duration, result: &Result<InsertOutcome, FilterError>) {
        (**self).record_insert(duration, result);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        (**self).record_lookup(duration, found);
    }
}

/// Filter wrapper that times every insert and lookup
#[derive(Clone, Debug)]
pub struct Instrumented<F, R> {
    filter: F,
    recorder: R,
}

impl<F: MembershipFilter, R: MetricsRecorder> Instrumented<F, R> {
    pub fn new(filter: F, recorder: R) -> Self {
        Self { filter, recorder }
    }

    pub fn inner(&self) -> &F {
        &self.filter
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn into_inner(self) -> F {
        self.filter
    }
}

impl<F: MembershipFilter, R: MetricsRecorder> MembershipFilter for Instrumented<F, R> {
    fn insert(&mut self, element: impl AsRef<[u8]>) -> Result<InsertOutcome, FilterError> {
        let start = Instant::now();
        let result = self.filter.insert(element);
        self.recorder.record_insert(start.elapsed(), &result);
        result
    }

    fn exists(&self, element: impl AsRef<[u8]>) -> (bool, f64) {
        let start = Instant::now();
        let result = self.filter.exists(element);
        self.recorder.record_lookup(start.elapsed(), result.0);
        result
    }

    fn accuracy(&self) -> f64 {
        self.filter.accuracy()
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.filter.to_bytes()
    }

    fn size_bits(&self) -> usize {
        self.filter.size_bits()
    }

    fn hash_count(&self) -> usize {
        self.filter.hash_count()
    }

    fn entry_count(&self) -> Option<usize> {
        self.filter.entry_count()
    }
}
