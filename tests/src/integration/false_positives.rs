//! # Empirical False Positive Rate
//!
//! Queries filled filters with random non-members and compares the measured
//! positive rate with the rate model and with the filter's actual fill.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    use nonce_bloom::{
        false_positive_rate, Bloom512, BloomFilter, Instrumented, MembershipFilter, Metrics,
    };

    const QUERIES: usize = 20_000;

    /// Query a filter with random 16-byte keys that were never inserted
    fn observed_rate<F: MembershipFilter>(filter: &F, seed: u64) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let positives = (0..QUERIES)
            .filter(|_| {
                let key: [u8; 16] = rng.gen();
                filter.contains(key)
            })
            .count();
        positives as f64 / QUERIES as f64
    }

    /// Probability that `k` independent positions all hit a set bit
    fn fill_rate(bits_set: usize, size_bits: usize, k: usize) -> f64 {
        (bits_set as f64 / size_bits as f64).powi(k as i32)
    }

    #[test]
    fn test_allocated_filter_meets_target_empirically() {
        let mut filter = BloomFilter::allocate(1000, 0.01).unwrap();
        for i in 0..1000 {
            filter.insert(format!("member-{i}")).unwrap();
        }

        let observed = observed_rate(&filter, 7);
        assert!(
            observed < 0.02,
            "observed rate {observed} is far above the 0.01 target"
        );
        assert!(
            (observed - filter.accuracy()).abs() < 0.005,
            "observed {observed} vs model {}",
            filter.accuracy()
        );
    }

    #[test]
    fn test_fixed_filter_tracks_model() {
        let mut filter = Bloom512::with_hash_count(4).unwrap();
        for i in 0..100 {
            filter.insert(format!("member-{i}")).unwrap();
        }
        let n = filter.entry_count().unwrap();
        let model = false_positive_rate(512, n, 4);

        let observed = observed_rate(&filter, 11);
        let expected = fill_rate(filter.bits_set(), 512, 4);

        assert!(
            (observed - expected).abs() < 0.01,
            "observed {observed} vs fill-based {expected}"
        );
        assert!(
            (observed - model).abs() < 0.05,
            "observed {observed} vs model {model}"
        );
    }

    #[test]
    fn test_members_never_missed() {
        let mut rng = StdRng::seed_from_u64(3);
        let members: Vec<[u8; 32]> = (0..500).map(|_| rng.gen()).collect();

        let mut filter = BloomFilter::with_capacity(1024, 500).unwrap();
        for member in &members {
            filter.insert(member).unwrap();
        }

        for member in &members {
            let (present, rate) = filter.exists(member);
            assert!(present, "False negative for {member:?}");
            assert_eq!(rate, filter.accuracy());
        }
    }

    #[test]
    fn test_positive_lookups_recorded_by_metrics() {
        let metrics = Arc::new(Metrics::new());
        let mut filter = Instrumented::new(
            BloomFilter::with_hash_count(256, 5).unwrap(),
            metrics.clone(),
        );
        for i in 0..200 {
            filter.insert(format!("member-{i}")).unwrap();
        }

        let observed = observed_rate(&filter, 19);
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.lookups_performed, QUERIES as u64);
        assert_eq!(
            snapshot.lookups_positive as f64 / QUERIES as f64,
            observed
        );
        assert!((metrics.observed_positive_rate() - observed).abs() < 1e-12);
    }
}
