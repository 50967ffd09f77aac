//! # Wire Format Flows
//!
//! Export is the raw bit vector, `m / 8` bytes with no header. Bit `p` lives
//! in byte `p / 8` under mask `1 << (p % 8)`. The hash count travels out of
//! band.

#[cfg(test)]
mod tests {
    use nonce_bloom::domain::compute_hash_positions;
    use nonce_bloom::{
        Bloom256, Bloom512, BloomFilter, FilterError, InsertOutcome, MembershipFilter,
        ValidationError, LOADED_ACCURACY,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn addresses(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("0x{:040x}", i * 7919)).collect()
    }

    fn populated(len_bytes: usize, k: usize, entries: &[String]) -> BloomFilter {
        let mut filter = BloomFilter::with_hash_count(len_bytes, k).unwrap();
        for entry in entries {
            filter.insert(entry).unwrap();
        }
        filter
    }

    // =============================================================================
    // EXPORT / IMPORT
    // =============================================================================

    #[test]
    fn test_export_length_is_size_in_bytes() {
        for len_bytes in [1, 7, 32, 64, 1199] {
            let filter = BloomFilter::with_hash_count(len_bytes, 3).unwrap();
            assert_eq!(filter.to_bytes().len(), len_bytes);
            assert_eq!(filter.size_bits(), len_bytes * 8);
        }
    }

    #[test]
    fn test_imported_filter_keeps_every_member() {
        let entries = addresses(200);
        let source = populated(512, 5, &entries);

        let imported = BloomFilter::from_bytes(source.to_bytes(), source.hash_count()).unwrap();

        for entry in &entries {
            assert!(imported.contains(entry), "Imported filter lost {entry}");
        }
        assert_eq!(imported.to_bytes(), source.to_bytes());
        assert_eq!(imported.bits_set(), source.bits_set());
    }

    #[test]
    fn test_imported_filter_answers_like_source() {
        let entries = addresses(50);
        let source = populated(64, 4, &entries);
        let imported = BloomFilter::from_hex(&source.to_hex(), 4).unwrap();

        for address in addresses(400) {
            assert_eq!(
                imported.contains(&address),
                source.contains(&address),
                "Answers diverge for {address}"
            );
        }
    }

    #[test]
    fn test_imported_filter_reports_loaded_accuracy() {
        let entries = addresses(10);
        let source = populated(64, 3, &entries);
        let imported = BloomFilter::from_bytes(source.as_bytes(), 3).unwrap();

        assert!(imported.is_loaded());
        assert_eq!(imported.accuracy(), LOADED_ACCURACY);
        assert_eq!(imported.entry_count(), None);
        assert_eq!(imported.exists(&entries[0]), (true, LOADED_ACCURACY));
        assert_eq!(
            imported.to_string(),
            "512-bit bloom filter: unknown entries (loaded)"
        );
    }

    #[test]
    fn test_imported_filter_refuses_constraints() {
        let mut imported = BloomFilter::from_bytes(vec![0u8; 32], 3).unwrap();

        assert_eq!(
            imported.add_capacity_constraint(10),
            Err(FilterError::LoadedFilterConstraint)
        );
        assert_eq!(
            imported.add_accuracy_constraint(0.5),
            Err(FilterError::LoadedFilterConstraint)
        );
        assert_eq!(imported.capacity(), None);
        assert_eq!(imported.max_false_positive_rate(), None);
    }

    #[test]
    fn test_imported_filter_accepts_inserts_without_counting() {
        let mut imported = BloomFilter::from_bytes(vec![0u8; 64], 4).unwrap();

        assert_eq!(imported.insert("fresh"), Ok(InsertOutcome::Inserted));
        assert_eq!(imported.insert("fresh"), Ok(InsertOutcome::AlreadyPresent));
        assert!(imported.contains("fresh"));
        assert_eq!(imported.entry_count(), None);
        assert_eq!(imported.accuracy(), LOADED_ACCURACY);
    }

    #[test]
    fn test_import_rejects_bad_input() {
        assert_eq!(
            BloomFilter::from_bytes(Vec::<u8>::new(), 3),
            Err(FilterError::Validation(ValidationError::InvalidSize))
        );
        assert_eq!(
            BloomFilter::from_bytes(vec![0u8; 8], 0),
            Err(FilterError::Validation(ValidationError::InvalidHashCount {
                hash_count: 0
            }))
        );
        assert!(matches!(
            BloomFilter::from_hex("not hex", 3),
            Err(FilterError::Validation(ValidationError::InvalidHex(_)))
        ));
    }

    // =============================================================================
    // BIT LAYOUT
    // =============================================================================

    #[test]
    fn test_export_places_bits_lsb_first() {
        let k = 6;
        let len_bytes = 128;
        let mut filter = BloomFilter::with_hash_count(len_bytes, k).unwrap();
        filter.insert("layout").unwrap();

        let mut expected = vec![0u8; len_bytes];
        for pos in compute_hash_positions(b"layout", k, len_bytes * 8) {
            expected[pos / 8] |= 1 << (pos % 8);
        }

        assert_eq!(filter.to_bytes(), expected);
    }

    #[test]
    fn test_handcrafted_bytes_are_honoured() {
        let k = 3;
        let positions = compute_hash_positions(b"crafted", k, 256);
        let mut bytes = vec![0u8; 32];
        for pos in &positions {
            bytes[pos / 8] |= 1 << (pos % 8);
        }

        let filter = BloomFilter::from_bytes(bytes, k).unwrap();
        assert!(filter.contains("crafted"));
    }

    // =============================================================================
    // FIXED AND VARIABLE FILTERS
    // =============================================================================

    #[test]
    fn test_fixed_exports_import_as_variable() {
        let entries = addresses(20);
        let mut small = Bloom256::with_hash_count(3).unwrap();
        let mut large = Bloom512::with_hash_count(3).unwrap();
        for entry in &entries {
            small.insert(entry).unwrap();
            large.insert(entry).unwrap();
        }

        let small_copy = BloomFilter::from_bytes(small.to_array(), 3).unwrap();
        let large_copy = BloomFilter::from_hex(&large.to_hex(), 3).unwrap();

        assert_eq!(small_copy.size_bits(), Bloom256::SIZE_BITS);
        assert_eq!(large_copy.size_bits(), Bloom512::SIZE_BITS);
        for entry in &entries {
            assert!(small_copy.contains(entry));
            assert!(large_copy.contains(entry));
        }
    }

    #[test]
    fn test_fixed_and_variable_export_identically() {
        let entries = addresses(30);
        let variable = populated(64, 5, &entries);
        let mut fixed = Bloom512::with_hash_count(5).unwrap();
        for entry in &entries {
            fixed.insert(entry).unwrap();
        }

        assert_eq!(fixed.to_bytes(), variable.to_bytes());
        assert_eq!(fixed.accuracy(), variable.accuracy());
        assert_eq!(fixed.entry_count(), variable.entry_count());
    }

    #[test]
    fn test_wrong_hash_count_breaks_membership_not_memory() {
        let entries = addresses(5);
        let source = populated(256, 4, &entries);
        let imported = BloomFilter::from_bytes(source.to_bytes(), 200).unwrap();

        // 5 entries * 4 hashes set at most 20 of 2048 bits; 200 queries all landing on them is
        // effectively impossible
        for entry in &entries {
            assert!(!imported.contains(entry));
        }
    }
}
