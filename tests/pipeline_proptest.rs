//! Property-based tests for pipeline adapters
//!
//! These check the algebraic laws the adapters must keep for any input:
//! splitting, chunking, and de-duplicating a sequence never loses or reorders
//! elements.

use proptest::prelude::*;
use seqflow::Pipeline;

/// Small sequences with plenty of repeats
fn sequence_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-20i32..20, 0..60)
}

proptest! {
    #[test]
    fn test_filter_and_exclude_match_partition(items in sequence_strategy(), modulus in 1i32..5) {
        let kept = Pipeline::of(items.clone()).filter(|x| x % modulus == 0).to_list();
        let dropped = Pipeline::of(items.clone()).exclude(|x| x % modulus == 0).to_list();

        let (matching, rest) = Pipeline::of(items).partition_by(|x| x % modulus == 0);
        prop_assert_eq!(matching.to_list(), kept);
        prop_assert_eq!(rest.to_list(), dropped);
    }

    #[test]
    fn test_chunk_then_flatten_is_identity(items in sequence_strategy(), size in 1usize..10) {
        let chunks = Pipeline::of(items.clone()).chunk(size).unwrap().to_list();
        prop_assert!(chunks.iter().all(|chunk| !chunk.is_empty() && chunk.len() <= size));
        // Only the last chunk may be short
        if let Some((_, full)) = chunks.split_last() {
            prop_assert!(full.iter().all(|chunk| chunk.len() == size));
        }

        let flat = Pipeline::of(chunks).flatten().to_list();
        prop_assert_eq!(flat, items);
    }

    #[test]
    fn test_take_then_drop_covers_sequence(items in sequence_strategy(), cut in 0usize..70) {
        let n = cut.min(items.len());
        let head = Pipeline::of(items.clone()).take(n).to_list();
        let tail = Pipeline::of(items.clone()).drop(n as isize).unwrap().to_list();

        let rejoined = Pipeline::of(head).chain(tail).to_list();
        prop_assert_eq!(rejoined, items);
    }

    #[test]
    fn test_distinct_is_idempotent(items in sequence_strategy()) {
        let once = Pipeline::of(items.clone()).distinct().to_list();
        let twice = Pipeline::of(items).distinct().distinct().to_list();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_take_right_and_drop_right_split(items in sequence_strategy(), cut in 0isize..70) {
        let left = Pipeline::of(items.clone()).drop_right(cut).to_list();
        let right = Pipeline::of(items.clone()).take_right(cut).to_list();

        prop_assert_eq!(left.len() + right.len(), items.len());
        let rejoined = Pipeline::of(left).chain(right).to_list();
        prop_assert_eq!(rejoined, items);
    }

    #[test]
    fn test_sort_is_stable_permutation(items in sequence_strategy()) {
        let mut expected = items.clone();
        expected.sort();
        prop_assert_eq!(Pipeline::of(items).sort().to_list(), expected);
    }
}
