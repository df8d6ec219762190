//! Property tests for the interval tree: its annotate invariant survives
//! arbitrary push/delete sequences, and the pruned `search_contains_key`
//! always agrees with the brute-force `search_all_covers_slow`.

use proptest::prelude::*;
use suspect_core::{BinaryIntervalTree, RangeKey};

fn range_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0u32..40).prop_flat_map(|start| (start..(start + 20).min(60)).prop_map(move |end| (start, end)))
}

proptest! {
    #[test]
    fn annotate_invariant_survives_random_push_delete(
        ops in prop::collection::vec((any::<bool>(), range_strategy()), 1..80)
    ) {
        let mut tree: BinaryIntervalTree<u32> = BinaryIntervalTree::new();
        let mut live: Vec<RangeKey> = Vec::new();
        for (i, (is_push, (s, e))) in ops.iter().enumerate() {
            let key = RangeKey::new(*s, *e);
            if *is_push || live.is_empty() {
                tree.push(key, i as u32);
                live.push(key);
            } else {
                let idx = (i * 7) % live.len();
                let victim = live.remove(idx);
                tree.delete(victim);
            }
            prop_assert!(tree.check_annotate_invariant());
        }
    }

    #[test]
    fn pruned_search_matches_brute_force(
        entries in prop::collection::vec(range_strategy(), 1..60),
        query in range_strategy(),
    ) {
        let mut tree: BinaryIntervalTree<usize> = BinaryIntervalTree::new();
        for (i, (s, e)) in entries.iter().enumerate() {
            tree.push(RangeKey::new(*s, *e), i);
        }
        let q = RangeKey::new(query.0, query.1);
        let mut fast: Vec<usize> = tree.search_contains_key(q).into_iter().map(|(_, v)| *v).collect();
        let mut slow: Vec<usize> = tree.search_all_covers_slow(q).into_iter().map(|(_, v)| *v).collect();
        fast.sort_unstable();
        slow.sort_unstable();
        prop_assert_eq!(fast, slow);
    }
}
