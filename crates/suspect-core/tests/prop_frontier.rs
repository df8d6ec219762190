//! Property test: after any `CodeFrontier::push`, no two live frontier
//! blocks have one strictly containing the other.

use proptest::prelude::*;
use suspect_core::test_support::{ToyCommentCleaner, ToyRubyLexer};
use suspect_core::{build_code_lines, BlockDocument, CodeFrontier, NodeId, ReferenceParser, SearchConfig};

struct AlwaysInvalid;
impl ReferenceParser for AlwaysInvalid {
    fn valid(&self, _text: &str) -> bool {
        false
    }
}

fn no_containment(ranges: &[(u32, u32)]) -> bool {
    for (i, a) in ranges.iter().enumerate() {
        for (j, b) in ranges.iter().enumerate() {
            if i == j {
                continue;
            }
            let a_strictly_inside_b = b.0 <= a.0 && a.1 <= b.1 && (a.0 != b.0 || a.1 != b.1);
            if a_strictly_inside_b {
                return false;
            }
        }
    }
    true
}

proptest! {
    #[test]
    fn no_frontier_block_is_engulfed_after_push(
        // A sequence of leaf-index spans to capture and push, each a
        // contiguous run starting at a random offset with a random width.
        picks in prop::collection::vec((0usize..30, 1usize..6), 1..20)
    ) {
        let source = "x\n".repeat(32);
        let lines = build_code_lines(&source, &ToyCommentCleaner, &ToyRubyLexer).unwrap();
        let total = lines.len() as u32;
        let mut doc = BlockDocument::build(lines);
        // The initial leaves are allocated in line order at ids `0..total`;
        // those slots never move even as later captures append composites,
        // so this snapshot stays a valid index -> NodeId map for the whole
        // test.
        let leaf_ids: Vec<NodeId> = doc.all_ids().collect();
        let config = SearchConfig::default();
        let mut frontier = CodeFrontier::new(total);

        for (start, width) in picks {
            let start = (start as u32).min(total - 1);
            let end = (start + width as u32 - 1).min(total - 1);
            let members: Vec<NodeId> = leaf_ids[start as usize..=end as usize].to_vec();
            // Skip spans entirely made of already-deleted nodes (already
            // engulfed by an earlier, larger push); nothing new to assert.
            if members.iter().any(|id| doc.node(*id).deleted()) {
                continue;
            }
            let id = doc.capture(&members);
            frontier.push(&doc, id, &AlwaysInvalid, &config);

            let live_ranges: Vec<(u32, u32)> = frontier.live_blocks().map(|id| doc.node(id).range()).collect();
            prop_assert!(no_containment(&live_ranges), "frontier engulfment invariant violated: {:?}", live_ranges);
        }
    }
}
