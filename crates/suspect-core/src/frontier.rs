/*
 * frontier.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`CodeFrontier`]: the set of candidate suspect blocks under active
//! investigation, backed by an insertion-sorted vector and the interval
//! tree used to evict blocks engulfed by newer, larger ones.

use crate::block::NodeId;
use crate::collaborators::ReferenceParser;
use crate::config::SearchConfig;
use crate::document::BlockDocument;
use crate::interval_tree::{BinaryIntervalTree, RangeKey};
use std::collections::BTreeSet;

/// One block captured into the frontier.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    id: NodeId,
    indent: u32,
    start_index: u32,
}

/// The active candidate set of suspect blocks.
pub struct CodeFrontier {
    sorted: Vec<FrontierEntry>,
    tree: BinaryIntervalTree<NodeId>,
    /// Line indices not yet captured into any frontier block.
    unvisited: BTreeSet<u32>,
    /// Set when an invalid block has been pushed since the last
    /// `holds_all_syntax_errors?` check; lets that check short-circuit to
    /// `false` on the (common) hot path where nothing changed.
    check_next: bool,
}

impl CodeFrontier {
    pub fn new(total_lines: u32) -> Self {
        Self {
            sorted: Vec::new(),
            tree: BinaryIntervalTree::new(),
            unvisited: (0..total_lines).collect(),
            check_next: false,
        }
    }

    /// All currently-alive blocks' node ids, in insertion order (tombstoned
    /// tails already dropped).
    pub fn live_blocks(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.sorted.iter().map(|e| e.id)
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Line indices not yet captured into any frontier block, ordered.
    pub fn unvisited_lines(&self) -> &BTreeSet<u32> {
        &self.unvisited
    }

    fn register_indent_block(&mut self, doc: &BlockDocument, id: NodeId) {
        let node = doc.node(id);
        for line in &node.lines {
            self.unvisited.remove(&line.index);
        }
    }

    /// `push`: inserts `block`, evicting any already-present block its
    /// range strictly engulfs, and flags the frontier dirty if `block`
    /// itself doesn't parse (so the next `holds_all_syntax_errors?` can't
    /// skip the parser call).
    pub fn push(&mut self, doc: &BlockDocument, id: NodeId, parser: &dyn ReferenceParser, config: &SearchConfig) {
        self.register_indent_block(doc, id);

        let node = doc.node(id);
        let (start, end) = node.range();
        let key = RangeKey::new(start, end);
        self.tree.push(key, id);

        let engulfed: Vec<(RangeKey, NodeId)> = self
            .tree
            .search_contains_key(key)
            .into_iter()
            .map(|(k, v)| (k, *v))
            .filter(|(k, v)| *v != id || *k != key)
            .collect();
        for (engulfed_key, evicted_id) in engulfed {
            tracing::trace!(
                evicted_start = engulfed_key.start,
                evicted_end = engulfed_key.end,
                by_start = start,
                by_end = end,
                "evicting frontier block engulfed by a newer, larger one"
            );
            doc.node(evicted_id).deleted.set(true);
            self.tree.delete(engulfed_key);
        }

        self.sorted.retain(|e| !doc.node(e.id).deleted());

        if !doc.is_valid(id, parser) {
            self.check_next = true;
        }

        self.sorted.push(FrontierEntry {
            id,
            indent: node.indent,
            start_index: start,
        });
        self.sorted.sort_by_key(|e| (e.indent, e.start_index));
    }

    /// `holds_all_syntax_errors?`: redacts every alive frontier line and
    /// asks the reference parser whether the remainder is valid.
    ///
    /// When `config.can_skip_check` is set and no invalid block has been
    /// pushed since the last call, short-circuits to `false` without
    /// touching the parser.
    pub fn holds_all_syntax_errors(
        &mut self,
        doc: &BlockDocument,
        all_lines: &[crate::line::CodeLine],
        parser: &dyn ReferenceParser,
        config: &SearchConfig,
    ) -> bool {
        if config.can_skip_check && !self.check_next {
            return false;
        }
        self.check_next = false;

        let without: Vec<u32> = self
            .sorted
            .iter()
            .flat_map(|e| {
                let node = doc.node(e.id);
                node.start_index..=node.end_index
            })
            .collect();
        parser.valid_without(&without, all_lines)
    }

    /// `detect_invalid_blocks`: the smallest non-empty subset of the
    /// frontier's invalid blocks whose removal validates the document,
    /// searched in non-decreasing size and capped at
    /// `config.max_invalid_subset_size` before giving up and returning the
    /// full invalid set (combinatorial beyond that point).
    pub fn detect_invalid_blocks(
        &self,
        doc: &BlockDocument,
        all_lines: &[crate::line::CodeLine],
        parser: &dyn ReferenceParser,
        config: &SearchConfig,
    ) -> Vec<NodeId> {
        let invalid: Vec<NodeId> = self
            .sorted
            .iter()
            .map(|e| e.id)
            .filter(|id| !doc.is_valid(*id, parser))
            .collect();

        if invalid.is_empty() {
            return Vec::new();
        }

        let cap = config.max_invalid_subset_size.min(invalid.len());
        for size in 1..=cap {
            if let Some(subset) = find_validating_subset(&invalid, size, doc, all_lines, parser) {
                return subset;
            }
        }
        invalid
    }
}

/// Enumerates all `size`-element subsets of `invalid` (in the order they
/// appear) and returns the first whose removal validates the document.
fn find_validating_subset(
    invalid: &[NodeId],
    size: usize,
    doc: &BlockDocument,
    all_lines: &[crate::line::CodeLine],
    parser: &dyn ReferenceParser,
) -> Option<Vec<NodeId>> {
    let mut indices: Vec<usize> = (0..size).collect();
    let n = invalid.len();
    if size > n {
        return None;
    }
    loop {
        let subset: Vec<NodeId> = indices.iter().map(|&i| invalid[i]).collect();
        let without: Vec<u32> = subset
            .iter()
            .flat_map(|id| {
                let node = doc.node(*id);
                node.start_index..=node.end_index
            })
            .collect();
        if parser.valid_without(&without, all_lines) {
            return Some(subset);
        }
        if !advance_combination(&mut indices, n) {
            return None;
        }
    }
}

/// Advances `indices` (a strictly increasing combination of `size` picked
/// from `0..n`) to the next combination in lexicographic order. Returns
/// `false` once exhausted.
fn advance_combination(indices: &mut [usize], n: usize) -> bool {
    let size = indices.len();
    if size == 0 {
        return false;
    }
    let mut i = size;
    loop {
        if i == 0 {
            return false;
        }
        i -= 1;
        if indices[i] != i + n - size {
            indices[i] += 1;
            for j in i + 1..size {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::PassthroughCleaner;
    use crate::config::SearchConfig;
    use crate::document::BlockDocument;
    use crate::line::build_code_lines;
    use crate::lex_diff::{PairEvent, PairKind, PairRole};
    use crate::collaborators::LexerAdapter;

    struct NoopLexer;
    impl LexerAdapter for NoopLexer {
        fn tokenize(&self, _line_text: &str) -> Vec<PairEvent> {
            vec![]
        }
    }

    struct AlwaysInvalid;
    impl ReferenceParser for AlwaysInvalid {
        fn valid(&self, _text: &str) -> bool {
            false
        }
    }

    #[test]
    fn engulfing_evicts_smaller_blocks() {
        let lines = build_code_lines(&"x\n".repeat(21), &PassthroughCleaner, &NoopLexer).unwrap();
        let mut doc = BlockDocument::build(lines);
        let config = SearchConfig::default();
        let mut frontier = CodeFrontier::new(21);

        let small_a = NodeId(1); // line index 1 -> range [1,1]
        let small_b = NodeId(5);
        let small_c = NodeId(11);
        frontier.push(&doc, small_a, &AlwaysInvalid, &config);
        frontier.push(&doc, small_b, &AlwaysInvalid, &config);
        frontier.push(&doc, small_c, &AlwaysInvalid, &config);

        let big = doc.capture(&(0..=20).map(NodeId).collect::<Vec<_>>());
        frontier.push(&doc, big, &AlwaysInvalid, &config);

        let live: Vec<NodeId> = frontier.live_blocks().collect();
        assert_eq!(live, vec![big]);
        assert!(doc.node(small_a).deleted());
        assert!(doc.node(small_b).deleted());
        assert!(doc.node(small_c).deleted());
    }

    #[test]
    fn advance_combination_enumerates_all_pairs_of_four() {
        let mut indices = vec![0, 1];
        let mut all = vec![indices.clone()];
        while advance_combination(&mut indices, 4) {
            all.push(indices.clone());
        }
        assert_eq!(all, vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn detect_invalid_blocks_returns_empty_when_all_valid() {
        struct AlwaysValid;
        impl ReferenceParser for AlwaysValid {
            fn valid(&self, _text: &str) -> bool {
                true
            }
        }
        let lines = build_code_lines("a\nb\n", &PassthroughCleaner, &NoopLexer).unwrap();
        let doc = BlockDocument::build(lines.clone());
        let config = SearchConfig::default();
        let mut frontier = CodeFrontier::new(2);
        frontier.push(&doc, NodeId(0), &AlwaysValid, &config);
        let result = frontier.detect_invalid_blocks(&doc, &lines, &AlwaysValid, &config);
        assert!(result.is_empty());
    }
}
