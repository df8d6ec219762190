/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`BlockDocument`]: the arena-backed spine of leaf [`BlockNode`]s, the
//! expansion predicates that drive how they compose, and the priority queue
//! that orders candidates for the indent-tree driver.

use crate::block::{BlockNode, NodeId};
use crate::collaborators::ReferenceParser;
use crate::lex_diff::{LexPairDiff, Leaning};
use crate::line::CodeLine;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One entry in [`BlockDocument`]'s priority queue. Ordered by
/// `(next_indent, indent, end_index)` ascending, with insertion order
/// (`sequence`) as the final tiebreak: on an otherwise-exact tie the
/// earlier-inserted entry pops first (the later insertion "loses" the tie).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    next_indent: u32,
    indent: u32,
    end_index: u32,
    sequence: u64,
    id: NodeId,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.next_indent, self.indent, self.end_index)
            .cmp(&(other.next_indent, other.indent, other.end_index))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The arena owning every [`BlockNode`] ever created for one search, plus
/// the spine's root sentinel (`root_parents`) and the expansion queue.
///
/// Arena-indexed: `above`/`below` as a doubly-linked list of owned nodes
/// would require reference cycles; an index-based handle (`NodeId`)
/// sidesteps that entirely.
pub struct BlockDocument {
    arena: Vec<BlockNode>,
    queue: BinaryHeap<QueueEntry>,
    root_parents: Vec<NodeId>,
    next_sequence: u64,
}

impl BlockDocument {
    /// Builds the initial spine: one leaf per line, linked `above`/`below`
    /// in source order, every leaf enqueued.
    pub fn build(lines: Vec<CodeLine>) -> Self {
        let mut doc = Self {
            arena: Vec::with_capacity(lines.len()),
            queue: BinaryHeap::with_capacity(lines.len()),
            root_parents: Vec::new(),
            next_sequence: 0,
        };
        let mut ids = Vec::with_capacity(lines.len());
        for line in lines {
            let seq = doc.take_sequence();
            let id = NodeId(doc.arena.len());
            doc.arena.push(BlockNode::new_leaf(line, seq));
            ids.push(id);
        }
        for (i, id) in ids.iter().enumerate() {
            let above = if i == 0 { None } else { Some(ids[i - 1]) };
            let below = ids.get(i + 1).copied();
            doc.arena[id.0].above.set(above);
            doc.arena[id.0].below.set(below);
        }
        for id in &ids {
            doc.push_queue(*id);
        }
        doc
    }

    fn take_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }

    pub fn node(&self, id: NodeId) -> &BlockNode {
        &self.arena[id.0]
    }

    /// Every id ever allocated in this arena, including tombstoned ones —
    /// useful for whole-tree invariant checks in tests.
    pub fn all_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.arena.len()).map(NodeId)
    }

    pub fn root_parents(&self) -> &[NodeId] {
        &self.root_parents
    }

    /// The aggregate leaning of everything attached to the root sentinel,
    /// folded in source order.
    pub fn root_leaning(&self) -> Leaning {
        let mut acc = LexPairDiff::new_empty();
        for id in &self.root_parents {
            acc.concat(&self.arena[id.0].lex_diff);
        }
        acc.leaning()
    }

    /// `from_blocks`: composes `parents` into one node. A singleton
    /// `parents` is never wrapped in a new composite — "we do not create
    /// single-child composites" — so this returns the sole parent
    /// unchanged rather than allocating.
    fn from_blocks(&mut self, parents: &[NodeId]) -> NodeId {
        assert!(!parents.is_empty(), "from_blocks requires at least one parent");
        if parents.len() == 1 {
            return parents[0];
        }

        let indent = parents
            .iter()
            .map(|id| self.arena[id.0].indent)
            .min()
            .expect("non-empty parents");

        let mut lex_diff = LexPairDiff::new_empty();
        let mut lines = Vec::new();
        for id in parents {
            let parent = &self.arena[id.0];
            lex_diff.concat(&parent.lex_diff);
            lines.extend(parent.lines.iter().cloned());
        }

        let first = &self.arena[parents[0].0];
        let start_index = first.start_index;
        let above = first.above();
        let last = &self.arena[parents[parents.len() - 1].0];
        let end_index = last.end_index;
        let below = last.below();

        let sequence = self.take_sequence();
        let new_id = NodeId(self.arena.len());
        self.arena.push(BlockNode::new_composite(
            lines,
            start_index,
            end_index,
            indent,
            lex_diff,
            parents.to_vec(),
            above,
            below,
            sequence,
        ));

        for id in parents {
            self.arena[id.0].deleted.set(true);
        }
        new_id
    }

    /// `document.capture`: composes `parents`, rewires the neighbours'
    /// reciprocal links onto the new node, and enqueues it.
    pub fn capture(&mut self, parents: &[NodeId]) -> NodeId {
        let new_id = self.from_blocks(parents);
        if parents.len() > 1 {
            if let Some(a) = self.arena[new_id.0].above() {
                self.arena[a.0].below.set(Some(new_id));
                self.arena[a.0].invalidate_next_indent();
            }
            if let Some(b) = self.arena[new_id.0].below() {
                self.arena[b.0].above.set(Some(new_id));
                self.arena[b.0].invalidate_next_indent();
            }
            self.push_queue(new_id);
        }
        new_id
    }

    pub fn capture_above(&mut self, n: NodeId) -> NodeId {
        let a = self.arena[n.0].above().expect("capture_above requires an above neighbour");
        self.capture(&[a, n])
    }

    pub fn capture_below(&mut self, n: NodeId) -> NodeId {
        let b = self.arena[n.0].below().expect("capture_below requires a below neighbour");
        self.capture(&[n, b])
    }

    /// Attach `n` as a parent of the root sentinel: `n` is maximal at its
    /// current indent tier and will not expand further.
    pub fn attach_to_root(&mut self, n: NodeId) {
        self.root_parents.push(n);
    }

    fn push_queue(&mut self, id: NodeId) {
        let priority = self.next_indent(id);
        let node = &self.arena[id.0];
        self.queue.push(QueueEntry {
            next_indent: priority,
            indent: node.indent,
            end_index: node.end_index,
            sequence: node.sequence,
            id,
        });
    }

    /// Pops the highest-priority non-deleted node, lazily discarding
    /// tombstoned entries left behind by composition.
    pub fn pop_next(&mut self) -> Option<NodeId> {
        while let Some(entry) = self.queue.pop() {
            if !self.arena[entry.id.0].deleted() {
                return Some(entry.id);
            }
        }
        None
    }

    pub fn queue_is_empty_of_live_entries(&self) -> bool {
        self.queue.iter().all(|e| self.arena[e.id.0].deleted())
    }

    /// `expand_above?` on `n`, against a caller-supplied `with_indent`.
    pub fn expand_above(&self, n: NodeId, with_indent: u32) -> bool {
        let node = &self.arena[n.0];
        let Some(above_id) = node.above() else { return false };
        let above = &self.arena[above_id.0];

        if above.is_leaf() && above.leaning() == Leaning::Right {
            return false;
        }
        if node.is_leaf() {
            if node.leaning() == Leaning::Left {
                return false;
            }
            if node.leaning() == Leaning::Both && above.leaning() == Leaning::Left {
                return true;
            }
        }
        if matches!(above.leaning(), Leaning::Left | Leaning::Both) {
            return above.indent >= with_indent;
        }
        true
    }

    /// `expand_below?`, the mirror image of [`BlockDocument::expand_above`].
    pub fn expand_below(&self, n: NodeId, with_indent: u32) -> bool {
        let node = &self.arena[n.0];
        let Some(below_id) = node.below() else { return false };
        let below = &self.arena[below_id.0];

        if below.is_leaf() && below.leaning() == Leaning::Left {
            return false;
        }
        if node.is_leaf() {
            if node.leaning() == Leaning::Right {
                return false;
            }
            if node.leaning() == Leaning::Both && below.leaning() == Leaning::Right {
                return true;
            }
        }
        if matches!(below.leaning(), Leaning::Right | Leaning::Both) {
            return below.indent >= with_indent;
        }
        true
    }

    fn compute_next_indent(&self, n: NodeId) -> u32 {
        let node = &self.arena[n.0];
        let own = node.indent;
        if self.expand_above(n, own) || self.expand_below(n, own) {
            return own;
        }
        let above_indent = node.above().map(|id| self.arena[id.0].indent);
        let below_indent = node.below().map(|id| self.arena[id.0].indent);
        let candidate = match (above_indent, below_indent) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => own,
        };
        candidate.min(own)
    }

    /// `next_indent`: lazily computed and memoized per node. Callers must
    /// ensure it is recomputed (via cache invalidation on neighbour
    /// rewiring, handled inside [`BlockDocument::capture`]) whenever a
    /// node's neighbours change.
    pub fn next_indent(&self, n: NodeId) -> u32 {
        if let Some(cached) = self.arena[n.0].cached_next_indent() {
            return cached;
        }
        let value = self.compute_next_indent(n);
        self.arena[n.0].set_next_indent(value);
        value
    }

    /// The indent-tree driver: repeatedly pops the highest-priority
    /// candidate and, per pop, performs at most one capture — preferring
    /// the side indicated by the node's leaning when both sides are
    /// expandable, deferring the other side to the next pop of the
    /// resulting composite. A node that cannot expand either way is
    /// maximal at its tier and is attached to the root sentinel.
    pub fn build_tree(&mut self) {
        while let Some(n) = self.pop_next() {
            let with_indent = self.next_indent(n);
            let can_above = self.expand_above(n, with_indent);
            let can_below = self.expand_below(n, with_indent);

            let grew = if can_above && can_below {
                match self.arena[n.0].leaning() {
                    Leaning::Right => {
                        self.capture_below(n);
                        true
                    }
                    Leaning::Left | Leaning::Both | Leaning::Equal => {
                        self.capture_above(n);
                        true
                    }
                }
            } else if can_above {
                self.capture_above(n);
                true
            } else if can_below {
                self.capture_below(n);
                true
            } else {
                false
            };

            if !grew {
                self.attach_to_root(n);
            }
        }
    }

    /// Memoized `valid`: invokes `parser` at most once per node.
    pub fn is_valid(&self, id: NodeId, parser: &dyn ReferenceParser) -> bool {
        if let Some(cached) = self.arena[id.0].cached_valid() {
            return cached;
        }
        let value = parser.valid(&self.arena[id.0].text());
        self.arena[id.0].set_valid(value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::PassthroughCleaner;
    use crate::lex_diff::{PairEvent, PairKind, PairRole};
    use crate::line::build_code_lines;
    use crate::collaborators::LexerAdapter;

    struct ParenDoLexer;
    impl LexerAdapter for ParenDoLexer {
        fn tokenize(&self, line_text: &str) -> Vec<PairEvent> {
            let trimmed = line_text.trim();
            let mut events = Vec::new();
            if trimmed == "do" || trimmed.starts_with("do ") {
                events.push(PairEvent { kind: PairKind::DoEnd, role: PairRole::Open });
            }
            if trimmed == "end" {
                events.push(PairEvent { kind: PairKind::DoEnd, role: PairRole::Close });
            }
            for c in line_text.chars() {
                match c {
                    '(' => events.push(PairEvent { kind: PairKind::Paren, role: PairRole::Open }),
                    ')' => events.push(PairEvent { kind: PairKind::Paren, role: PairRole::Close }),
                    _ => {}
                }
            }
            events
        }
    }

    fn build(source: &str) -> BlockDocument {
        let lines = build_code_lines(source, &PassthroughCleaner, &ParenDoLexer).unwrap();
        BlockDocument::build(lines)
    }

    #[test]
    fn leaves_link_above_below_symmetrically() {
        let doc = build("a\nb\nc\n");
        let mid = NodeId(1);
        let above = doc.node(mid).above().unwrap();
        let below = doc.node(mid).below().unwrap();
        assert_eq!(doc.node(above).below(), Some(mid));
        assert_eq!(doc.node(below).above(), Some(mid));
    }

    #[test]
    fn balanced_do_end_block_collapses_to_one_root_parent() {
        let mut doc = build("do\n  x\nend\n");
        doc.build_tree();
        assert_eq!(doc.root_parents().len(), 1);
        assert_eq!(doc.root_leaning(), Leaning::Equal);
    }

    #[test]
    fn missing_end_leaves_open_leaning() {
        let mut doc = build("do\n  x\n");
        doc.build_tree();
        assert_eq!(doc.root_parents().len(), 1);
        assert_eq!(doc.root_leaning(), Leaning::Left);
    }

    #[test]
    fn stray_end_leans_right() {
        let mut doc = build("x\nend\n");
        doc.build_tree();
        assert_eq!(doc.root_leaning(), Leaning::Right);
    }

    #[test]
    fn capture_deletes_parents_and_preserves_partition() {
        let mut doc = build("do\nend\n");
        let a = NodeId(0);
        let b = NodeId(1);
        let composite = doc.capture(&[a, b]);
        assert!(doc.node(a).deleted());
        assert!(doc.node(b).deleted());
        assert!(!doc.node(composite).deleted());
        assert_eq!(doc.node(composite).range(), (0, 1));
    }

    #[test]
    fn from_blocks_does_not_wrap_singleton() {
        let mut doc = build("a\n");
        let only = NodeId(0);
        let result = doc.capture(&[only]);
        assert_eq!(result, only);
        assert!(!doc.node(only).deleted());
    }

    #[test]
    fn indent_is_min_of_parents() {
        let mut doc = build("  a\nb\n");
        let a = NodeId(0);
        let b = NodeId(1);
        assert_eq!(doc.node(a).indent, 2);
        assert_eq!(doc.node(b).indent, 0);
        let composite = doc.capture(&[a, b]);
        assert_eq!(doc.node(composite).indent, 0);
    }

    #[test]
    fn three_sibling_do_blocks_all_valid_yield_three_root_parents() {
        let mut doc = build("do\nend\ndo\nend\ndo\nend\n");
        doc.build_tree();
        assert_eq!(doc.root_parents().len(), 3);
        assert_eq!(doc.root_leaning(), Leaning::Equal);
    }
}
