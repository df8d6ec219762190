/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`BlockNode`]: a contiguous span of lines, arena-indexed to sidestep the
//! ownership cycles a doubly-linked spine would otherwise create.

use crate::lex_diff::{LexPairDiff, Leaning};
use crate::line::CodeLine;
use std::cell::Cell;

/// A handle into [`crate::document::BlockDocument`]'s arena. Cheap to copy,
/// meaningless outside the arena that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One contiguous block of lines.
///
/// `parents`, `indent`, `lines` and `lex_diff` are
/// write-once at construction. Only `above`, `below`, `deleted`, and the two
/// lazy fields (`next_indent`, `valid`) ever change after that, which is why
/// those five live behind `Cell` while everything else is a plain field.
#[derive(Debug)]
pub struct BlockNode {
    pub lines: Vec<CodeLine>,
    pub start_index: u32,
    pub end_index: u32,
    /// Minimum indent among non-empty member lines at construction time.
    /// Stable: does not change when neighbours change.
    pub indent: u32,
    pub lex_diff: LexPairDiff,
    /// The nodes this one was composed from; empty for a leaf.
    pub parents: Vec<NodeId>,

    pub above: Cell<Option<NodeId>>,
    pub below: Cell<Option<NodeId>>,
    pub deleted: Cell<bool>,

    /// Lazily computed, memoized indent tier at which this node would
    /// capture both its current neighbours if expanded. `None` until first
    /// read via [`BlockNode::next_indent`]'s caller (the document, which
    /// alone knows the neighbours needed to compute it).
    next_indent_cache: Cell<Option<u32>>,
    /// Lazily computed, memoized validity of this block's own text in
    /// isolation. Distinct from frontier-level "does removing this block
    /// validate the whole document" — see `ReferenceParser::valid`.
    valid_cache: Cell<Option<bool>>,

    /// Insertion order into the arena; used only to break ties when
    /// `(next_indent, indent, end_index)` is fully tied.
    pub(crate) sequence: u64,
}

impl BlockNode {
    pub(crate) fn new_leaf(line: CodeLine, sequence: u64) -> Self {
        let indent = if line.empty { u32::MAX } else { line.indent };
        let index = line.index;
        let lex_diff = line.lex_diff.clone();
        Self {
            lines: vec![line],
            start_index: index,
            end_index: index,
            indent,
            lex_diff,
            parents: Vec::new(),
            above: Cell::new(None),
            below: Cell::new(None),
            deleted: Cell::new(false),
            next_indent_cache: Cell::new(None),
            valid_cache: Cell::new(None),
            sequence,
        }
    }

    pub(crate) fn new_composite(
        lines: Vec<CodeLine>,
        start_index: u32,
        end_index: u32,
        indent: u32,
        lex_diff: LexPairDiff,
        parents: Vec<NodeId>,
        above: Option<NodeId>,
        below: Option<NodeId>,
        sequence: u64,
    ) -> Self {
        Self {
            lines,
            start_index,
            end_index,
            indent,
            lex_diff,
            parents,
            above: Cell::new(above),
            below: Cell::new(below),
            deleted: Cell::new(false),
            next_indent_cache: Cell::new(None),
            valid_cache: Cell::new(None),
            sequence,
        }
    }

    /// True for a leaf: one constructed directly from a line, never from a
    /// composition (or a composition that unwrapped back down to one part).
    pub fn is_leaf(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn leaning(&self) -> Leaning {
        self.lex_diff.leaning()
    }

    pub fn deleted(&self) -> bool {
        self.deleted.get()
    }

    pub fn above(&self) -> Option<NodeId> {
        self.above.get()
    }

    pub fn below(&self) -> Option<NodeId> {
        self.below.get()
    }

    /// Cached `next_indent`, if already computed.
    pub(crate) fn cached_next_indent(&self) -> Option<u32> {
        self.next_indent_cache.get()
    }

    pub(crate) fn set_next_indent(&self, value: u32) {
        self.next_indent_cache.set(Some(value));
    }

    /// Invalidate the `next_indent` cache. Needed whenever a neighbour link
    /// changes, since `next_indent` depends on `above`/`below`.
    pub(crate) fn invalidate_next_indent(&self) {
        self.next_indent_cache.set(None);
    }

    pub(crate) fn cached_valid(&self) -> Option<bool> {
        self.valid_cache.get()
    }

    pub(crate) fn set_valid(&self, value: bool) {
        self.valid_cache.set(Some(value));
    }

    /// The full source text this block spans, reconstructed from its lines'
    /// original text (which already carries trailing newlines).
    pub fn text(&self) -> String {
        self.lines.iter().map(|l| l.original.as_str()).collect()
    }

    /// The inclusive `(start, end)` line range, zero-based.
    pub fn range(&self) -> (u32, u32) {
        (self.start_index, self.end_index)
    }
}
