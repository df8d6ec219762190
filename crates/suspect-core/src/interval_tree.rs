/*
 * interval_tree.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`BinaryIntervalTree`]: an order-statistic BST keyed on line-range
//! intervals, augmented with each subtree's maximum endpoint so that
//! containment queries can prune whole branches.

use std::cmp::Ordering;
use std::marker::PhantomData;

/// A `start..end` line range, inclusive on both ends, used as a BST key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeKey {
    pub start: u32,
    pub end: u32,
}

impl RangeKey {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// True iff `self` is contained within `other` (`other.start <=
    /// self.start && self.end <= other.end`).
    pub fn contained_by(self, other: RangeKey) -> bool {
        other.start <= self.start && self.end <= other.end
    }
}

/// A total order over [`RangeKey`]. `RangeCmp` compares by start then end;
/// `RangeCmpRev` is its mirror image.
pub trait RangeOrder {
    fn cmp_keys(a: RangeKey, b: RangeKey) -> Ordering;
}

/// Forward order: by `start`, tie-broken by `end`.
#[derive(Debug, Clone, Copy)]
pub struct RangeCmp;

impl RangeOrder for RangeCmp {
    fn cmp_keys(a: RangeKey, b: RangeKey) -> Ordering {
        a.start.cmp(&b.start).then(a.end.cmp(&b.end))
    }
}

/// Reverse of [`RangeCmp`]. Its role is not exercised end-to-end in the
/// design this engine is built from — kept as the symmetric mirror image
/// and wired through the same generic tree, but treat it as advisory until
/// a caller actually needs reverse-ordered storage.
#[derive(Debug, Clone, Copy)]
pub struct RangeCmpRev;

impl RangeOrder for RangeCmpRev {
    fn cmp_keys(a: RangeKey, b: RangeKey) -> Ordering {
        RangeCmp::cmp_keys(b, a)
    }
}

struct Node<V> {
    key: RangeKey,
    value: V,
    /// Maximum `key.end` over this node and its subtree.
    annotate: u32,
    left: Option<Box<Node<V>>>,
    right: Option<Box<Node<V>>>,
}

impl<V> Node<V> {
    fn new(key: RangeKey, value: V) -> Self {
        Self { key, value, annotate: key.end, left: None, right: None }
    }

    fn recompute_annotate(&mut self) {
        self.annotate = self.key.end;
        if let Some(l) = &self.left {
            self.annotate = self.annotate.max(l.annotate);
        }
        if let Some(r) = &self.right {
            self.annotate = self.annotate.max(r.annotate);
        }
    }
}

fn annotate_of<V>(node: &Option<Box<Node<V>>>) -> Option<u32> {
    node.as_ref().map(|n| n.annotate)
}

/// A BST keyed by [`RangeKey`] under the order `O` (default [`RangeCmp`]),
/// each node carrying the max subtree endpoint (`annotate`) needed to prune
/// containment queries.
pub struct BinaryIntervalTree<V, O: RangeOrder = RangeCmp> {
    root: Option<Box<Node<V>>>,
    len: usize,
    _order: PhantomData<O>,
}

impl<V, O: RangeOrder> Default for BinaryIntervalTree<V, O> {
    fn default() -> Self {
        Self { root: None, len: 0, _order: PhantomData }
    }
}

impl<V, O: RangeOrder> BinaryIntervalTree<V, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `(key, value)`. A duplicate key overwrites the stored value
    /// rather than creating a second node.
    pub fn push(&mut self, key: RangeKey, value: V) {
        let inserted = Self::insert(&mut self.root, key, value);
        if inserted {
            self.len += 1;
        }
    }

    fn insert(slot: &mut Option<Box<Node<V>>>, key: RangeKey, value: V) -> bool {
        match slot {
            None => {
                *slot = Some(Box::new(Node::new(key, value)));
                true
            }
            Some(node) => {
                let inserted = match O::cmp_keys(key, node.key) {
                    Ordering::Equal => {
                        node.value = value;
                        false
                    }
                    Ordering::Less => Self::insert(&mut node.left, key, value),
                    Ordering::Greater => Self::insert(&mut node.right, key, value),
                };
                node.recompute_annotate();
                inserted
            }
        }
    }

    /// Remove the node stored under `key`, promoting its in-order successor.
    /// No-op if `key` is not present.
    pub fn delete(&mut self, key: RangeKey) {
        let removed = Self::remove(&mut self.root, key);
        if removed {
            self.len -= 1;
        }
    }

    fn remove(slot: &mut Option<Box<Node<V>>>, key: RangeKey) -> bool {
        let Some(node) = slot else { return false };
        let removed = match O::cmp_keys(key, node.key) {
            Ordering::Less => Self::remove(&mut node.left, key),
            Ordering::Greater => Self::remove(&mut node.right, key),
            Ordering::Equal => {
                match (node.left.take(), node.right.take()) {
                    (None, None) => {
                        *slot = None;
                        return true;
                    }
                    (Some(l), None) => {
                        *slot = Some(l);
                        return true;
                    }
                    (None, Some(r)) => {
                        *slot = Some(r);
                        return true;
                    }
                    (Some(l), Some(r)) => {
                        // In-order successor: leftmost node of the right subtree.
                        let mut right = Some(r);
                        let (succ_key, succ_value) = Self::take_leftmost(&mut right);
                        let mut replacement = Box::new(Node::new(succ_key, succ_value));
                        replacement.left = Some(l);
                        replacement.right = right;
                        replacement.recompute_annotate();
                        *slot = Some(replacement);
                        return true;
                    }
                }
            }
        };
        if removed {
            if let Some(node) = slot {
                node.recompute_annotate();
            }
        }
        removed
    }

    /// Detach and return the leftmost node's key/value from `slot`'s
    /// subtree, re-annotating affected ancestors.
    fn take_leftmost(slot: &mut Option<Box<Node<V>>>) -> (RangeKey, V) {
        let node = slot.as_mut().expect("take_leftmost called on empty subtree");
        if node.left.is_none() {
            let boxed = slot.take().expect("checked Some above");
            let Node { key, value, right, .. } = *boxed;
            *slot = right;
            return (key, value);
        }
        let result = Self::take_leftmost(&mut node.left);
        node.recompute_annotate();
        result
    }

    /// All stored `(key, value)` pairs whose key is contained by `query`
    /// (`query.start <= key.start && key.end <= query.end`), pruning
    /// subtrees whose max endpoint cannot satisfy the query.
    pub fn search_contains_key(&self, query: RangeKey) -> Vec<(RangeKey, &V)> {
        let mut out = Vec::new();
        Self::search(&self.root, query, &mut out);
        out
    }

    fn search<'a>(slot: &'a Option<Box<Node<V>>>, query: RangeKey, out: &mut Vec<(RangeKey, &'a V)>) {
        let Some(node) = slot else { return };
        if let Some(left_max) = annotate_of(&node.left) {
            if left_max >= query.start {
                Self::search(&node.left, query, out);
            }
        }
        if node.key.contained_by(query) {
            out.push((node.key, &node.value));
        }
        if node.key.start < query.end {
            Self::search(&node.right, query, out);
        }
    }

    /// Reference implementation of [`BinaryIntervalTree::search_contains_key`]
    /// via full traversal, with no pruning. Used in tests to cross-validate
    /// the pruned search.
    pub fn search_all_covers_slow(&self, query: RangeKey) -> Vec<(RangeKey, &V)> {
        let mut out = Vec::new();
        Self::traverse_all(&self.root, &mut out);
        out.retain(|(key, _)| key.contained_by(query));
        out
    }

    fn traverse_all<'a>(slot: &'a Option<Box<Node<V>>>, out: &mut Vec<(RangeKey, &'a V)>) {
        let Some(node) = slot else { return };
        Self::traverse_all(&node.left, out);
        out.push((node.key, &node.value));
        Self::traverse_all(&node.right, out);
    }

    /// Checks that every node's `annotate` equals the max of its own end
    /// and its children's `annotate`. Used by property tests,
    /// including the ones in `tests/` that exercise this crate as an
    /// external dependency — hence `test-support` alongside `test`.
    #[cfg(any(test, feature = "test-support"))]
    pub fn check_annotate_invariant(&self) -> bool {
        fn check<V>(slot: &Option<Box<Node<V>>>) -> Option<u32> {
            let node = slot.as_ref()?;
            let left = check(&node.left);
            let right = check(&node.right);
            if node.left.is_some() && left.is_none() {
                return None;
            }
            if node.right.is_some() && right.is_none() {
                return None;
            }
            let mut expected = node.key.end;
            if let Some(l) = left {
                expected = expected.max(l);
            }
            if let Some(r) = right {
                expected = expected.max(r);
            }
            if expected != node.annotate {
                return None;
            }
            Some(node.annotate)
        }
        self.root.is_none() || check(&self.root).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: u32, e: u32) -> RangeKey {
        RangeKey::new(s, e)
    }

    #[test]
    fn insert_and_find_contained() {
        let mut tree: BinaryIntervalTree<&str> = BinaryIntervalTree::new();
        tree.push(key(1, 1), "a");
        tree.push(key(5, 5), "b");
        tree.push(key(11, 11), "c");
        tree.push(key(0, 20), "outer");

        let mut found: Vec<&str> = tree.search_contains_key(key(0, 20)).into_iter().map(|(_, v)| *v).collect();
        found.sort();
        assert_eq!(found, vec!["a", "b", "c", "outer"]);
    }

    #[test]
    fn engulfing_scenario_f() {
        // Push [1..1], [5..5], [11..11], then
        // [0..20]; a query for [0..20] should surface all four, but the
        // caller is expected to then delete the three smaller ones.
        let mut tree: BinaryIntervalTree<u32> = BinaryIntervalTree::new();
        tree.push(key(1, 1), 1);
        tree.push(key(5, 5), 2);
        tree.push(key(11, 11), 3);
        tree.push(key(0, 20), 4);

        let contained = tree.search_contains_key(key(0, 20));
        assert_eq!(contained.len(), 4);

        for (k, v) in contained {
            if *v != 4 {
                tree.delete(k);
            }
        }
        assert_eq!(tree.len(), 1);
        let remaining = tree.search_contains_key(key(0, 20));
        assert_eq!(remaining.len(), 1);
        assert_eq!(*remaining[0].1, 4);
    }

    #[test]
    fn delete_missing_key_is_noop() {
        let mut tree: BinaryIntervalTree<u32> = BinaryIntervalTree::new();
        tree.push(key(1, 2), 1);
        tree.delete(key(9, 9));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn delete_two_child_node_promotes_successor() {
        let mut tree: BinaryIntervalTree<u32> = BinaryIntervalTree::new();
        for (s, e, v) in [(5, 5, 0), (2, 2, 1), (8, 8, 2), (1, 1, 3), (3, 3, 4), (7, 7, 5), (9, 9, 6)] {
            tree.push(key(s, e), v);
        }
        tree.delete(key(5, 5));
        assert_eq!(tree.len(), 6);
        assert!(tree.check_annotate_invariant());
        let all = tree.search_contains_key(key(0, 100));
        let mut starts: Vec<u32> = all.iter().map(|(k, _)| k.start).collect();
        starts.sort();
        assert_eq!(starts, vec![1, 2, 3, 7, 8, 9]);
    }

    #[test]
    fn push_duplicate_key_overwrites() {
        let mut tree: BinaryIntervalTree<&str> = BinaryIntervalTree::new();
        tree.push(key(1, 2), "first");
        tree.push(key(1, 2), "second");
        assert_eq!(tree.len(), 1);
        let found = tree.search_contains_key(key(0, 5));
        assert_eq!(*found[0].1, "second");
    }

    #[test]
    fn pruned_search_matches_slow_search() {
        let mut tree: BinaryIntervalTree<u32> = BinaryIntervalTree::new();
        let ranges = [(0, 3), (4, 4), (2, 2), (1, 9), (10, 12), (6, 7), (0, 20)];
        for (i, (s, e)) in ranges.iter().enumerate() {
            tree.push(key(*s, *e), i as u32);
        }
        for (s, e) in [(0, 20), (0, 3), (2, 10), (4, 4), (5, 5)] {
            let q = key(s, e);
            let mut fast: Vec<u32> = tree.search_contains_key(q).into_iter().map(|(_, v)| *v).collect();
            let mut slow: Vec<u32> = tree.search_all_covers_slow(q).into_iter().map(|(_, v)| *v).collect();
            fast.sort();
            slow.sort();
            assert_eq!(fast, slow, "mismatch for query {:?}", q);
        }
    }

    #[test]
    fn annotate_invariant_holds_after_random_ops() {
        let mut tree: BinaryIntervalTree<u32> = BinaryIntervalTree::new();
        let mut keys = Vec::new();
        let mut seed: u32 = 12345;
        let mut next = || {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            seed % 50
        };
        for i in 0..60 {
            let s = next();
            let e = s + next();
            tree.push(key(s, e), i);
            keys.push(key(s, e));
            assert!(tree.check_annotate_invariant());
        }
        for k in keys.into_iter().take(30) {
            tree.delete(k);
            assert!(tree.check_annotate_invariant());
        }
    }

    #[test]
    fn rev_order_is_mirror_of_forward() {
        let a = key(1, 5);
        let b = key(2, 3);
        assert_eq!(RangeCmp::cmp_keys(a, b), RangeCmpRev::cmp_keys(b, a));
    }
}
