/*
 * lex_diff.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`LexPairDiff`]: a per-line, then per-block, running count of opening vs.
//! closing lexical pair markers.

use crate::error::SuspectError;

/// The fixed set of lexical pair kinds tracked by the engine.
///
/// `DefEnd`, `ClassEnd`, `ModuleEnd`, `IfEnd`, `BeginEnd`, and `CaseEnd` exist
/// to name every keyword-delimited block kind a lexer adapter with enough
/// context could distinguish, but a single bare Ruby-style `end` keyword
/// cannot be attributed to one of them
/// without tracking which keyword opened it — that's a stack, and the
/// whole point of [`LexPairDiff::concat`] is to avoid needing one. The
/// concrete lexer in `suspect-lexer` therefore folds every keyword-delimited
/// block (`def`/`class`/`module`/`if`/`unless`/`while`/`until`/`for`/`case`/
/// `begin`/`do` ... `end`) into the single [`PairKind::DoEnd`] bucket; the
/// other keyword kinds are reserved for lexer adapters with enough context
/// to tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PairKind {
    Paren = 0,
    Brace = 1,
    Bracket = 2,
    DoEnd = 3,
    IfEnd = 4,
    DefEnd = 5,
    ClassEnd = 6,
    ModuleEnd = 7,
    BeginEnd = 8,
    CaseEnd = 9,
    StringLiteral = 10,
    Heredoc = 11,
}

/// Number of [`PairKind`] variants; also the width of [`LexPairDiff`]'s
/// counter table.
pub const PAIR_KIND_COUNT: usize = 12;

impl PairKind {
    /// Every variant, in declaration order (matches [`PairKind::index`]).
    pub const ALL: [PairKind; PAIR_KIND_COUNT] = [
        PairKind::Paren,
        PairKind::Brace,
        PairKind::Bracket,
        PairKind::DoEnd,
        PairKind::IfEnd,
        PairKind::DefEnd,
        PairKind::ClassEnd,
        PairKind::ModuleEnd,
        PairKind::BeginEnd,
        PairKind::CaseEnd,
        PairKind::StringLiteral,
        PairKind::Heredoc,
    ];

    /// Human-readable name, used in overflow error messages.
    pub fn name(self) -> &'static str {
        match self {
            PairKind::Paren => "paren",
            PairKind::Brace => "brace",
            PairKind::Bracket => "bracket",
            PairKind::DoEnd => "do-end",
            PairKind::IfEnd => "if-end",
            PairKind::DefEnd => "def-end",
            PairKind::ClassEnd => "class-end",
            PairKind::ModuleEnd => "module-end",
            PairKind::BeginEnd => "begin-end",
            PairKind::CaseEnd => "case-end",
            PairKind::StringLiteral => "string-literal",
            PairKind::Heredoc => "heredoc",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Which side of a pair a lexer event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRole {
    Open,
    Close,
}

/// One lexer event: a pair kind paired with its role on this line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairEvent {
    pub kind: PairKind,
    pub role: PairRole,
}

/// The direction of lexical imbalance of a [`LexPairDiff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaning {
    /// Balanced: no pending opens or closes.
    Equal,
    /// Only opens remain pending (e.g. a missing `end`).
    Left,
    /// Only closes remain pending (e.g. a stray `end`).
    Right,
    /// Both opens and closes remain pending, for different pair kinds.
    Both,
}

/// A running count of opening vs. closing pair markers, one `(open, close)`
/// counter per [`PairKind`].
///
/// Concatenating `B` onto `A` cancels `A`'s pending opens against `B`'s
/// closes before summing the remainders — this is what lets a block's
/// balance be computed by folding its lines' diffs without ever building an
/// explicit bracket-matching stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexPairDiff {
    counts: [(u32, u32); PAIR_KIND_COUNT],
}

impl Default for LexPairDiff {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl LexPairDiff {
    pub fn new_empty() -> Self {
        Self {
            counts: [(0, 0); PAIR_KIND_COUNT],
        }
    }

    /// Record one open/close event, applying the same cancellation policy
    /// as [`LexPairDiff::concat`] (recording is equivalent to concatenating
    /// a singleton one-event diff onto `self`). This is what makes a
    /// same-line matched pair like `f(x)` net out to zero pending opens
    /// instead of leaking a phantom open/close pair into the next line's
    /// concat.
    pub fn record(&mut self, event: PairEvent, line: u32) -> Result<(), SuspectError> {
        let (open, close) = &mut self.counts[event.kind.index()];
        match event.role {
            PairRole::Open => {
                *open = open.checked_add(1).ok_or(SuspectError::LexerOverflow {
                    pair_kind: event.kind.name(),
                    line,
                })?;
            }
            PairRole::Close => {
                if *open > 0 {
                    *open -= 1;
                } else {
                    *close = close.checked_add(1).ok_or(SuspectError::LexerOverflow {
                        pair_kind: event.kind.name(),
                        line,
                    })?;
                }
            }
        }
        Ok(())
    }

    pub fn open_count(&self, kind: PairKind) -> u32 {
        self.counts[kind.index()].0
    }

    pub fn close_count(&self, kind: PairKind) -> u32 {
        self.counts[kind.index()].1
    }

    /// Concatenate `other` onto `self` in place, in order: `self` is treated
    /// as the text that comes first.
    pub fn concat(&mut self, other: &LexPairDiff) {
        for kind in PairKind::ALL {
            let i = kind.index();
            let (self_open, self_close) = self.counts[i];
            let (other_open, other_close) = other.counts[i];
            let cancel = self_open.min(other_close);
            let open = self_open - cancel + other_open;
            let close = self_close + other_close - cancel;
            self.counts[i] = (open, close);
        }
    }

    /// `self` with `other` concatenated on, without mutating either operand.
    pub fn concatenated(&self, other: &LexPairDiff) -> LexPairDiff {
        let mut result = self.clone();
        result.concat(other);
        result
    }

    pub fn balanced(&self) -> bool {
        self.counts.iter().all(|&(open, close)| open == 0 && close == 0)
    }

    pub fn leaning(&self) -> Leaning {
        let any_open = self.counts.iter().any(|&(open, _)| open > 0);
        let any_close = self.counts.iter().any(|&(_, close)| close > 0);
        match (any_open, any_close) {
            (false, false) => Leaning::Equal,
            (true, false) => Leaning::Left,
            (false, true) => Leaning::Right,
            (true, true) => Leaning::Both,
        }
    }

    /// Fold `diffs` left to right via [`LexPairDiff::concat`].
    pub fn fold<'a>(diffs: impl IntoIterator<Item = &'a LexPairDiff>) -> LexPairDiff {
        let mut acc = LexPairDiff::new_empty();
        for diff in diffs {
            acc.concat(diff);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(kind: PairKind) -> PairEvent {
        PairEvent { kind, role: PairRole::Open }
    }
    fn close(kind: PairKind) -> PairEvent {
        PairEvent { kind, role: PairRole::Close }
    }

    #[test]
    fn empty_is_balanced_and_equal() {
        let diff = LexPairDiff::new_empty();
        assert!(diff.balanced());
        assert_eq!(diff.leaning(), Leaning::Equal);
    }

    #[test]
    fn single_open_leans_left() {
        let mut diff = LexPairDiff::new_empty();
        diff.record(open(PairKind::DoEnd), 0).unwrap();
        assert!(!diff.balanced());
        assert_eq!(diff.leaning(), Leaning::Left);
    }

    #[test]
    fn single_close_leans_right() {
        let mut diff = LexPairDiff::new_empty();
        diff.record(close(PairKind::DoEnd), 0).unwrap();
        assert_eq!(diff.leaning(), Leaning::Right);
    }

    #[test]
    fn mismatched_kinds_lean_both() {
        let mut diff = LexPairDiff::new_empty();
        diff.record(open(PairKind::Paren), 0).unwrap();
        diff.record(close(PairKind::Brace), 0).unwrap();
        assert_eq!(diff.leaning(), Leaning::Both);
    }

    #[test]
    fn concat_cancels_across_lines() {
        let mut a = LexPairDiff::new_empty();
        a.record(open(PairKind::DoEnd), 0).unwrap();
        let mut b = LexPairDiff::new_empty();
        b.record(close(PairKind::DoEnd), 1).unwrap();
        a.concat(&b);
        assert!(a.balanced());
    }

    #[test]
    fn concat_is_ordered_not_commutative_in_effect() {
        // open then close cancels; close then open does not (it's an extra
        // close with nothing pending yet, so it remains "right" even though
        // a later open arrives).
        let mut opens_first = LexPairDiff::new_empty();
        opens_first.record(open(PairKind::Paren), 0).unwrap();
        let mut closes = LexPairDiff::new_empty();
        closes.record(close(PairKind::Paren), 1).unwrap();
        let forward = opens_first.concatenated(&closes);
        assert!(forward.balanced());

        let mut closes_first = LexPairDiff::new_empty();
        closes_first.record(close(PairKind::Paren), 0).unwrap();
        let mut opens = LexPairDiff::new_empty();
        opens.record(open(PairKind::Paren), 1).unwrap();
        let backward = closes_first.concatenated(&opens);
        assert_eq!(backward.leaning(), Leaning::Both);
    }

    #[test]
    fn concat_partial_cancellation_leans_left() {
        let mut a = LexPairDiff::new_empty();
        a.record(open(PairKind::DoEnd), 0).unwrap();
        a.record(open(PairKind::DoEnd), 0).unwrap();
        let mut b = LexPairDiff::new_empty();
        b.record(close(PairKind::DoEnd), 1).unwrap();
        a.concat(&b);
        assert_eq!(a.leaning(), Leaning::Left);
        assert_eq!(a.open_count(PairKind::DoEnd), 1);
    }

    #[test]
    fn fold_empty_is_empty() {
        let diffs: Vec<LexPairDiff> = vec![];
        assert!(LexPairDiff::fold(diffs.iter()).balanced());
    }

    #[test]
    fn overflow_is_reported() {
        let mut diff = LexPairDiff::new_empty();
        diff.counts[PairKind::Paren.index()] = (u32::MAX, 0);
        let err = diff.record(open(PairKind::Paren), 7);
        assert!(matches!(err, Err(SuspectError::LexerOverflow { line: 7, .. })));
    }
}
