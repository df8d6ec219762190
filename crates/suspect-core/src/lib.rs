/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! An indentation-directed search engine for localizing block-structured
//! syntax errors.
//!
//! Given a source text a [`collaborators::ReferenceParser`] rejects, this
//! crate finds the smallest set of contiguous line ranges that, once
//! excised, make the remainder parse — the "suspect" regions most likely
//! to hold a missing `end`, an unterminated block, or a stray keyword.
//!
//! This crate owns the search engine only: the tree builder, the
//! lex-pair-diff balance tracking, the interval-tree-pruned frontier, and
//! the driver that ties them together. It does not parse or tokenize
//! anything itself — [`collaborators::ReferenceParser`],
//! [`collaborators::LexerAdapter`] and [`collaborators::SourceCleaner`] are
//! contracts a caller supplies (see the `suspect-lexer` crate for a
//! concrete, non-production implementation of all three).
//!
//! ```
//! use suspect_core::{search, SearchConfig, SearchOutcome};
//! use suspect_core::collaborators::{CleanedLine, LexerAdapter, PassthroughCleaner, ReferenceParser};
//! use suspect_core::lex_diff::{PairEvent, PairKind, PairRole};
//!
//! struct ParenParser;
//! impl ReferenceParser for ParenParser {
//!     fn valid(&self, text: &str) -> bool {
//!         let mut depth = 0i64;
//!         for c in text.chars() {
//!             match c {
//!                 '(' => depth += 1,
//!                 ')' => depth -= 1,
//!                 _ => {}
//!             }
//!             if depth < 0 {
//!                 return false;
//!             }
//!         }
//!         depth == 0
//!     }
//! }
//!
//! struct ParenLexer;
//! impl LexerAdapter for ParenLexer {
//!     fn tokenize(&self, line_text: &str) -> Vec<PairEvent> {
//!         line_text
//!             .chars()
//!             .filter_map(|c| match c {
//!                 '(' => Some(PairEvent { kind: PairKind::Paren, role: PairRole::Open }),
//!                 ')' => Some(PairEvent { kind: PairKind::Paren, role: PairRole::Close }),
//!                 _ => None,
//!             })
//!             .collect()
//!     }
//! }
//!
//! let outcome = search(
//!     "(a\n(b)\n",
//!     &PassthroughCleaner,
//!     &ParenLexer,
//!     &ParenParser,
//!     &SearchConfig::default(),
//! ).unwrap();
//! assert!(matches!(outcome, SearchOutcome::Resolved(_)));
//! ```

pub mod block;
pub mod collaborators;
pub mod config;
pub mod document;
pub mod error;
pub mod frontier;
pub mod interval_tree;
pub mod lex_diff;
pub mod line;
mod search;

pub use block::{BlockNode, NodeId};
pub use collaborators::{CleanedLine, LexerAdapter, PassthroughCleaner, ReferenceParser, SourceCleaner};
pub use config::SearchConfig;
pub use document::BlockDocument;
pub use error::{SuspectError, SuspectResult};
pub use frontier::CodeFrontier;
pub use interval_tree::{BinaryIntervalTree, RangeCmp, RangeCmpRev, RangeKey};
pub use lex_diff::{Leaning, LexPairDiff, PairEvent, PairKind, PairRole};
pub use line::{build_code_lines, CodeLine};
pub use search::{search, SearchOutcome, SuspectRange};

/// Toy collaborators used only by this crate's own integration tests and
/// property tests, exposed across the crate boundary so `tests/` can reach
/// them without duplicating them. Not meant for downstream use — see
/// `suspect-lexer` for that.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use crate::collaborators::{CleanedLine, LexerAdapter, ReferenceParser, SourceCleaner};
    use crate::lex_diff::{PairEvent, PairKind, PairRole};

    /// A minimal Ruby-flavoured lexer: recognizes `(`/`)`, `[`/`]`, `{`/`}`,
    /// and folds every keyword-delimited block opener (`def`, `class`,
    /// `module`, `if`, `unless`, `while`, `until`, `for`, `case`, `begin`,
    /// `do`) together with bare `end` into [`PairKind::DoEnd`] — see the
    /// note on that variant for why a stateless per-line lexer can't do
    /// better than one shared bucket.
    pub struct ToyRubyLexer;

    const BLOCK_OPENERS: &[&str] = &[
        "def", "class", "module", "if", "unless", "while", "until", "for", "case", "begin",
    ];

    fn starts_with_keyword(trimmed: &str, keyword: &str) -> bool {
        trimmed == keyword || trimmed.starts_with(&format!("{keyword} ")) || trimmed.starts_with(&format!("{keyword}("))
    }

    /// True if `trimmed` opens a `do ... end` block via a trailing `do`
    /// (e.g. `arr.each do |x|`), distinct from the standalone keyword
    /// openers in [`BLOCK_OPENERS`].
    fn ends_with_do(trimmed: &str) -> bool {
        trimmed == "do" || trimmed.ends_with(" do") || trimmed.ends_with(") do")
    }

    impl LexerAdapter for ToyRubyLexer {
        fn tokenize(&self, line_text: &str) -> Vec<PairEvent> {
            let trimmed = line_text.trim();
            let mut events = Vec::new();

            if BLOCK_OPENERS.iter().any(|kw| starts_with_keyword(trimmed, kw)) || ends_with_do(trimmed) {
                events.push(PairEvent { kind: PairKind::DoEnd, role: PairRole::Open });
            }
            if trimmed == "end" || trimmed.starts_with("end ") || trimmed.starts_with("end#") {
                events.push(PairEvent { kind: PairKind::DoEnd, role: PairRole::Close });
            }

            for c in line_text.chars() {
                let (kind, role) = match c {
                    '(' => (PairKind::Paren, PairRole::Open),
                    ')' => (PairKind::Paren, PairRole::Close),
                    '[' => (PairKind::Bracket, PairRole::Open),
                    ']' => (PairKind::Bracket, PairRole::Close),
                    '{' => (PairKind::Brace, PairRole::Open),
                    '}' => (PairKind::Brace, PairRole::Close),
                    _ => continue,
                };
                events.push(PairEvent { kind, role });
            }
            events
        }
    }

    /// Strips trailing `#`-comments; does not attempt heredocs or
    /// multi-line strings, since the toy scenarios this supports don't use
    /// them.
    pub struct ToyCommentCleaner;

    impl SourceCleaner for ToyCommentCleaner {
        fn clean(&self, source: &str) -> Vec<CleanedLine> {
            crate::collaborators::split_keeping_terminators(source)
                .map(|line| {
                    let without_comment = match line.find('#') {
                        Some(i) => &line[..i],
                        None => line,
                    };
                    let hidden = without_comment.trim().is_empty() && line.contains('#');
                    CleanedLine {
                        text: if without_comment.is_empty() && line.ends_with('\n') {
                            "\n".to_string()
                        } else {
                            without_comment.to_string()
                        },
                        hidden,
                    }
                })
                .collect()
        }
    }

    /// A stack-based reference parser matching what [`ToyRubyLexer`]
    /// tokenizes: balances `()[]{}`) and a single generic `do`/`end`
    /// bucket. Good enough to drive the scenarios this crate tests against;
    /// not a real Ruby parser.
    pub struct ToyRubyParser;

    impl ReferenceParser for ToyRubyParser {
        fn valid(&self, text: &str) -> bool {
            let mut stack: Vec<PairKind> = Vec::new();
            for line in text.lines() {
                let trimmed = line.trim();
                if BLOCK_OPENERS.iter().any(|kw| starts_with_keyword(trimmed, kw)) || ends_with_do(trimmed) {
                    stack.push(PairKind::DoEnd);
                }
                if trimmed == "end" || trimmed.starts_with("end ") || trimmed.starts_with("end#") {
                    if stack.pop() != Some(PairKind::DoEnd) {
                        return false;
                    }
                }
                for c in line.chars() {
                    match c {
                        '(' => stack.push(PairKind::Paren),
                        '[' => stack.push(PairKind::Bracket),
                        '{' => stack.push(PairKind::Brace),
                        ')' => {
                            if stack.pop() != Some(PairKind::Paren) {
                                return false;
                            }
                        }
                        ']' => {
                            if stack.pop() != Some(PairKind::Bracket) {
                                return false;
                            }
                        }
                        '}' => {
                            if stack.pop() != Some(PairKind::Brace) {
                                return false;
                            }
                        }
                        _ => {}
                    }
                }
            }
            stack.is_empty()
        }
    }
}
