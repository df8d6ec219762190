/*
 * lexer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`RubyLikeLexer`]: the concrete [`LexerAdapter`] for the toy block
//! language — tokenizes one already-cleaned line into the [`PairEvent`]s
//! [`suspect_core::LexPairDiff`] folds over.

use crate::keywords::{ends_with_do, is_end_keyword, opens_block};
use suspect_core::{LexerAdapter, PairEvent, PairKind, PairRole};

/// Strips a trailing block-parameter list (`|x, y|`) so `ends_with_do` sees
/// `arr.each do` instead of `arr.each do |x, y|`. Returns the input
/// unchanged if there is no well-formed trailing `|...|`.
fn strip_trailing_block_params(trimmed: &str) -> &str {
    if !trimmed.ends_with('|') {
        return trimmed;
    }
    let without_close = &trimmed[..trimmed.len() - 1];
    match without_close.rfind('|') {
        Some(open) => without_close[..open].trim_end(),
        None => trimmed,
    }
}

/// A concrete, from-scratch [`LexerAdapter`] for a small Ruby-flavored block
/// language. Recognizes `()[]{}`, every keyword-delimited block opener
/// folded with bare `end` into [`PairKind::DoEnd`] (see that variant's
/// doc comment for why a stateless lexer can't do better than one shared
/// bucket), and skips bracket characters that occur inside a quoted string
/// literal on the same line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RubyLikeLexer;

impl LexerAdapter for RubyLikeLexer {
    fn tokenize(&self, line_text: &str) -> Vec<PairEvent> {
        let trimmed = strip_trailing_block_params(line_text.trim());
        let mut events = Vec::new();

        if opens_block(trimmed) {
            events.push(PairEvent { kind: PairKind::DoEnd, role: PairRole::Open });
        }
        if is_end_keyword(trimmed) {
            events.push(PairEvent { kind: PairKind::DoEnd, role: PairRole::Close });
        }

        let mut quote: Option<char> = None;
        let mut chars = line_text.chars().peekable();
        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next(); // skip the escaped character
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '(' => events.push(PairEvent { kind: PairKind::Paren, role: PairRole::Open }),
                ')' => events.push(PairEvent { kind: PairKind::Paren, role: PairRole::Close }),
                '[' => events.push(PairEvent { kind: PairKind::Bracket, role: PairRole::Open }),
                ']' => events.push(PairEvent { kind: PairKind::Bracket, role: PairRole::Close }),
                '{' => events.push(PairEvent { kind: PairKind::Brace, role: PairRole::Open }),
                '}' => events.push(PairEvent { kind: PairKind::Brace, role: PairRole::Close }),
                _ => {}
            }
        }
        events
    }
}
