/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`RubyLikeParser`]: the concrete [`ReferenceParser`] for the toy block
//! language. Unlike [`crate::lexer::RubyLikeLexer`] (stateless, one line at
//! a time) this keeps an explicit stack across the whole text, so it can
//! actually decide whether nesting is well-formed instead of just counting
//! opens and closes — it is the "is this a complete, valid program?" oracle
//! the search engine treats as an external collaborator.

use crate::keywords::{ends_with_do, is_end_keyword, is_mid_block_keyword, starts_with_keyword, BLOCK_OPENERS};
use suspect_core::ReferenceParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Block,
    Paren,
    Bracket,
    Brace,
}

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

/// A from-scratch, line-oriented [`ReferenceParser`] for the toy block
/// language this crate's [`crate::lexer::RubyLikeLexer`] tokenizes: every
/// keyword-delimited block opener plus trailing `do`, balanced against
/// `end`; `()[]{}` balanced independently; quoted strings skipped whole.
/// Not a general Ruby parser — a stand-in concrete enough to exercise
/// `suspect-core` end-to-end. It does not recover from errors and does
/// not localize intra-line problems.
#[derive(Debug, Default, Clone, Copy)]
pub struct RubyLikeParser;

impl RubyLikeParser {
    fn scan(text: &str) -> bool {
        let mut stack: Vec<Marker> = Vec::new();
        for line in text.lines() {
            let trimmed = strip_trailing_block_params(line.trim());

            if BLOCK_OPENERS.iter().any(|kw| starts_with_keyword(trimmed, kw)) || ends_with_do(trimmed) {
                stack.push(Marker::Block);
            } else if is_mid_block_keyword(trimmed) && !stack.contains(&Marker::Block) {
                return false;
            }
            if is_end_keyword(trimmed) {
                match stack.pop() {
                    Some(Marker::Block) => {}
                    _ => return false,
                }
            }

            if !Self::scan_brackets(line, &mut stack) {
                return false;
            }
        }
        stack.is_empty()
    }

    /// Scans `line`'s bracket characters (skipping quoted regions) against
    /// `stack`, pushing on open and popping-and-checking-kind on close.
    /// Returns `false` on a mismatched or unbalanced close.
    fn scan_brackets(line: &str, stack: &mut Vec<Marker>) -> bool {
        let mut quote: Option<char> = None;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '\'' | '"' => quote = Some(c),
                '(' => stack.push(Marker::Paren),
                '[' => stack.push(Marker::Bracket),
                '{' => stack.push(Marker::Brace),
                ')' => {
                    if stack.pop() != Some(Marker::Paren) {
                        return false;
                    }
                }
                ']' => {
                    if stack.pop() != Some(Marker::Bracket) {
                        return false;
                    }
                }
                '}' => {
                    if stack.pop() != Some(Marker::Brace) {
                        return false;
                    }
                }
                _ => {}
            }
        }
        true
    }
}

impl ReferenceParser for RubyLikeParser {
    fn valid(&self, text: &str) -> bool {
        let result = Self::scan(text);
        tracing::trace!(valid = result, len = text.len(), "reference parser checked text");
        result
    }
}
