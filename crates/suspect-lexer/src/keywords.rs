/*
 * keywords.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The toy language's keyword tables.
//!
//! Every opener below shares one [`suspect_core::PairKind::DoEnd`] bucket
//! with the trailing-`do` block form — see the note on that variant in
//! `suspect-core`: a stateless per-line lexer can't tell which keyword a
//! bare `end` closes without a stack, so there is no point minting one
//! [`suspect_core::PairKind`] per keyword here. [`ReferenceParser`]
//! (src/parser.rs) *does* keep a stack, and uses these same tables to
//! validate nesting properly; the lexer and the parser are different
//! collaborators answering different questions.

/// Keywords that open a new block and expect a matching `end`.
pub(crate) const BLOCK_OPENERS: &[&str] = &[
    "def", "class", "module", "if", "unless", "while", "until", "for", "case", "begin",
];

/// Keywords that continue the current block without opening or closing one
/// (`elsif`/`else` inside `if`, `when`/`in` inside `case`, `rescue`/`ensure`
/// inside `begin`). The parser requires these to appear with a block
/// already open; the lexer ignores them entirely (they are balance-neutral).
pub(crate) const MID_BLOCK_KEYWORDS: &[&str] = &["elsif", "else", "when", "in", "rescue", "ensure"];

/// True if `trimmed` is exactly `keyword`, or `keyword` followed by a
/// non-identifier character (space, `(`, `!`, `?`) — cheap word-boundary
/// check without a regex per call.
pub(crate) fn starts_with_keyword(trimmed: &str, keyword: &str) -> bool {
    trimmed == keyword
        || trimmed
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.starts_with(|c: char| !is_ident_char(c)))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if `trimmed` opens a `do ... end` block via a trailing `do`
/// (`arr.each do |x|`), distinct from the standalone keyword openers.
pub(crate) fn ends_with_do(trimmed: &str) -> bool {
    trimmed == "do" || trimmed.ends_with(" do") || trimmed.ends_with(") do") || trimmed.ends_with("| do")
}

/// True if `trimmed` is a bare `end` keyword closing some block (allowing a
/// trailing comment marker or argument-free suffix like `end.freeze`), or
/// ends with one as the last word on the line (the one-liner form, e.g.
/// `if x then y end`).
pub(crate) fn is_end_keyword(trimmed: &str) -> bool {
    trimmed == "end"
        || trimmed.starts_with("end ")
        || trimmed.starts_with("end.")
        || trimmed.starts_with("end#")
        || ends_with_word(trimmed, "end")
}

/// True if `trimmed` ends with `word` as a whole token: either `word` is the
/// entire line, or the character just before it is not an identifier
/// character.
fn ends_with_word(trimmed: &str, word: &str) -> bool {
    match trimmed.strip_suffix(word) {
        Some(prefix) => prefix.is_empty() || prefix.ends_with(|c: char| !is_ident_char(c)),
        None => false,
    }
}

/// True if `trimmed` opens a block: either a keyword opener or a trailing
/// `do`.
pub(crate) fn opens_block(trimmed: &str) -> bool {
    BLOCK_OPENERS.iter().any(|kw| starts_with_keyword(trimmed, kw)) || ends_with_do(trimmed)
}

pub(crate) fn is_mid_block_keyword(trimmed: &str) -> bool {
    MID_BLOCK_KEYWORDS.iter().any(|kw| starts_with_keyword(trimmed, kw))
}
