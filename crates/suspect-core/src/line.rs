/*
 * line.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`CodeLine`]: one logical input line, plus the builder that turns a raw
//! source string into an ordered sequence of them via the cleaner and lexer
//! collaborators.

use crate::collaborators::{LexerAdapter, SourceCleaner};
use crate::error::SuspectResult;
use crate::lex_diff::LexPairDiff;

/// One logical input line. Immutable once built, except for `visible`,
/// which the search driver flips off once a line has been captured into a
/// frontier block.
#[derive(Debug, Clone)]
pub struct CodeLine {
    /// Zero-based line index.
    pub index: u32,
    /// The raw line, including its trailing newline (absent only for a
    /// final line with no terminator).
    pub original: String,
    /// False once this line has been captured into a frontier block and is
    /// no longer under active consideration.
    pub visible: bool,
    /// True when the line is blank, or is a cleaner-erased placeholder.
    pub empty: bool,
    /// Leading whitespace columns, taken from the raw line. Always `0` for
    /// an empty/hidden line, and excluded from block-indent computation
    /// regardless.
    pub indent: u32,
    /// This line's own contribution to lexical balance.
    pub lex_diff: LexPairDiff,
}

impl CodeLine {
    /// Total order used to rank unvisited lines: indent first, then
    /// position, so that among equally-indented candidates the earlier one
    /// sorts first.
    pub fn indent_index(&self) -> (u32, u32) {
        (self.indent, self.index)
    }
}

fn leading_indent(text: &str) -> u32 {
    text.chars().take_while(|c| *c == ' ' || *c == '\t').count() as u32
}

/// Builds the ordered sequence of [`CodeLine`]s for `source`, running it
/// through `cleaner` to erase comments/heredocs/strings and then through
/// `lexer` to compute each visible line's [`LexPairDiff`].
pub fn build_code_lines(
    source: &str,
    cleaner: &dyn SourceCleaner,
    lexer: &dyn LexerAdapter,
) -> SuspectResult<Vec<CodeLine>> {
    let cleaned = cleaner.clean(source);
    let mut lines = Vec::with_capacity(cleaned.len());
    for (i, cleaned_line) in cleaned.into_iter().enumerate() {
        let index = i as u32;
        let trimmed_is_empty = cleaned_line.text.trim().is_empty();
        let empty = cleaned_line.hidden || trimmed_is_empty;
        let indent = if empty { 0 } else { leading_indent(&cleaned_line.text) };

        let mut lex_diff = LexPairDiff::new_empty();
        if !empty {
            for event in lexer.tokenize(&cleaned_line.text) {
                lex_diff.record(event, index)?;
            }
        }

        lines.push(CodeLine {
            index,
            original: cleaned_line.text,
            visible: true,
            empty,
            indent,
            lex_diff,
        });
    }
    Ok(lines)
}
