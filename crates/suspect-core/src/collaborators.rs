/*
 * collaborators.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Contracts for the three external collaborators the search engine depends
//! on but does not implement itself: the reference parser, the lexer
//! adapter, and the source cleaner. Concrete implementations live outside
//! this crate (see `suspect-lexer`) — the core engine only ever talks to
//! these traits.

use crate::line::CodeLine;
use std::collections::HashSet;

/// Answers "is this program syntactically valid?" and the convenience
/// "...if I omit these lines?" query the frontier drives its search with.
pub trait ReferenceParser {
    /// True iff `text` parses as a complete, valid program.
    fn valid(&self, text: &str) -> bool;

    /// Reconstructs the source with `without_lines` omitted and asks
    /// [`ReferenceParser::valid`]. Provided as a default since it is pure
    /// bookkeeping over `code_lines`; override only if a parser can answer
    /// this more directly (e.g. an incremental parser).
    fn valid_without(&self, without_lines: &[u32], code_lines: &[CodeLine]) -> bool {
        let without: HashSet<u32> = without_lines.iter().copied().collect();
        let text: String = code_lines
            .iter()
            .filter(|line| !without.contains(&line.index))
            .map(|line| line.original.as_str())
            .collect();
        self.valid(&text)
    }
}

/// One line of cleaned source, ready for tokenization.
#[derive(Debug, Clone)]
pub struct CleanedLine {
    /// The line's text with indentation preserved.
    pub text: String,
    /// True if this line is a placeholder for erased content (part of a
    /// collapsed heredoc/multi-line string, or a stripped comment-only
    /// line) and should not be lexed.
    pub hidden: bool,
}

/// Hides comments and collapses heredocs/multi-line strings to blank
/// placeholders, preserving line numbering so every input line maps to
/// exactly one [`CleanedLine`].
pub trait SourceCleaner {
    fn clean(&self, source: &str) -> Vec<CleanedLine>;
}

/// A [`SourceCleaner`] that performs no cleaning: every input line passes
/// through unchanged and is never hidden. Useful when the caller has
/// already cleaned the source, or for languages with no comment/heredoc
/// syntax to erase.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughCleaner;

impl SourceCleaner for PassthroughCleaner {
    fn clean(&self, source: &str) -> Vec<CleanedLine> {
        split_keeping_terminators(source)
            .map(|text| CleanedLine { text: text.to_string(), hidden: false })
            .collect()
    }
}

/// Splits `source` into lines, keeping each line's trailing `\n` attached
/// (matching [`CodeLine::original`]'s contract), without dropping a final
/// line that lacks a trailing newline.
pub(crate) fn split_keeping_terminators(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = source;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find('\n') {
            Some(i) => {
                let (line, remainder) = rest.split_at(i + 1);
                rest = remainder;
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}
