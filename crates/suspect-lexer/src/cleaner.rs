/*
 * cleaner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! [`RubyLikeCleaner`]: the concrete [`SourceCleaner`] for the toy block
//! language. Strips trailing `#` comments (quote-aware) and collapses
//! heredoc bodies to hidden placeholder lines, preserving line numbering so
//! every input line still maps to exactly one [`CleanedLine`].

use once_cell::sync::Lazy;
use regex::Regex;
use suspect_core::{CleanedLine, SourceCleaner};

/// Matches a heredoc opener: `<<~ID`, `<<-ID`, `<<ID`, or quoted variants
/// (`<<~"ID"`, `<<-'ID'`). Capture group 2 is the terminator identifier.
static HEREDOC_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<<([-~]?)(['"]?)([A-Za-z_][A-Za-z0-9_]*)\2"#).unwrap());

/// Strips a trailing `#...` comment from `line`, respecting single/double
/// quoted strings (a `#` inside a string literal is not a comment marker).
/// Returns `(without_comment, was_comment_only)`.
fn strip_comment(line: &str) -> (&str, bool) {
    let mut quote: Option<char> = None;
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
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
            '#' => {
                let without = &line[..i];
                let comment_only = without.trim().is_empty();
                return (without, comment_only);
            }
            _ => {}
        }
    }
    (line, false)
}

/// True if `trimmed` (a candidate heredoc terminator line) closes a heredoc
/// opened with terminator `ident`. Squiggly (`~`) and dash (`-`) heredocs
/// allow the terminator to be indented; plain `<<ID` requires column zero.
fn closes_heredoc(line: &str, ident: &str, allow_indent: bool) -> bool {
    if allow_indent {
        line.trim() == ident
    } else {
        line.trim_end_matches(['\n', '\r']) == ident
    }
}

/// The concrete [`SourceCleaner`] for the toy Ruby-flavored block language.
#[derive(Debug, Default, Clone, Copy)]
pub struct RubyLikeCleaner;

impl SourceCleaner for RubyLikeCleaner {
    fn clean(&self, source: &str) -> Vec<CleanedLine> {
        let raw_lines: Vec<&str> = split_keeping_terminators(source).collect();
        let mut out = Vec::with_capacity(raw_lines.len());
        let mut i = 0;
        while i < raw_lines.len() {
            let line = raw_lines[i];
            let (without_comment, comment_only) = strip_comment(line);

            if let Some(caps) = HEREDOC_OPENER.captures(without_comment) {
                let allow_indent = &caps[1] == "~" || &caps[1] == "-";
                let ident = caps[3].to_string();
                out.push(CleanedLine {
                    text: blank_keep_newline(without_comment, line),
                    hidden: comment_only,
                });
                i += 1;
                while i < raw_lines.len() && !closes_heredoc(raw_lines[i], &ident, allow_indent) {
                    out.push(CleanedLine { text: "\n".to_string(), hidden: true });
                    i += 1;
                }
                if i < raw_lines.len() {
                    // The terminator line itself carries no lexical content.
                    out.push(CleanedLine { text: "\n".to_string(), hidden: true });
                    i += 1;
                }
                continue;
            }

            out.push(CleanedLine {
                text: if comment_only {
                    blank_keep_newline(without_comment, line)
                } else {
                    without_comment.to_string()
                },
                hidden: comment_only,
            });
            i += 1;
        }
        out
    }
}

/// `without_comment` trimmed to empty text but with `original`'s trailing
/// newline preserved, so comment-only lines still count toward line numbering.
fn blank_keep_newline(without_comment: &str, original: &str) -> String {
    if without_comment.is_empty() && original.ends_with('\n') {
        "\n".to_string()
    } else {
        without_comment.to_string()
    }
}

/// Splits `source` into lines, keeping each line's trailing `\n` attached.
fn split_keeping_terminators(source: &str) -> impl Iterator<Item = &str> {
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
