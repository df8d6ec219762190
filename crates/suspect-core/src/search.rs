/*
 * search.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The top-level entry point: builds the indent tree, drives it to
//! completion while feeding maximal blocks into the frontier, and returns
//! the smallest subset of suspect ranges that explain the parse failure.
//!
//! The design this follows describes the indent-tree driver (growing
//! blocks until none can grow further) and the top-level search (feeding
//! maximal blocks to the frontier, checking after each one) as two
//! separate pseudocode sketches. Read literally they'd run the driver
//! twice — once to build the whole tree, once again walking
//! `document.queue` to hand blocks to the frontier. They are one loop: a
//! node that stops growing is simultaneously "attached to the root" and
//! "fed to the frontier," and the frontier is checked right there before
//! the next pop.

use crate::block::NodeId;
use crate::collaborators::{LexerAdapter, ReferenceParser, SourceCleaner};
use crate::config::SearchConfig;
use crate::document::BlockDocument;
use crate::error::SuspectResult;
use crate::frontier::CodeFrontier;
use crate::lex_diff::Leaning;
use crate::line::build_code_lines;

/// A `(start_line, end_line)` pair, one-based and inclusive, in source
/// order — the consumer-facing unit of result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspectRange {
    pub start_line: u32,
    pub end_line: u32,
}

/// The result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The driver found a frontier whose removal the reference parser
    /// accepted. `ranges` is the minimal subset `detect_invalid_blocks`
    /// could find.
    Resolved(Vec<SuspectRange>),
    /// The driver exhausted the queue without ever getting the reference
    /// parser to accept the redacted document. `ranges` is the best-effort
    /// answer: whatever
    /// `detect_invalid_blocks` could salvage from the frontier's invalid
    /// blocks, possibly empty.
    BestEffort(Vec<SuspectRange>),
}

impl SearchOutcome {
    pub fn ranges(&self) -> &[SuspectRange] {
        match self {
            SearchOutcome::Resolved(r) | SearchOutcome::BestEffort(r) => r,
        }
    }
}

/// Runs the full pipeline: clean, lex, build the indent tree, drive it,
/// and localize the suspect ranges.
///
/// Already-valid input (including empty or all-blank input) returns
/// `Resolved(vec![])` without running the driver at all — these are not
/// errors.
pub fn search(
    source: &str,
    cleaner: &dyn SourceCleaner,
    lexer: &dyn LexerAdapter,
    parser: &dyn ReferenceParser,
    config: &SearchConfig,
) -> SuspectResult<SearchOutcome> {
    if source.trim().is_empty() || parser.valid(source) {
        return Ok(SearchOutcome::Resolved(Vec::new()));
    }

    let mut all_lines = build_code_lines(source, cleaner, lexer)?;
    if all_lines.iter().all(|l| l.empty) {
        return Ok(SearchOutcome::Resolved(Vec::new()));
    }

    let mut doc = BlockDocument::build(all_lines.clone());
    let mut frontier = CodeFrontier::new(all_lines.len() as u32);
    let mut resolved = false;

    while let Some(n) = doc.pop_next() {
        let with_indent = doc.next_indent(n);
        let can_above = doc.expand_above(n, with_indent);
        let can_below = doc.expand_below(n, with_indent);
        let _span = tracing::debug_span!(
            "indent_tree_iteration",
            start = doc.node(n).start_index,
            end = doc.node(n).end_index,
            indent = doc.node(n).indent,
            next_indent = with_indent,
        )
        .entered();

        let grew = if can_above && can_below {
            match doc.node(n).leaning() {
                Leaning::Right => {
                    tracing::debug!(side = "below", reason = "leaning_right", "expanding");
                    doc.capture_below(n);
                    true
                }
                Leaning::Left | Leaning::Both | Leaning::Equal => {
                    tracing::debug!(side = "above", reason = "leaning_default", "expanding");
                    doc.capture_above(n);
                    true
                }
            }
        } else if can_above {
            tracing::debug!(side = "above", reason = "only_option", "expanding");
            doc.capture_above(n);
            true
        } else if can_below {
            tracing::debug!(side = "below", reason = "only_option", "expanding");
            doc.capture_below(n);
            true
        } else {
            false
        };

        if grew {
            continue;
        }

        tracing::debug!("maximal at this tier, attaching to root and feeding the frontier");
        doc.attach_to_root(n);
        let (start, end) = doc.node(n).range();
        for line in &mut all_lines[start as usize..=end as usize] {
            line.visible = false;
        }
        frontier.push(&doc, n, parser, config);
        if frontier.holds_all_syntax_errors(&doc, &all_lines, parser, config) {
            tracing::info!("frontier holds all syntax errors, search resolved");
            resolved = true;
            break;
        }
    }

    if !resolved {
        tracing::info!("queue exhausted without a resolving frontier, falling back to best effort");
    }

    let invalid_ids = frontier.detect_invalid_blocks(&doc, &all_lines, parser, config);
    let ranges = to_ranges(&doc, &invalid_ids);

    Ok(if resolved {
        SearchOutcome::Resolved(ranges)
    } else {
        SearchOutcome::BestEffort(ranges)
    })
}

fn to_ranges(doc: &BlockDocument, ids: &[NodeId]) -> Vec<SuspectRange> {
    let mut ranges: Vec<SuspectRange> = ids
        .iter()
        .map(|id| {
            let (start, end) = doc.node(*id).range();
            SuspectRange {
                start_line: start + 1,
                end_line: end + 1,
            }
        })
        .collect();
    ranges.sort_by_key(|r| r.start_line);
    ranges
}
