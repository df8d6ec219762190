/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for the search engine.
//!
//! There is deliberately no `NoSolution` variant here: a search that never
//! reaches [`crate::frontier::CodeFrontier::holds_all_syntax_errors`] returns
//! its best-effort answer through [`crate::search::SearchOutcome::BestEffort`]
//! rather than an `Err`.
//!
//! There is also no `ParserUnavailable` variant: [`crate::collaborators::ReferenceParser::valid`]
//! is specified to return a plain `bool`, with no channel for the collaborator
//! itself to fail, so this crate has nothing to construct that variant from.
//! A caller whose own `ReferenceParser` impl can fail (a subprocess call, a
//! missing binary) should surface that through its own error type before
//! ever returning from `valid`.

use thiserror::Error;

/// Errors that can occur while building lines or running the search.
#[derive(Debug, Error)]
pub enum SuspectError {
    /// A lex-pair counter would have exceeded its representable range.
    #[error("lex pair counter overflow for {pair_kind} on line {line}")]
    LexerOverflow { pair_kind: &'static str, line: u32 },
}

/// Result type used throughout the crate.
pub type SuspectResult<T> = Result<T, SuspectError>;
