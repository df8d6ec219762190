/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A concrete, from-scratch implementation of `suspect-core`'s three
//! external collaborators (`ReferenceParser`, `LexerAdapter`,
//! `SourceCleaner`) for a small Ruby-flavored block language: `def`/`end`,
//! `if`/`elsif`/`else`/`end`, `class`/`end`, `module`/`end`,
//! `begin`/`rescue`/`ensure`/`end`, `do`/`end`, `case`/`when`/`end`, plus
//! `()[]{}` and string/heredoc/comment erasure.
//!
//! This exists to exercise `suspect-core` end-to-end — in this crate's own
//! tests and from `suspect-cli` — without pretending to be a production
//! Ruby parser. It is a toy, line-oriented stand-in: it does not recover
//! from errors, does not localize intra-line problems, and is not a
//! general-purpose parser.

mod cleaner;
mod keywords;
mod lexer;
mod parser;

pub use cleaner::RubyLikeCleaner;
pub use lexer::RubyLikeLexer;
pub use parser::RubyLikeParser;
