/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tunables for the search engine.
//!
//! There is no on-disk configuration format here — this is a library with a
//! handful of knobs, not a project with persisted settings — so a plain
//! `Clone + Debug` struct is enough.

/// Tunables controlling the search driver and the final invalid-block
/// selection pass.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Cap on the subset size explored by
    /// [`crate::frontier::CodeFrontier::detect_invalid_blocks`] before giving
    /// up and returning the full invalid set. Combinatorial in the number of
    /// invalid frontier blocks, so keep this small in production; tests that
    /// need the exhaustive oracle should raise it to `usize::MAX`.
    pub max_invalid_subset_size: usize,

    /// Whether [`crate::frontier::CodeFrontier::holds_all_syntax_errors`] may
    /// short-circuit to `false` without invoking the reference parser when no
    /// invalid block has been added since the last check. Disable in tests
    /// that want every check to actually hit the parser.
    pub can_skip_check: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_invalid_subset_size: 6,
            can_skip_check: true,
        }
    }
}
