//! suspect CLI - localizes block-structured syntax errors in a source file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use suspect_core::{search, SearchConfig, SearchOutcome, SuspectRange};
use suspect_lexer::{RubyLikeCleaner, RubyLikeLexer, RubyLikeParser};

#[derive(Parser)]
#[command(name = "suspect")]
#[command(about = "Localize unclosed or mismatched block-structured syntax errors", long_about = None)]
#[command(version)]
struct Cli {
    /// Source file to check
    file: PathBuf,

    /// Cap on the subset size explored when narrowing down which frontier
    /// blocks actually hold the syntax error, before falling back to the
    /// full invalid set.
    #[arg(long, default_value_t = 6)]
    max_subset_size: usize,

    /// Emit the result as a JSON array of `{start_line, end_line}` objects
    /// instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "suspect=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let source = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let config = SearchConfig {
        max_invalid_subset_size: cli.max_subset_size,
        ..SearchConfig::default()
    };

    let outcome = search(&source, &RubyLikeCleaner, &RubyLikeLexer, &RubyLikeParser, &config)
        .context("search failed")?;

    if cli.json {
        print_json(&outcome)?;
    } else {
        print_plain(&cli.file, &outcome);
    }

    std::process::exit(if outcome.ranges().is_empty() { 0 } else { 1 });
}

fn print_plain(file: &std::path::Path, outcome: &SearchOutcome) {
    let ranges = outcome.ranges();
    if ranges.is_empty() {
        println!("{}: no syntax error localized", file.display());
        return;
    }
    let label = match outcome {
        SearchOutcome::Resolved(_) => "suspect region",
        SearchOutcome::BestEffort(_) => "best-effort suspect region (search did not fully resolve)",
    };
    for range in ranges {
        if range.start_line == range.end_line {
            println!("{}:{}: {}", file.display(), range.start_line, label);
        } else {
            println!("{}:{}-{}: {}", file.display(), range.start_line, range.end_line, label);
        }
    }
}

fn print_json(outcome: &SearchOutcome) -> Result<()> {
    #[derive(serde::Serialize)]
    struct Entry {
        start_line: u32,
        end_line: u32,
    }
    #[derive(serde::Serialize)]
    struct Report {
        resolved: bool,
        ranges: Vec<Entry>,
    }

    let resolved = matches!(outcome, SearchOutcome::Resolved(_));
    let ranges: Vec<Entry> = outcome
        .ranges()
        .iter()
        .map(|r: &SuspectRange| Entry { start_line: r.start_line, end_line: r.end_line })
        .collect();

    println!("{}", serde_json::to_string_pretty(&Report { resolved, ranges })?);
    Ok(())
}
