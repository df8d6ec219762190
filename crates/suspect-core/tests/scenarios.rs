//! End-to-end scenario tests driven through the public `search` entry
//! point, using the toy Ruby-flavoured collaborators under
//! `suspect_core::test_support`.

use suspect_core::test_support::{ToyCommentCleaner, ToyRubyLexer, ToyRubyParser};
use suspect_core::{
    build_code_lines, search, BlockDocument, Leaning, ReferenceParser, SearchConfig, SearchOutcome, SuspectRange,
};

fn run(source: &str) -> SearchOutcome {
    search(source, &ToyCommentCleaner, &ToyRubyLexer, &ToyRubyParser, &SearchConfig::default())
        .expect("search should not error on well-formed toy input")
}

// Scenario A: a `def` whose `end` was consumed by an inner `if/else/end`,
// leaving the outer `def` unterminated.
#[test]
fn missing_end_is_localized() {
    let source = "\
def on_args_add(arguments, argument)
  if arguments.parts.empty?
    Args.new(parts: [argument])
  else
    Args.new(parts: arguments.parts << argument)
  end
# end missing here

class Bar
end
";
    assert!(!ToyRubyParser.valid(source), "fixture should actually be invalid");

    let outcome = run(source);
    assert_eq!(
        outcome.ranges(),
        &[SuspectRange { start_line: 1, end_line: 1 }],
        "the unterminated def's own opening line is the minimal suspect range"
    );

    let lines = build_code_lines(source, &ToyCommentCleaner, &ToyRubyLexer).unwrap();
    let mut doc = BlockDocument::build(lines);
    doc.build_tree();
    assert_eq!(doc.root_parents().len(), 3, "def-group, blank line, and class Bar...end each stand alone at the root");
    assert_eq!(doc.node(doc.root_parents()[0]).leaning(), Leaning::Left);
}

// Scenario B: a balanced `def` with an inner `if/else/end` — a fully valid
// program, so the search must short-circuit to an empty result without
// ever invoking the driver.
#[test]
fn balanced_if_else_end_is_already_valid() {
    let source = "\
def choose(flag)
  if flag
    1
  else
    2
  end
end
";
    assert!(ToyRubyParser.valid(source));
    let outcome = run(source);
    assert_eq!(outcome, SearchOutcome::Resolved(Vec::new()));
}

// Scenario C: a stray closing `end` with no matching opener.
#[test]
fn stray_end_is_localized() {
    let source = "\
Foo.call
  def foo
    print \"lol\"
   end
end
";
    assert!(!ToyRubyParser.valid(source));

    let outcome = run(source);
    assert_eq!(
        outcome.ranges(),
        &[SuspectRange { start_line: 5, end_line: 5 }],
        "the stray trailing end is the minimal suspect range"
    );

    let lines = build_code_lines(source, &ToyCommentCleaner, &ToyRubyLexer).unwrap();
    let mut doc = BlockDocument::build(lines);
    doc.build_tree();
    assert_eq!(doc.root_leaning(), Leaning::Right);
}

// Scenario D: three sibling `if ... end` blocks, independently valid.
#[test]
fn three_sibling_blocks_are_already_valid() {
    let source = "\
if a
  1
end
if b
  2
end
if c
  3
end
";
    assert!(ToyRubyParser.valid(source));
    let outcome = run(source);
    assert_eq!(outcome, SearchOutcome::Resolved(Vec::new()));
}

// Scenario F: interval-tree engulfing — covered directly against
// BinaryIntervalTree/CodeFrontier in src/frontier.rs's own unit tests,
// since that's the unit actually responsible for the invariant.
