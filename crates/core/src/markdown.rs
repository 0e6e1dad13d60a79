//! Markdown to block conversion.
//!
//! The converter is line-local: every non-blank line becomes at most one block and no block
//! spans lines, so consecutive bullets become sibling blocks rather than a nested list. Each line
//! is tested against [`RULES`] in order and the first matching rule decides what it becomes.
//!
//! Supported line shapes:
//! - `# `, `## `, `### ` headings
//! - `---` divider
//! - `- [x] ` / `- [X] ` / `- [ ] ` to-do items
//! - `- ` bulleted items
//! - `1. ` numbered items (a digit, then `. ` within the first four characters)
//! - `|` table rows, flattened to one paragraph per row; separator rows are dropped
//! - anything else is a paragraph
//!
//! Text content of every rule except table rows goes through [`parse_inline`].

use crate::blocks::Block;
use crate::rich_text::{parse_inline, TextRun};

/// Ordered block sequence for one page.
pub type Document = Vec<Block>;

/// What a rule does with a line it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineOutcome {
    Emit(Block),
    /// The line is consumed without producing a block (table separator rows).
    Skip,
}

struct Rule {
    name: &'static str,
    matches: fn(&str) -> bool,
    build: fn(&str) -> LineOutcome,
}

/// Classification rules in precedence order.
///
/// Longer heading prefixes come before shorter ones, and checked to-dos before unchecked ones
/// before plain bullets, because every test is a plain string prefix check.
const RULES: &[Rule] = &[
    Rule {
        name: "heading_3",
        matches: |line| line.starts_with("### "),
        build: |line| LineOutcome::Emit(Block::Heading3(parse_inline(&line[4..]))),
    },
    Rule {
        name: "heading_2",
        matches: |line| line.starts_with("## "),
        build: |line| LineOutcome::Emit(Block::Heading2(parse_inline(&line[3..]))),
    },
    Rule {
        name: "heading_1",
        matches: |line| line.starts_with("# "),
        build: |line| LineOutcome::Emit(Block::Heading1(parse_inline(&line[2..]))),
    },
    Rule {
        name: "divider",
        matches: |line| line.trim() == "---",
        build: |_| LineOutcome::Emit(Block::Divider),
    },
    Rule {
        name: "todo_checked",
        matches: |line| line.starts_with("- [x] ") || line.starts_with("- [X] "),
        build: |line| {
            LineOutcome::Emit(Block::Todo {
                text: parse_inline(&line[6..]),
                checked: true,
            })
        },
    },
    Rule {
        name: "todo_unchecked",
        matches: |line| line.starts_with("- [ ] "),
        build: |line| {
            LineOutcome::Emit(Block::Todo {
                text: parse_inline(&line[6..]),
                checked: false,
            })
        },
    },
    Rule {
        name: "bulleted_item",
        matches: |line| line.starts_with("- "),
        build: |line| LineOutcome::Emit(Block::BulletedItem(parse_inline(&line[2..]))),
    },
    Rule {
        name: "numbered_item",
        matches: is_numbered_item,
        build: |line| {
            let content = line.split_once(". ").map_or(line, |(_, rest)| rest);
            LineOutcome::Emit(Block::NumberedItem(parse_inline(content)))
        },
    },
    Rule {
        name: "table_row",
        matches: |line| line.starts_with('|'),
        build: table_row,
    },
    Rule {
        name: "paragraph",
        matches: |_| true,
        build: |line| LineOutcome::Emit(Block::Paragraph(parse_inline(line))),
    },
];

/// Numbered markers: a leading ASCII digit and `. ` somewhere in the first four characters.
///
/// This accepts `1.` through `99.` but not `100.`; wider markers fall through to paragraphs.
fn is_numbered_item(line: &str) -> bool {
    let starts_with_digit = line.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !starts_with_digit {
        return false;
    }
    let window_end = line
        .char_indices()
        .nth(4)
        .map_or(line.len(), |(idx, _)| idx);
    line[..window_end].contains(". ")
}

fn table_row(line: &str) -> LineOutcome {
    if line.contains("---") {
        return LineOutcome::Skip;
    }
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    let cells: Vec<&str> = inner.split('|').map(str::trim).collect();
    LineOutcome::Emit(Block::Paragraph(vec![TextRun::plain(cells.join(" | "))]))
}

fn classify_line(line: &str) -> LineOutcome {
    RULES
        .iter()
        .find(|rule| (rule.matches)(line))
        .map(|rule| {
            tracing::trace!(rule = rule.name, "classified line");
            (rule.build)(line)
        })
        // The paragraph rule matches everything, so this is never reached.
        .unwrap_or_else(|| LineOutcome::Emit(Block::Paragraph(parse_inline(line))))
}

/// Converts markdown text into an ordered block sequence.
///
/// Leading and trailing whitespace of the whole text is ignored and blank lines produce nothing.
/// Every other line yields exactly one block, except table separator rows which yield none.
pub fn to_blocks(markdown: &str) -> Document {
    markdown
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match classify_line(line) {
            LineOutcome::Emit(block) => Some(block),
            LineOutcome::Skip => None,
        })
        .collect()
}
