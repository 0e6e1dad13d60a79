//! Inline formatting: one line of markdown into styled text runs.
//!
//! Recognised markers, checked in this order at every position:
//!
//! | Marker | Result |
//! |---|---|
//! | `**text**` | bold run |
//! | `*text*` | italic run |
//! | `_text_` | italic run |
//! | `[text](url)` | plain run carrying a link |
//!
//! The scan is a single left-to-right pass. The earliest match wins, ties go to the marker listed
//! first, closing delimiters are non-greedy and markers never nest. There is no escape syntax, so
//! a stray pair of `*` or `_` (for example in `snake_case_name`) is treated as formatting.

use serde::Serialize;
use std::sync::LazyLock;

use regex::Regex;

static INLINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|_(.+?)_|\[(.+?)\]\((.+?)\)")
        .expect("inline pattern is a valid regex")
});

/// Visual style of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Plain,
    Bold,
    Italic,
}

/// A contiguous span of text sharing one style and an optional link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    content: String,
    style: TextStyle,
    link: Option<String>,
}

impl TextRun {
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, TextStyle::Plain)
    }

    pub fn styled(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
            link: None,
        }
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: TextStyle::Plain,
            link: Some(url.into()),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn url(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

/// Splits a single line into styled runs.
///
/// Text outside any marker becomes plain runs. A line without markers, including the empty line,
/// comes back as exactly one plain run holding the whole input.
pub fn parse_inline(line: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last_end = 0;

    for caps in INLINE_PATTERN.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if whole.start() > last_end {
            runs.push(TextRun::plain(&line[last_end..whole.start()]));
        }

        let run = if let Some(text) = caps.get(1) {
            TextRun::styled(text.as_str(), TextStyle::Bold)
        } else if let Some(text) = caps.get(2).or_else(|| caps.get(3)) {
            TextRun::styled(text.as_str(), TextStyle::Italic)
        } else {
            match (caps.get(4), caps.get(5)) {
                (Some(text), Some(url)) => TextRun::link(text.as_str(), url.as_str()),
                _ => TextRun::plain(whole.as_str()),
            }
        };
        runs.push(run);
        last_end = whole.end();
    }

    if last_end < line.len() {
        runs.push(TextRun::plain(&line[last_end..]));
    }

    if runs.is_empty() {
        runs.push(TextRun::plain(line));
    }

    runs
}

/// Concatenated visible text of a run sequence.
pub fn visible_text(runs: &[TextRun]) -> String {
    runs.iter().map(TextRun::content).collect()
}

// Wire shape expected by the remote `rich_text` arrays.

#[derive(Serialize)]
struct WireRun<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: WireText<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<WireAnnotations>,
}

#[derive(Serialize)]
struct WireText<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<WireLink<'a>>,
}

#[derive(Serialize)]
struct WireLink<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct WireAnnotations {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    italic: bool,
}

impl Serialize for TextRun {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let annotations = match self.style {
            TextStyle::Plain => None,
            TextStyle::Bold => Some(WireAnnotations {
                bold: true,
                italic: false,
            }),
            TextStyle::Italic => Some(WireAnnotations {
                bold: false,
                italic: true,
            }),
        };
        WireRun {
            kind: "text",
            text: WireText {
                content: &self.content,
                link: self.link.as_deref().map(|url| WireLink { url }),
            },
            annotations,
        }
        .serialize(serializer)
    }
}
