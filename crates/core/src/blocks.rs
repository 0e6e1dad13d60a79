//! Structural blocks produced from markdown and submitted to the remote store.
//!
//! A [`Block`] is a value object: it is built once by the classifier, never mutated and consumed
//! by a single append call. Serialising a block yields the JSON object the append endpoint
//! expects, for example:
//!
//! ```json
//! {"object": "block", "type": "to_do", "to_do": {"rich_text": [...], "checked": true}}
//! ```

use crate::rich_text::{visible_text, TextRun};
use serde::ser::SerializeMap;
use serde::Serialize;

/// Kind of a block, named after the remote `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Divider,
    Todo,
    BulletedItem,
    NumberedItem,
    Paragraph,
}

impl BlockKind {
    /// The remote `type` string for this kind.
    pub fn api_name(self) -> &'static str {
        match self {
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::Divider => "divider",
            BlockKind::Todo => "to_do",
            BlockKind::BulletedItem => "bulleted_list_item",
            BlockKind::NumberedItem => "numbered_list_item",
            BlockKind::Paragraph => "paragraph",
        }
    }

    pub fn from_api_name(name: &str) -> Option<Self> {
        Some(match name {
            "heading_1" => BlockKind::Heading1,
            "heading_2" => BlockKind::Heading2,
            "heading_3" => BlockKind::Heading3,
            "divider" => BlockKind::Divider,
            "to_do" => BlockKind::Todo,
            "bulleted_list_item" => BlockKind::BulletedItem,
            "numbered_list_item" => BlockKind::NumberedItem,
            "paragraph" => BlockKind::Paragraph,
            _ => return None,
        })
    }

    /// Whether blocks of this kind carry rich text.
    pub fn has_text(self) -> bool {
        !matches!(self, BlockKind::Divider)
    }
}

/// One structural unit of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading1(Vec<TextRun>),
    Heading2(Vec<TextRun>),
    Heading3(Vec<TextRun>),
    Divider,
    Todo { text: Vec<TextRun>, checked: bool },
    BulletedItem(Vec<TextRun>),
    NumberedItem(Vec<TextRun>),
    Paragraph(Vec<TextRun>),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading1(_) => BlockKind::Heading1,
            Block::Heading2(_) => BlockKind::Heading2,
            Block::Heading3(_) => BlockKind::Heading3,
            Block::Divider => BlockKind::Divider,
            Block::Todo { .. } => BlockKind::Todo,
            Block::BulletedItem(_) => BlockKind::BulletedItem,
            Block::NumberedItem(_) => BlockKind::NumberedItem,
            Block::Paragraph(_) => BlockKind::Paragraph,
        }
    }

    /// Rich text content; `None` only for dividers.
    pub fn text(&self) -> Option<&[TextRun]> {
        match self {
            Block::Heading1(text)
            | Block::Heading2(text)
            | Block::Heading3(text)
            | Block::BulletedItem(text)
            | Block::NumberedItem(text)
            | Block::Paragraph(text)
            | Block::Todo { text, .. } => Some(text),
            Block::Divider => None,
        }
    }

    /// Visible text with formatting markers removed.
    pub fn plain_text(&self) -> String {
        self.text().map(visible_text).unwrap_or_default()
    }

    pub fn checked(&self) -> Option<bool> {
        match self {
            Block::Todo { checked, .. } => Some(*checked),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct TextBody<'a> {
    rich_text: &'a [TextRun],
    #[serde(skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
}

#[derive(Serialize)]
struct EmptyBody {}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let kind = self.kind().api_name();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", kind)?;
        match self.text() {
            Some(rich_text) => map.serialize_entry(
                kind,
                &TextBody {
                    rich_text,
                    checked: self.checked(),
                },
            )?,
            None => map.serialize_entry(kind, &EmptyBody {})?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich_text::TextStyle;
    use serde_json::json;

    #[test]
    fn test_api_names_round_trip() {
        for kind in [
            BlockKind::Heading1,
            BlockKind::Heading2,
            BlockKind::Heading3,
            BlockKind::Divider,
            BlockKind::Todo,
            BlockKind::BulletedItem,
            BlockKind::NumberedItem,
            BlockKind::Paragraph,
        ] {
            assert_eq!(BlockKind::from_api_name(kind.api_name()), Some(kind));
        }
        assert_eq!(BlockKind::from_api_name("code"), None);
    }

    #[test]
    fn test_heading_wire_shape() {
        let block = Block::Heading2(vec![TextRun::plain("Plan")]);
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": {"rich_text": [{"type": "text", "text": {"content": "Plan"}}]}
            })
        );
    }

    #[test]
    fn test_todo_wire_shape_includes_checked() {
        let block = Block::Todo {
            text: vec![TextRun::styled("Ship", TextStyle::Bold)],
            checked: false,
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "object": "block",
                "type": "to_do",
                "to_do": {
                    "rich_text": [
                        {"type": "text", "text": {"content": "Ship"}, "annotations": {"bold": true}}
                    ],
                    "checked": false
                }
            })
        );
    }

    #[test]
    fn test_divider_wire_shape_is_empty_object() {
        assert_eq!(
            serde_json::to_value(Block::Divider).unwrap(),
            json!({"object": "block", "type": "divider", "divider": {}})
        );
    }

    #[test]
    fn test_plain_text_and_accessors() {
        let block = Block::Paragraph(vec![
            TextRun::plain("Read "),
            TextRun::link("this", "https://a.b"),
        ]);
        assert_eq!(block.plain_text(), "Read this");
        assert_eq!(block.checked(), None);
        assert_eq!(Block::Divider.plain_text(), "");
        assert!(Block::Divider.text().is_none());
    }
}
