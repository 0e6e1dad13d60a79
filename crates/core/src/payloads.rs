//! Request bodies for block and property updates.
//!
//! Everything here validates locally and returns `InvalidInput`/`InvalidJson` before any request
//! is made.

use crate::blocks::BlockKind;
use crate::rich_text::parse_inline;
use crate::{NotionError, NotionResult};
use serde_json::{json, Map, Value};

/// Replacement text for an existing block of type `kind`.
///
/// `content` goes through the inline formatter, so `**bold**` and links survive the update.
/// Known kinds without a `rich_text` body (dividers) are rejected here; any other remote type
/// is sent as-is and left to the remote to validate.
pub fn block_text_update(kind: &str, content: &str) -> NotionResult<Value> {
    let kind = kind.trim();
    if kind.is_empty() {
        return Err(NotionError::InvalidInput(
            "could not determine block type".into(),
        ));
    }
    if BlockKind::from_api_name(kind).is_some_and(|known| !known.has_text()) {
        return Err(NotionError::InvalidInput(format!(
            "block type '{}' has no text to update",
            kind
        )));
    }
    let mut payload = Map::new();
    payload.insert(
        kind.to_string(),
        json!({ "rich_text": parse_inline(content) }),
    );
    Ok(Value::Object(payload))
}

/// Parses a raw JSON block update, which must be an object such as
/// `{"paragraph": {"rich_text": [...]}}`.
pub fn parse_block_payload(raw: &str) -> NotionResult<Value> {
    let value: Value = serde_json::from_str(raw).map_err(NotionError::InvalidJson)?;
    if !value.is_object() {
        return Err(NotionError::InvalidInput(
            "block update must be a JSON object".into(),
        ));
    }
    Ok(value)
}

/// Parses a raw JSON database filter. Like block updates, it must be an object.
pub fn parse_filter(raw: &str) -> NotionResult<Value> {
    let value: Value = serde_json::from_str(raw).map_err(NotionError::InvalidJson)?;
    if !value.is_object() {
        return Err(NotionError::InvalidInput(
            "filter must be a JSON object".into(),
        ));
    }
    Ok(value)
}

/// Name of the schema property whose type is `title`.
pub fn title_property_name(schema: &Value) -> Option<&str> {
    schema
        .get("properties")?
        .as_object()?
        .iter()
        .find(|(_, prop)| prop.get("type").and_then(Value::as_str) == Some("title"))
        .map(|(name, _)| name.as_str())
}

/// Property values for a task row. Titles are sent as plain text.
#[derive(Debug, Default, Clone)]
pub struct TaskProperties {
    properties: Map<String, Value>,
}

impl TaskProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, property: &str, title: &str) -> Self {
        self.properties.insert(
            property.to_string(),
            json!({ "title": [{ "text": { "content": title } }] }),
        );
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.properties
            .insert("Status".into(), json!({ "status": { "name": status } }));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_text_update_formats_inline() {
        let payload = block_text_update("paragraph", "a **b**").unwrap();
        assert_eq!(
            payload,
            json!({"paragraph": {"rich_text": [
                {"type": "text", "text": {"content": "a "}},
                {"type": "text", "text": {"content": "b"}, "annotations": {"bold": true}}
            ]}})
        );
    }

    #[test]
    fn test_block_text_update_rejects_textless_types() {
        assert!(matches!(
            block_text_update("divider", "x"),
            Err(NotionError::InvalidInput(_))
        ));
        assert!(matches!(
            block_text_update("  ", "x"),
            Err(NotionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_block_text_update_passes_other_remote_types_through() {
        let payload = block_text_update("quote", "said").unwrap();
        assert_eq!(payload["quote"]["rich_text"][0]["text"]["content"], "said");
        assert!(block_text_update("to_do", "x").is_ok());
    }

    #[test]
    fn test_parse_block_payload() {
        let value = parse_block_payload(r#"{"to_do": {"checked": true}}"#).unwrap();
        assert_eq!(value["to_do"]["checked"], true);

        assert!(matches!(
            parse_block_payload("{not json"),
            Err(NotionError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_block_payload("[1, 2]"),
            Err(NotionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_filter_requires_object() {
        assert!(parse_filter(r#"{"property": "Done", "checkbox": {"equals": true}}"#).is_ok());
        assert!(matches!(
            parse_filter("\"Done\""),
            Err(NotionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_title_property_name() {
        let schema = json!({"properties": {
            "Tags": {"type": "multi_select"},
            "Task name": {"type": "title"}
        }});
        assert_eq!(title_property_name(&schema), Some("Task name"));
        assert_eq!(title_property_name(&json!({"properties": {}})), None);
        assert_eq!(title_property_name(&json!({})), None);
    }

    #[test]
    fn test_task_properties() {
        let props = TaskProperties::new().title("Name", "Ship it").status("Done");
        assert!(!props.is_empty());
        assert_eq!(
            props.into_value(),
            json!({
                "Name": {"title": [{"text": {"content": "Ship it"}}]},
                "Status": {"status": {"name": "Done"}}
            })
        );
        assert!(TaskProperties::new().is_empty());
    }
}
