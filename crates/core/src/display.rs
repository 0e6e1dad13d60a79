//! Plain-text rendering of remote objects for terminal output.
//!
//! These read the loosely-typed JSON the API returns and never fail: missing or unexpected fields
//! render as empty strings or placeholders.

use crate::store::RemoteBlock;
use chrono::{DateTime, NaiveDate};
use serde_json::Value;

const UNTITLED: &str = "Untitled";

/// Concatenated `plain_text` of a remote `rich_text` array.
pub fn rich_text_plain(rich_text: &Value) -> String {
    rich_text
        .as_array()
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn first_run(rich_text: Option<&Value>) -> Option<&Value> {
    rich_text?.as_array()?.first()
}

/// `plain_text` of the first run, `Untitled` when that run has none.
fn first_plain_text(rich_text: Option<&Value>) -> Option<&str> {
    first_run(rich_text).map(|run| run.get("plain_text").and_then(Value::as_str).unwrap_or(UNTITLED))
}

/// Display title of a page, database or data source.
pub fn object_title(item: &Value) -> String {
    match item.get("object").and_then(Value::as_str) {
        Some("database") | Some("data_source") => first_plain_text(item.get("title"))
            .or_else(|| item.get("name").and_then(Value::as_str).filter(|n| !n.is_empty()))
            .unwrap_or("Untitled Database")
            .to_string(),
        Some("page") => item
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|props| {
                props
                    .values()
                    .filter(|prop| prop.get("type").and_then(Value::as_str) == Some("title"))
                    .find_map(|prop| first_plain_text(prop.get("title")))
            })
            .unwrap_or("Untitled Page")
            .to_string(),
        _ => "Unknown".to_string(),
    }
}

fn named(value: Option<&Value>) -> String {
    value
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn text_field(prop: &Value, key: &str) -> String {
    prop.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Display value of a database row property.
pub fn property_value(prop: &Value) -> String {
    let kind = prop.get("type").and_then(Value::as_str).unwrap_or_default();
    match kind {
        "title" | "rich_text" => first_run(prop.get(kind))
            .and_then(|run| run.get("plain_text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        "number" => match prop.get("number") {
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        },
        "select" | "status" => named(prop.get(kind)),
        "multi_select" => prop
            .get("multi_select")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .map(|opt| opt.get("name").and_then(Value::as_str).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default(),
        "date" => prop
            .get("date")
            .and_then(|d| d.get("start"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        "checkbox" => {
            if prop.get("checkbox").and_then(Value::as_bool).unwrap_or(false) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        "url" | "email" | "phone_number" => text_field(prop, kind),
        other => format!("[{}]", other),
    }
}

/// Calendar date of an API timestamp, e.g. `2024-03-01` for `2024-03-01T09:30:00.000Z`.
pub fn short_date(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.date_naive().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") {
        return date.to_string();
    }
    timestamp.chars().take(10).collect()
}

/// Text preview of one remote block, `None` for empty paragraphs.
///
/// Code blocks span several lines; every other type renders on one.
pub fn block_preview(block: &RemoteBlock) -> Option<String> {
    let body = block.content();
    let text = body
        .and_then(|b| b.get("rich_text"))
        .map(rich_text_plain)
        .unwrap_or_default();

    let preview = match block.kind.as_str() {
        "paragraph" if text.is_empty() => return None,
        "paragraph" | "heading_1" | "heading_2" | "heading_3" => text,
        "bulleted_list_item" => format!("* {}", text),
        "numbered_list_item" => format!("1. {}", text),
        "to_do" => {
            let checked = body
                .and_then(|b| b.get("checked"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            format!("{} {}", if checked { "[x]" } else { "[ ]" }, text)
        }
        "code" => {
            let language = body
                .and_then(|b| b.get("language"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            format!("```{}\n{}\n```", language, text)
        }
        "divider" => "---".to_string(),
        other => format!("[{}]", other),
    };
    Some(preview)
}
