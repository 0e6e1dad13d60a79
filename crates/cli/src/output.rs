//! Terminal rendering for command results.

use ntn_core::display::{block_preview, object_title, property_value, short_date};
use ntn_core::RemoteBlock;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

const ROW_COLUMNS: usize = 5;

/// Renders `header` and `rows` as a bordered table.
fn table<R>(header: Vec<String>, rows: R) -> String
where
    R: IntoIterator<Item = Vec<String>>,
{
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    builder.build().with(Style::modern()).to_string()
}

fn str_field<'a>(item: &'a Value, key: &str) -> &'a str {
    item.get(key).and_then(Value::as_str).unwrap_or_default()
}

pub fn search_results(results: &[Value]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    table(
        vec!["Type".into(), "Title".into(), "ID".into()],
        results.iter().map(|item| {
            vec![
                str_field(item, "object").to_string(),
                object_title(item),
                str_field(item, "id").to_string(),
            ]
        }),
    )
}

pub fn databases(databases: &[Value]) -> String {
    if databases.is_empty() {
        return "No databases found.".to_string();
    }
    table(
        vec!["Title".into(), "ID".into(), "Last Edited".into()],
        databases.iter().map(|db| {
            vec![
                object_title(db),
                str_field(db, "id").to_string(),
                short_date(str_field(db, "last_edited_time")),
            ]
        }),
    )
}

/// Rows of a database query, showing the first few schema properties.
pub fn database_rows(rows: &[Value], schema: &Value) -> String {
    if rows.is_empty() {
        return "No rows found.".to_string();
    }
    let names: Vec<&String> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().take(ROW_COLUMNS).collect())
        .unwrap_or_default();

    let header: Vec<String> = std::iter::once("ID".to_string())
        .chain(names.iter().map(|n| n.to_string()))
        .collect();
    let cells = rows.iter().map(|row| {
        let id: String = str_field(row, "id").chars().take(8).collect();
        std::iter::once(format!("{}...", id))
            .chain(names.iter().map(|name| {
                row.get("properties")
                    .and_then(|props| props.get(name.as_str()))
                    .map(property_value)
                    .unwrap_or_default()
            }))
            .collect::<Vec<String>>()
    });
    table(header, cells)
}

pub fn page(page: &Value, content: &[RemoteBlock]) -> String {
    let mut out = vec![
        object_title(page),
        format!("ID: {}", str_field(page, "id")),
        format!(
            "Created: {} | Last edited: {}",
            short_date(str_field(page, "created_time")),
            short_date(str_field(page, "last_edited_time"))
        ),
        String::new(),
    ];
    let previews: Vec<String> = content.iter().filter_map(block_preview).collect();
    if previews.is_empty() {
        out.push("No content".to_string());
    } else {
        out.push("Content:".to_string());
        out.extend(previews);
    }
    out.join("\n")
}

pub fn json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
