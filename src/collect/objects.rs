use anyhow::{Context, Result};
use chrono::DateTime;
use serde_json::Value;
use std::sync::Arc;

use crate::record::{Record, ResourceSchema};

/// Attributes exported in Snowflake's `show` timestamp format
const TIMESTAMP_ATTRIBUTES: &[&str] = &["start_timestamp", "end_timestamp"];
const SHOW_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Build records from attribute-shaped rows, skipping excluded names
///
/// Object rows describe one object each, so they are never consolidated.
pub fn collect_objects(
    schema: &Arc<ResourceSchema>,
    rows: Vec<Value>,
    excluded_names: &[String],
) -> Result<Vec<Record>> {
    let mut records = Vec::with_capacity(rows.len());

    for (idx, mut row) in rows.into_iter().enumerate() {
        if is_excluded(&row, excluded_names) {
            continue;
        }

        normalize_timestamps(&mut row);

        let record = Record::from_json(schema, &row)
            .with_context(|| format!("Invalid {} row {}", schema.type_name(), idx + 1))?;
        records.push(record);
    }

    Ok(records)
}

fn is_excluded(row: &Value, excluded_names: &[String]) -> bool {
    row.get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| excluded_names.iter().any(|excluded| excluded == name))
}

/// Rewrite `show` timestamps such as `2024-01-01 00:00:00.000 -0800` as RFC 3339
fn normalize_timestamps(row: &mut Value) {
    for attribute in TIMESTAMP_ATTRIBUTES {
        if let Some(Value::String(raw)) = row.get_mut(*attribute)
            && let Some(normalized) = normalize_timestamp(raw)
        {
            *raw = normalized;
        }
    }
}

pub fn normalize_timestamp(raw: &str) -> Option<String> {
    // Date and time are separated by a space, the offset optionally so
    let compact = raw.trim().replacen(' ', "T", 1).replace(' ', "");

    DateTime::parse_from_str(&compact, SHOW_TIMESTAMP_FORMAT)
        .ok()
        .map(|timestamp| timestamp.to_rfc3339())
}
