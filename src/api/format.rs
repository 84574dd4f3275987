use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use serde_json::Value;

/// Returns true when every item of a strftime pattern is understood by chrono.
pub fn is_valid_date_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Response keys holding store-maintained timestamps
pub const TIMESTAMP_FIELDS: [&str; 2] = ["createTime", "updateTime"];

/// Rewrite the RFC 3339 timestamps inside `value` using `pattern`.
///
/// Only string values under a [`TIMESTAMP_FIELDS`] key are touched, at any
/// depth; caller-supplied text that merely looks like a timestamp is kept.
pub fn reformat_dates(value: &mut Value, pattern: &str) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(|v| reformat_dates(v, pattern)),
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if TIMESTAMP_FIELDS.contains(&key.as_str()) {
                    if let Value::String(s) = v {
                        if let Some(formatted) = format_timestamp(s, pattern) {
                            *s = formatted;
                        }
                        continue;
                    }
                }
                reformat_dates(v, pattern);
            }
        }
        _ => {}
    }
}

fn format_timestamp(raw: &str, pattern: &str) -> Option<String> {
    // Cheap shape check before attempting a full parse
    if raw.len() < 20 || raw.as_bytes().get(10) != Some(&b'T') {
        return None;
    }
    let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
    let mut out = String::with_capacity(pattern.len() + 8);
    write!(out, "{}", parsed.naive_local().format(pattern)).ok()?;
    Some(out)
}
