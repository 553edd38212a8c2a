use chrono::DateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref COMPACT_DURATION: Regex =
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("duration pattern is valid");
    static ref LOOSE_DATE_TIME: Regex = Regex::new(
        r"^(\S+?)[T ](\d{1,2}:\d{2}(?::\d{2})?)(?:\.\d+)?(?:Z|[+-]\d{2}(?::?\d{2})?)?$"
    )
    .expect("date-time pattern is valid");
}

/// Walks `path` through nested JSON objects and returns the leaf as a string.
///
/// Strings are copied, numbers and booleans are rendered; anything else (missing key,
/// null, array, object) yields `default`.
pub fn get_or_default(container: &Value, path: &[&str], default: &str) -> String {
    let mut current = container;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return default.to_string(),
        }
    }

    match current {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Turns a compact duration (PT1H2M3S) into colon-joined `H:M:S`.
///
/// Strings without the `PT` marker are returned as they are, and so is anything that
/// starts with the marker but does not parse.
pub fn normalize_duration(duration: &str) -> String {
    if !duration.starts_with("PT") {
        return duration.to_string();
    }

    let Some(captures) = COMPACT_DURATION.captures(duration) else {
        return duration.to_string();
    };

    let mut parts = [0u64; 3];
    for (slot, part) in parts.iter_mut().enumerate() {
        if let Some(m) = captures.get(slot + 1) {
            match m.as_str().parse::<u64>() {
                Ok(value) => *part = value,
                Err(_) => return duration.to_string(),
            }
        }
    }

    format!("{}:{}:{}", parts[0], parts[1], parts[2])
}

/// `2021-03-04T05:06:07Z` -> `2021-03-04 05:06:07`, keeping the wall-clock time as published.
pub fn normalize_published_at(published_at: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(published_at) {
        return dt.naive_local().format("%Y-%m-%d %H:%M:%S").to_string();
    }

    if let Some(captures) = LOOSE_DATE_TIME.captures(published_at) {
        return format!("{} {}", &captures[1], &captures[2]);
    }

    published_at
        .replacen('T', " ", 1)
        .trim_end_matches('Z')
        .to_string()
}

/// Drops every character outside printable ASCII and ordinary whitespace.
///
/// Lossy on purpose: a title in a non-Latin script loses those characters instead of
/// failing the row.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r'))
        .collect()
}
