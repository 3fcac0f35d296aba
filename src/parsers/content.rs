//! Helpers that pull text out of loosely shaped JSON payloads.
//!
//! Codex has changed the shape of message content several times: bare strings,
//! `{"text": ...}` blocks, `{"content": ...}` wrappers and lists of any of
//! these all occur in real rollout files.

use serde_json::{Map, Value};

/// Separator placed between outputs correlated to the same call id
pub const OUTPUT_SEPARATOR: &str = "\n\n---\n\n";

/// Default preview length in characters
pub const PREVIEW_LIMIT: usize = 120;

/// Stringify a scalar field. `null` and missing fields are absent.
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Flatten message content into a single string.
///
/// Accepts a bare string, a mapping with `text`, a mapping with nested
/// `content`, or a list of such blocks (joined with no separator). Any other
/// shape yields `None`.
pub fn normalize_content_blocks(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            if map.contains_key("text") {
                coerce_text(map.get("text"))
            } else {
                map.get("content").and_then(normalize_content_blocks)
            }
        }
        Value::Array(blocks) => {
            let mut joined = String::new();
            let mut found = false;
            for block in blocks {
                let text = match block {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(map) => match map.get("text") {
                        Some(text) if !text.is_null() => coerce_text(Some(text)),
                        _ => map.get("content").and_then(normalize_content_blocks),
                    },
                    _ => None,
                };
                if let Some(text) = text {
                    joined.push_str(&text);
                    found = true;
                }
            }
            found.then_some(joined)
        }
        _ => None,
    }
}

/// Text of a `response_item` message: `content`, falling back to `text`
pub fn extract_message_text(payload: &Map<String, Value>) -> Option<String> {
    non_null(payload, "content")
        .or_else(|| non_null(payload, "text"))
        .and_then(normalize_content_blocks)
}

/// Text of an `event_msg` / `user_message` payload.
///
/// `message` may be a string, a list of blocks, or a mapping carrying
/// `content`/`text`; without `message` the plain `text` field is used.
pub fn extract_event_user_message(payload: &Map<String, Value>) -> Option<String> {
    let message = non_null(payload, "message").or_else(|| non_null(payload, "text"))?;
    match message {
        Value::String(s) => Some(s.clone()),
        Value::Array(_) => normalize_content_blocks(message),
        Value::Object(inner) => extract_message_text(inner),
        _ => None,
    }
}

/// Summary fragments of a `response_item` / `reasoning` payload.
///
/// `summary` entries may be strings or `{text}` / `{summary_text}` mappings.
/// When `summary` is not a list, a string `text` field is used instead.
pub fn extract_reasoning_summary(payload: &Map<String, Value>) -> Vec<String> {
    if let Some(Value::Array(blocks)) = payload.get("summary") {
        return blocks
            .iter()
            .filter_map(|block| match block {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => match non_null(map, "text") {
                    Some(text) => coerce_text(Some(text)),
                    None => coerce_text(map.get("summary_text")),
                },
                _ => None,
            })
            .collect();
    }

    match payload.get("text") {
        Some(Value::String(text)) => vec![text.clone()],
        _ => Vec::new(),
    }
}

/// Fragments of an `event_msg` / `agent_reasoning` payload.
///
/// `text` is either one string or a list; empty and falsy entries are dropped.
pub fn extract_agent_reasoning(payload: &Map<String, Value>) -> Vec<String> {
    match payload.get("text") {
        Some(Value::String(text)) if !text.is_empty() => vec![text.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| is_truthy(item))
            .filter_map(|item| coerce_text(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Render tool arguments or output for display.
///
/// Strings holding embedded JSON are re-serialized pretty-printed so that
/// equivalent payloads diff identically; other strings pass through unchanged.
/// Mappings and lists are always pretty-printed, other scalars stringified.
pub fn format_jsonish(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Some(raw.clone());
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(parsed) => Some(to_pretty_ascii(&parsed)),
                Err(_) => Some(raw.clone()),
            }
        }
        structured @ (Value::Object(_) | Value::Array(_)) => Some(to_pretty_ascii(structured)),
        other => Some(other.to_string()),
    }
}

/// Whitespace-collapsed, length-limited single line of `text`
pub fn make_preview(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        return collapsed;
    }
    let mut shortened: String = collapsed.chars().take(limit.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}

/// Pretty JSON (2-space indent) with every non-ASCII character escaped
fn to_pretty_ascii(value: &Value) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    escape_non_ascii(&pretty)
}

// Non-ASCII can only occur inside JSON strings, so escaping the whole
// document is equivalent to escaping each string.
fn escape_non_ascii(text: &str) -> String {
    if text.is_ascii() {
        return text.to_owned();
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    let mut units = [0u16; 2];
    for ch in text.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{:04x}", unit));
        }
    }
    escaped
}

fn non_null<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
