use serde_json::Value;

/// Ordered candidate keys tried when extracting one display field.
pub type FallbackChain = &'static [&'static str];

pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;
pub const ELLIPSIS: &str = "...";

/// Returns the first key in `chain` whose value is displayable.
///
/// Null, empty strings, arrays and objects count as missing.
pub fn first_present(record: &Value, chain: &[&str]) -> Option<String> {
    chain
        .iter()
        .find_map(|key| record.get(*key).and_then(display_value))
}

pub fn first_present_or(record: &Value, chain: &[&str], placeholder: &str) -> String {
    first_present(record, chain).unwrap_or_else(|| placeholder.to_string())
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Cuts `text` to `limit` characters, appending an ellipsis only when cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
