// Sanitization utilities for request input
use serde_json::Value;

/// Turn loosely typed pantry input into trimmed, non-empty item names.
/// Strings and scalars are stringified; nulls, arrays and objects are dropped.
pub fn sanitize_pantry(items: &[Value], max_items: usize) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|item| !item.is_empty())
        .take(max_items)
        .collect()
}

/// Apply the default when absent or zero and clamp into `1..=max`
pub fn clamp_limit(requested: Option<i64>, default: usize, max: usize) -> usize {
    match requested {
        None | Some(0) => default.clamp(1, max.max(1)),
        Some(n) if n < 1 => 1,
        Some(n) => (n as u64).min(max as u64) as usize,
    }
}

/// Truncate text to a maximum number of characters
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
