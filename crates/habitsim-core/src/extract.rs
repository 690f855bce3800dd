//! JSON extraction from semi-structured model output.
//!
//! Models asked for JSON still wrap it in prose or fenced code blocks often
//! enough that the pipeline slices before parsing: drop the fences, then
//! take the substring from the first `{` to the last `}`. The slice is lossy
//! when the text holds multiple JSON objects or stray braces outside the
//! intended one.

use serde_json::Value;

/// Extract the most plausible JSON object from `text`.
///
/// Falls back to the whole trimmed input when no brace pair is found, so
/// the caller's parse error stays meaningful.
pub fn extract_json_object(text: &str) -> String {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(open), Some(close)) if open < close => cleaned[open..=close].to_string(),
        _ => cleaned.to_string(),
    }
}

/// Truthiness of a presence-marker field.
///
/// Mirrors the acceptance rule the UI contract was built on: absent, null,
/// empty-string, `false`, and zero all reject the parse.
pub fn marker_is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
