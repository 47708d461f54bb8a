//! Common types used throughout jsontab
//!
//! Documents are plain `serde_json` values. The `preserve_order` feature keeps
//! object fields in insertion order, which the inferred schemas rely on.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Field Lookup
// ============================================================================

/// Look up an object field by name, ignoring ASCII case.
///
/// An exact match is preferred; otherwise the first case-insensitive match in
/// insertion order wins.
pub fn get_field_ci<'a>(object: &'a JsonObject, name: &str) -> Option<&'a JsonValue> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

/// Short name of a JSON value's runtime tag, used in diagnostics
pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Render a value for an error message, truncated to keep errors readable
pub fn json_snippet(value: &JsonValue) -> String {
    const MAX: usize = 100;
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX {
        rendered
    } else {
        let truncated: String = rendered.chars().take(MAX).collect();
        format!("{truncated}...")
    }
}
