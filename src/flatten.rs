//! Dot-path flattening of nested JSON values for column display.

use std::collections::BTreeMap;

use serde_json::Value;

/// Flatten a payload map into a single level of dot-joined keys.
///
/// Values holding the textual encoding of a JSON object or array are
/// walked recursively, one entry per leaf. Scalar and non-JSON values pass
/// through unchanged, so a payload with no nested structure flattens to an
/// identical mapping.
pub fn flatten_payload(payload: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for (key, text) in payload {
        match serde_json::from_str::<Value>(text) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => {
                flatten_into(&mut flat, key, &value);
            }
            _ => {
                flat.insert(key.clone(), text.clone());
            }
        }
    }
    flat
}

/// Emit one entry per leaf, joining path segments with dots. Array elements
/// use their index as a segment; empty composites are kept as their literal
/// text so no key is lost.
fn flatten_into(flat: &mut BTreeMap<String, String>, path: &str, value: &Value) {
    match value {
        Value::Object(fields) if !fields.is_empty() => {
            for (key, child) in fields {
                flatten_into(flat, &format!("{path}.{key}"), child);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(flat, &format!("{path}.{index}"), child);
            }
        }
        Value::String(text) => {
            flat.insert(path.to_string(), text.clone());
        }
        other => {
            flat.insert(path.to_string(), other.to_string());
        }
    }
}
