//! Canonical payload encoding: recursively sorted object keys, compact output.
//!
//! Two payloads that differ only in key order encode to the same bytes and so
//! hash identically.

use serde::Serialize;
use serde_json::{Map, Value};

use warden_core::errors::{LedgerError, WardenResult};

/// Encode `value` canonically.
pub fn canonical_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail.
    serde_json::to_string(&sorted(value)).unwrap_or_default()
}

/// Serialize any payload type and encode it canonically.
pub fn to_canonical<T: Serialize>(payload: &T) -> WardenResult<String> {
    let value = serde_json::to_value(payload)
        .map_err(|e| LedgerError::PayloadEncoding(e.to_string()))?;
    Ok(canonical_json(&value))
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::with_capacity(map.len());
            for key in keys {
                out.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_change_encoding() {
        let a = json!({"b": 1, "a": {"y": [1, {"d": 2, "c": 3}], "x": null}});
        let b = json!({"a": {"x": null, "y": [1, {"c": 3, "d": 2}]}, "b": 1});
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert_eq!(
            canonical_json(&a),
            r#"{"a":{"x":null,"y":[1,{"c":3,"d":2}]},"b":1}"#
        );
    }
}
