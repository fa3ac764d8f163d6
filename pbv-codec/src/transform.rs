//! Reversible JSON tree transforms
//!
//! Every transform is total over the value tree and recursion-preserving:
//! key order is never disturbed (it is format-significant to the
//! producing application), except in [`sort_keys`], which exists only for
//! the one-way diff preview.

use pbv_format::constants::{
    EMBEDDED_JSON_KEY, MULTILINE_KEY, VOLATILE_DATE_KEYS, VOLATILE_DATE_SENTINEL,
};
use pbv_format::Result;
use serde_json::{Map, Value};

fn single_key(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Replace any string that parses as a JSON object or array with an
/// embedded-JSON wrapper holding the parsed value.
///
/// Bare scalars (`"1"`, `"null"`) are left as strings; only structured
/// values are worth expanding for diffs. The parsed value is not itself
/// rescanned: later pipeline stages traverse it like any other subtree.
pub fn wrap_embedded_json(value: Value) -> Value {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => {
                single_key(EMBEDDED_JSON_KEY, parsed)
            }
            _ => Value::String(s),
        },
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, wrap_embedded_json(v)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(wrap_embedded_json).collect())
        }
        other => other,
    }
}

/// Undo [`wrap_embedded_json`], re-serializing the wrapped value as a
/// compact string with original key order.
pub fn unwrap_embedded_json(value: Value) -> Result<Value> {
    match value {
        Value::Object(map) => {
            if map.len() == 1 && map.contains_key(EMBEDDED_JSON_KEY) {
                let inner = map
                    .into_iter()
                    .next()
                    .map(|(_, v)| v)
                    .unwrap_or(Value::Null);
                return Ok(Value::String(serde_json::to_string(&inner)?));
            }
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k, unwrap_embedded_json(v)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => Ok(Value::Array(
            items
                .into_iter()
                .map(unwrap_embedded_json)
                .collect::<Result<Vec<_>>>()?,
        )),
        other => Ok(other),
    }
}

/// Overwrite volatile date fields with a fixed sentinel.
///
/// One-directional and lossy by design: the original values are too
/// volatile to keep under version control and are never restored.
pub fn normalize_volatile_dates(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    if VOLATILE_DATE_KEYS.contains(&k.as_str()) {
                        (k, Value::String(VOLATILE_DATE_SENTINEL.to_string()))
                    } else {
                        (k, normalize_volatile_dates(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items.into_iter().map(normalize_volatile_dates).collect(),
        ),
        other => other,
    }
}

/// Split any string containing a line feed into a multiline wrapper.
///
/// The source format consistently uses `\n`, never `\r\n`, so rejoining
/// with `\n` is exact.
pub fn split_multiline_strings(value: Value) -> Value {
    match value {
        Value::String(s) if s.contains('\n') => single_key(
            MULTILINE_KEY,
            Value::Array(
                s.split('\n')
                    .map(|line| Value::String(line.to_string()))
                    .collect(),
            ),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, split_multiline_strings(v)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(split_multiline_strings).collect())
        }
        other => other,
    }
}

/// Undo [`split_multiline_strings`], rejoining the lines with `\n`.
pub fn join_multiline_strings(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::Array(items)) = map.get(MULTILINE_KEY) {
                    if items.iter().all(Value::is_string) {
                        let lines: Vec<&str> =
                            items.iter().filter_map(Value::as_str).collect();
                        return Value::String(lines.join("\n"));
                    }
                }
            }
            Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, join_multiline_strings(v)))
                    .collect(),
            )
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(join_multiline_strings).collect())
        }
        other => other,
    }
}

/// Recursively sort object keys. Diagnostic-only: used by the textconv
/// preview, never on the reversible path.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
