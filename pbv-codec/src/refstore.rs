//! Reference store
//!
//! Some documents become unmanageable as single files, so elements of the
//! `tables`/`sections`/`bookmarks` lists are broken out into one file per
//! element under a folder named after the containing key. The element is
//! replaced in place by a reference marker holding the relative path, and
//! the file holds `{"value": <element>}` pretty-printed.

use pbv_format::constants::{REFERENCED_ENTRY_KEY, REFERENCED_VALUE_KEY, REFERENCE_LIST_KEYS};
use pbv_format::{PbvError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Writes and resolves externalized list elements relative to a vcs
/// directory.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceStore<'a> {
    dir: &'a Path,
}

impl<'a> ReferenceStore<'a> {
    /// Create a store rooted at the directory holding the parent document.
    pub fn new(dir: &'a Path) -> Self {
        Self { dir }
    }

    /// Externalize eligible list elements, recursing into every mapping
    /// and list first so nested references are captured innermost-out.
    pub fn externalize(&self, value: Value) -> Result<Value> {
        self.externalize_keyed(None, value)
    }

    fn externalize_keyed(&self, key: Option<&str>, value: Value) -> Result<Value> {
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    let converted = self.externalize_keyed(Some(&k), v)?;
                    out.insert(k, converted);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|v| self.externalize_keyed(None, v))
                    .collect::<Result<Vec<_>>>()?;
                let folder = match key {
                    Some(k) if REFERENCE_LIST_KEYS.contains(&k) => k,
                    _ => return Ok(Value::Array(items)),
                };
                // Only lists of named objects are worth breaking out.
                let named = items
                    .first()
                    .and_then(Value::as_object)
                    .is_some_and(|first| first.contains_key("name"));
                if !named {
                    return Ok(Value::Array(items));
                }
                let markers = items
                    .into_iter()
                    .map(|entry| {
                        let relative = self.store(folder, &entry)?;
                        let mut marker = Map::new();
                        marker.insert(REFERENCED_ENTRY_KEY.to_string(), Value::String(relative));
                        Ok(Value::Object(marker))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(markers))
            }
            other => Ok(other),
        }
    }

    /// Write one element to `<folder>/<SafeName>.json` and return the
    /// relative path used in the marker (always forward-slashed).
    fn store(&self, folder: &str, entry: &Value) -> Result<String> {
        let object = entry.as_object().ok_or(PbvError::MissingReferenceName)?;
        let name = object
            .get("displayName")
            .and_then(Value::as_str)
            .or_else(|| object.get("name").and_then(Value::as_str))
            .ok_or(PbvError::MissingReferenceName)?;
        let safe: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();

        let dir = self.dir.join(folder);
        fs::create_dir_all(&dir)?;

        let mut wrapper = Map::new();
        wrapper.insert(REFERENCED_VALUE_KEY.to_string(), entry.clone());
        let rendered = serde_json::to_string_pretty(&Value::Object(wrapper))?;
        fs::write(dir.join(format!("{safe}.json")), rendered.as_bytes())?;

        Ok(format!("{folder}/{safe}.json"))
    }

    /// Resolve every reference marker back to its stored value, including
    /// markers nested inside referenced files.
    pub fn resolve(&self, value: Value) -> Result<Value> {
        match value {
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(relative)) = map.get(REFERENCED_ENTRY_KEY) {
                        return self.load(relative);
                    }
                }
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, self.resolve(v)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => Ok(Value::Array(
                items
                    .into_iter()
                    .map(|v| self.resolve(v))
                    .collect::<Result<Vec<_>>>()?,
            )),
            other => Ok(other),
        }
    }

    fn load(&self, relative: &str) -> Result<Value> {
        let path = relative
            .split('/')
            .fold(self.dir.to_path_buf(), |acc, part| acc.join(part));
        let text = fs::read_to_string(path)?;
        let mut wrapper: Value = serde_json::from_str(&text)?;
        let inner = wrapper
            .get_mut(REFERENCED_VALUE_KEY)
            .map(Value::take)
            .unwrap_or(Value::Null);
        self.resolve(inner)
    }
}
