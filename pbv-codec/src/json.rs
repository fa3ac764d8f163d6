//! JSON member converter
//!
//! Runs the tree transform pipeline over a member. Key order is
//! insertion order throughout and round-trips untouched; the raw form is
//! compact in the member's encoding, the vcs form is indented UTF-8.

use crate::context::ConvertContext;
use crate::refstore::ReferenceStore;
use crate::transform;
use pbv_format::{Result, TextEncoding};
use serde_json::Value;

/// Converter for JSON members.
#[derive(Debug, Clone, Copy)]
pub struct JsonConverter {
    encoding: TextEncoding,
}

impl JsonConverter {
    /// Create a converter for a member stored in the given encoding.
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    /// Convert raw bytes to the indented, diff-friendly vcs form.
    pub fn raw_to_vcs(&self, raw: &[u8], ctx: &ConvertContext) -> Result<Vec<u8>> {
        let text = self.encoding.decode(raw)?;
        let mut value: Value = serde_json::from_str(&text)?;

        value = transform::wrap_embedded_json(value);
        if ctx.diffable {
            value = transform::normalize_volatile_dates(value);
            value = transform::split_multiline_strings(value);
            value = ReferenceStore::new(ctx.vcs_dir).externalize(value)?;
        }

        Ok(serde_json::to_string_pretty(&value)?.into_bytes())
    }

    /// Convert the vcs form back to compact bytes in the raw encoding.
    pub fn vcs_to_raw(&self, vcs: &[u8], ctx: &ConvertContext) -> Result<Vec<u8>> {
        let text = TextEncoding::Utf8.decode(vcs)?;
        let mut value: Value = serde_json::from_str(&text)?;

        if ctx.diffable {
            value = ReferenceStore::new(ctx.vcs_dir).resolve(value)?;
            value = transform::join_multiline_strings(value);
        }
        value = transform::unwrap_embedded_json(value)?;

        Ok(self.encoding.encode(&serde_json::to_string(&value)?))
    }

    /// One-way diff preview: embedded JSON expanded, keys sorted for
    /// readability. The only place key order is ever disturbed.
    pub fn raw_to_textconv(&self, raw: &[u8]) -> Result<String> {
        let text = self.encoding.decode(raw)?;
        let value: Value = serde_json::from_str(&text)?;
        let value = transform::sort_keys(transform::wrap_embedded_json(value));
        Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
    }
}
