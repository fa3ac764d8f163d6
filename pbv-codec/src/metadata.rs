//! Metadata member textifier
//!
//! Metadata members are nearly readable already; the vcs form is the
//! byte-string literal from [`pbv_format::escape`], broken into lines so
//! changes diff line-by-line.

use pbv_format::escape;
use pbv_format::Result;

/// Converter rendering metadata bytes as an escaped, line-broken literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataConverter;

impl MetadataConverter {
    /// Create the converter.
    pub fn new() -> Self {
        Self
    }

    /// Render raw bytes as the line-broken literal (ASCII).
    pub fn raw_to_vcs(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(escape::escape_bytes_multiline(raw)?.into_bytes())
    }

    /// Strip the inserted line breaks and parse the literal back.
    pub fn vcs_to_raw(&self, vcs: &[u8]) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(vcs)
            .map_err(|e| pbv_format::PbvError::Encoding(e.to_string()))?;
        let joined: String = text.chars().filter(|&c| c != '\n').collect();
        escape::unescape_bytes(&joined)
    }

    /// Diff preview: same as the vcs form.
    pub fn raw_to_textconv(&self, raw: &[u8]) -> Result<String> {
        Ok(escape::escape_bytes_multiline(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_with_mixed_bytes() {
        let conv = MetadataConverter::new();
        let raw = b"\x10\x00head\x00\x01body text\xff".to_vec();
        let vcs = conv.raw_to_vcs(&raw).unwrap();
        assert!(vcs.iter().all(u8::is_ascii));
        assert_eq!(conv.vcs_to_raw(&vcs).unwrap(), raw);
    }

    #[test]
    fn test_vcs_form_is_line_broken() {
        let conv = MetadataConverter::new();
        let vcs = conv.raw_to_vcs(b"\x00\x01ab\x02cd").unwrap();
        let text = String::from_utf8(vcs).unwrap();
        assert_eq!(text, "b'\\x00\\x01\nab\\x02\ncd'");
    }
}
