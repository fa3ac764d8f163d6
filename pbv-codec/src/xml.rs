//! XML pretty-printer / compactor
//!
//! The vcs form is always pretty-printed UTF-8. The raw form is compact
//! in the member's declared encoding; signature bytes are patched in at
//! the byte level since the XML layer only understands base encoding
//! names.

use pbv_format::{PbvError, Result, TextEncoding};
use quick_xml::events::{BytesDecl, Event};
use quick_xml::{Reader, Writer};

fn xml_err<E: std::fmt::Display>(e: E) -> PbvError {
    PbvError::Xml(e.to_string())
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

/// Converter for XML members.
#[derive(Debug, Clone, Copy)]
pub struct XmlConverter {
    encoding: TextEncoding,
    declaration: bool,
}

impl XmlConverter {
    /// Create a converter for the given raw encoding. `declaration`
    /// controls whether an XML declaration is emitted on both sides.
    pub fn new(encoding: TextEncoding, declaration: bool) -> Self {
        Self {
            encoding,
            declaration,
        }
    }

    /// Re-emit a document, dropping blank text nodes and replacing any
    /// declaration with one naming `encoding_name` (or dropping it when
    /// the converter suppresses declarations). A declaration in the input
    /// must agree with `expected`, the encoding the input was decoded
    /// with.
    fn reemit(
        &self,
        text: &str,
        indent: bool,
        encoding_name: &str,
        expected: &str,
    ) -> Result<Vec<u8>> {
        let mut reader = Reader::from_str(text);
        let mut writer = if indent {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };

        if self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding_name), None)))
                .map_err(xml_err)?;
        }

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Eof => break,
                Event::Decl(decl) => {
                    // Replaced (or suppressed) above; verify it agrees
                    // with the encoding the input was decoded with.
                    if let Some(declared) = decl.encoding() {
                        let declared = declared.map_err(xml_err)?;
                        let declared = String::from_utf8_lossy(&declared).to_lowercase();
                        if declared != expected {
                            return Err(PbvError::EncodingMismatch {
                                expected: expected.to_string(),
                                declared,
                            });
                        }
                    }
                }
                Event::Text(t) if is_blank(&t) => {}
                event => writer.write_event(event).map_err(xml_err)?,
            }
        }

        Ok(writer.into_inner())
    }

    /// Convert raw bytes to the pretty-printed UTF-8 vcs form.
    pub fn raw_to_vcs(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let text = self.encoding.decode(raw)?;
        self.reemit(&text, true, "utf-8", self.encoding.base_name())
    }

    /// Convert the vcs form back to compact bytes in the raw encoding.
    pub fn vcs_to_raw(&self, vcs: &[u8]) -> Result<Vec<u8>> {
        let text = TextEncoding::Utf8.decode(vcs)?;
        let compact = self.reemit(&text, false, self.encoding.base_name(), "utf-8")?;
        let compact = String::from_utf8(compact).map_err(|e| PbvError::Encoding(e.to_string()))?;
        Ok(self.encoding.encode(&compact))
    }

    /// One-way diff preview: the pretty form as text.
    pub fn raw_to_textconv(&self, raw: &[u8]) -> Result<String> {
        let pretty = self.raw_to_vcs(raw)?;
        TextEncoding::Utf8.decode(&pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPACT: &str =
        r#"<?xml version="1.0" encoding="utf-8"?><Types a="1"><Default ext="json"/><Override part="/x"/></Types>"#;

    #[test]
    fn test_pretty_print_indents_and_strips_blanks() {
        let conv = XmlConverter::new(TextEncoding::Utf8Sig, true);
        let raw = TextEncoding::Utf8Sig.encode(COMPACT);
        let pretty = String::from_utf8(conv.raw_to_vcs(&raw).unwrap()).unwrap();
        assert!(pretty.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(pretty.contains("\n  <Default ext=\"json\"/>"));
    }

    #[test]
    fn test_vcs_to_raw_restores_signature_bytes() {
        let conv = XmlConverter::new(TextEncoding::Utf8Sig, true);
        let raw = TextEncoding::Utf8Sig.encode(COMPACT);
        let vcs = conv.raw_to_vcs(&raw).unwrap();
        let rebuilt = conv.vcs_to_raw(&vcs).unwrap();
        assert_eq!(rebuilt, raw);
    }

    #[test]
    fn test_utf16_roundtrip_without_declaration() {
        let conv = XmlConverter::new(TextEncoding::Utf16Le, false);
        let raw = TextEncoding::Utf16Le.encode("<schema><item>caf\u{e9}</item></schema>");
        let vcs = conv.raw_to_vcs(&raw).unwrap();
        let pretty = String::from_utf8(vcs.clone()).unwrap();
        assert!(!pretty.contains("<?xml"));
        assert_eq!(conv.vcs_to_raw(&vcs).unwrap(), raw);
    }

    #[test]
    fn test_declared_encoding_mismatch_is_fatal() {
        let conv = XmlConverter::new(TextEncoding::Utf16Le, false);
        let raw =
            TextEncoding::Utf16Le.encode(r#"<?xml version="1.0" encoding="utf-8"?><a/>"#);
        assert!(matches!(
            conv.raw_to_vcs(&raw),
            Err(PbvError::EncodingMismatch { .. })
        ));
    }

    #[test]
    fn test_declared_encoding_case_insensitive() {
        let conv = XmlConverter::new(TextEncoding::Utf8Sig, true);
        let raw = TextEncoding::Utf8Sig
            .encode(r#"<?xml version="1.0" encoding="UTF-8"?><a><b>x</b></a>"#);
        assert!(conv.raw_to_vcs(&raw).is_ok());
    }

    #[test]
    fn test_mixed_content_text_preserved() {
        let conv = XmlConverter::new(TextEncoding::Utf8, false);
        let raw = b"<a>hello <b>world</b></a>".to_vec();
        let vcs = conv.raw_to_vcs(&raw).unwrap();
        let rebuilt = conv.vcs_to_raw(&vcs).unwrap();
        assert_eq!(rebuilt, raw);
    }
}
