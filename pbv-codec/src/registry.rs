//! Converter registry
//!
//! Maps archive member paths to converters through an ordered list of
//! glob patterns; the first matching pattern wins. Unmatched paths fall
//! back to a pass-through converter with a logged warning so unknown
//! members are still carried through unmodified.

use crate::context::ConvertContext;
use crate::json::JsonConverter;
use crate::mashup::MashupConverter;
use crate::metadata::MetadataConverter;
use crate::xml::XmlConverter;
use glob::Pattern;
use pbv_format::{PbvError, Result, TextEncoding};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Textconv rendering for opaque content.
pub(crate) fn content_hash_line(bytes: &[u8]) -> String {
    format!("File hash: {}", hex::encode(Sha256::digest(bytes)))
}

/// A per-member conversion capability.
#[derive(Debug, Clone, Copy)]
pub enum Converter {
    /// Bytes carried through unmodified.
    Passthrough,
    /// XML member, pretty-printed for vcs.
    Xml(XmlConverter),
    /// JSON member, run through the diffability pipeline.
    Json(JsonConverter),
    /// Metadata member, rendered as a line-broken byte-string literal.
    Metadata(MetadataConverter),
    /// The nested DataMashup container, decomposed into its own subtree.
    Mashup(MashupConverter),
}

impl Converter {
    /// Convert raw member bytes into the vcs form at `vcs_path`,
    /// creating parent directories as needed. The mashup converter
    /// writes a whole subtree rooted at `vcs_path`.
    pub fn write_raw_to_vcs(&self, raw: &[u8], vcs_path: &Path, diffable: bool) -> Result<()> {
        if let Converter::Mashup(conv) = self {
            return conv.write_raw_to_vcs(raw, vcs_path);
        }
        if let Some(parent) = vcs_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let ctx = ConvertContext::new(diffable, vcs_path.parent().unwrap_or(Path::new("")));
        let vcs = match self {
            Converter::Passthrough => raw.to_vec(),
            Converter::Xml(conv) => conv.raw_to_vcs(raw)?,
            Converter::Json(conv) => conv.raw_to_vcs(raw, &ctx)?,
            Converter::Metadata(conv) => conv.raw_to_vcs(raw)?,
            Converter::Mashup(_) => unreachable!(),
        };
        fs::write(vcs_path, vcs)?;
        Ok(())
    }

    /// Read the vcs form at `vcs_path` and write raw member bytes into
    /// `out`. The mashup converter reads a whole subtree.
    pub fn write_vcs_to_raw(
        &self,
        vcs_path: &Path,
        out: &mut dyn Write,
        diffable: bool,
    ) -> Result<()> {
        if let Converter::Mashup(conv) = self {
            return conv.write_vcs_to_raw(vcs_path, out);
        }
        let vcs = fs::read(vcs_path)?;
        let ctx = ConvertContext::new(diffable, vcs_path.parent().unwrap_or(Path::new("")));
        let raw = match self {
            Converter::Passthrough => vcs,
            Converter::Xml(conv) => conv.vcs_to_raw(&vcs)?,
            Converter::Json(conv) => conv.vcs_to_raw(&vcs, &ctx)?,
            Converter::Metadata(conv) => conv.vcs_to_raw(&vcs)?,
            Converter::Mashup(_) => unreachable!(),
        };
        out.write_all(&raw)?;
        Ok(())
    }

    /// Render raw member bytes as human-readable text for diffing. No
    /// filesystem side effects.
    pub fn write_textconv(&self, raw: &[u8], out: &mut dyn Write) -> Result<()> {
        match self {
            Converter::Passthrough => writeln!(out, "{}", content_hash_line(raw))?,
            Converter::Xml(conv) => writeln!(out, "{}", conv.raw_to_textconv(raw)?)?,
            Converter::Json(conv) => write!(out, "{}", conv.raw_to_textconv(raw)?)?,
            Converter::Metadata(conv) => writeln!(out, "{}", conv.raw_to_textconv(raw)?)?,
            Converter::Mashup(conv) => conv.raw_to_textconv(raw, out)?,
        }
        Ok(())
    }
}

/// Ordered pattern table selecting a converter per member path.
#[derive(Debug)]
pub struct ConverterRegistry {
    entries: Vec<(Pattern, Converter)>,
    fallback: Converter,
}

impl ConverterRegistry {
    /// Build a registry from `(pattern, converter)` pairs.
    pub fn new(table: Vec<(&str, Converter)>) -> Result<Self> {
        let entries = table
            .into_iter()
            .map(|(pattern, converter)| {
                Pattern::new(pattern)
                    .map(|p| (p, converter))
                    .map_err(|e| PbvError::Pattern(format!("{pattern:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            entries,
            fallback: Converter::Passthrough,
        })
    }

    /// The standard table for Power BI template containers.
    pub fn standard() -> Result<Self> {
        Self::new(vec![
            ("DataModelSchema", Converter::Json(JsonConverter::new(TextEncoding::Utf16Le))),
            ("DiagramState", Converter::Json(JsonConverter::new(TextEncoding::Utf16Le))),
            ("DiagramLayout", Converter::Json(JsonConverter::new(TextEncoding::Utf16Le))),
            ("Report/Layout", Converter::Json(JsonConverter::new(TextEncoding::Utf16Le))),
            (
                "Report/LinguisticSchema",
                Converter::Xml(XmlConverter::new(TextEncoding::Utf16Le, false)),
            ),
            (
                "[[]Content_Types[]].xml",
                Converter::Xml(XmlConverter::new(TextEncoding::Utf8Sig, true)),
            ),
            ("SecurityBindings", Converter::Passthrough),
            ("Settings", Converter::Passthrough),
            ("Version", Converter::Passthrough),
            ("Report/StaticResources/*", Converter::Passthrough),
            ("DataMashup", Converter::Mashup(MashupConverter::new())),
            ("Metadata", Converter::Json(JsonConverter::new(TextEncoding::Utf16Le))),
            ("*.json", Converter::Json(JsonConverter::new(TextEncoding::Utf8))),
        ])
    }

    /// Select the converter for a member path: first matching pattern
    /// wins; unmatched paths get the pass-through fallback with a
    /// warning.
    pub fn select(&self, path: &str) -> &Converter {
        for (pattern, converter) in &self.entries {
            if pattern.matches(path) {
                return converter;
            }
        }
        warn!(member = path, "no converter pattern matches; using pass-through");
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_glob_selection() {
        let registry = ConverterRegistry::standard().unwrap();
        assert!(matches!(
            registry.select("DataModelSchema"),
            Converter::Json(_)
        ));
        assert!(matches!(registry.select("DataMashup"), Converter::Mashup(_)));
        assert!(matches!(registry.select("Version"), Converter::Passthrough));
        assert!(matches!(
            registry.select("Report/LinguisticSchema"),
            Converter::Xml(_)
        ));
    }

    #[test]
    fn test_bracketed_pattern_matches_literal_brackets() {
        let registry = ConverterRegistry::standard().unwrap();
        assert!(matches!(
            registry.select("[Content_Types].xml"),
            Converter::Xml(_)
        ));
    }

    #[test]
    fn test_json_glob_catches_other_json_members() {
        let registry = ConverterRegistry::standard().unwrap();
        assert!(matches!(
            registry.select("Report/CustomVisuals/meta.json"),
            Converter::Json(_)
        ));
    }

    #[test]
    fn test_static_resources_pass_through() {
        let registry = ConverterRegistry::standard().unwrap();
        assert!(matches!(
            registry.select("Report/StaticResources/img/logo.png"),
            Converter::Passthrough
        ));
    }

    #[test]
    fn test_unmatched_falls_back_to_passthrough() {
        let registry = ConverterRegistry::standard().unwrap();
        assert!(matches!(
            registry.select("SomethingUnknown"),
            Converter::Passthrough
        ));
    }

    #[test]
    fn test_first_match_wins() {
        let registry = ConverterRegistry::new(vec![
            ("a*", Converter::Passthrough),
            ("ab", Converter::Metadata(MetadataConverter::new())),
        ])
        .unwrap();
        assert!(matches!(registry.select("ab"), Converter::Passthrough));
    }

    #[test]
    fn test_case_sensitive_matching() {
        let registry = ConverterRegistry::standard().unwrap();
        // Lowercase "version" is not the known "Version" member.
        assert!(matches!(registry.select("version"), Converter::Passthrough));
        assert!(matches!(
            registry.select("datamodelschema"),
            Converter::Passthrough
        ));
    }

    #[test]
    fn test_content_hash_line_is_stable() {
        assert_eq!(
            content_hash_line(b""),
            "File hash: e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
