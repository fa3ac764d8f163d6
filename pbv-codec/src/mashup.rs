//! DataMashup nested-container converter
//!
//! Decomposes the mashup frame into its own directory subtree (inner zip
//! entries, the two XML blocks, the opaque trailer, and an inner order
//! index) and rebuilds the frame from that subtree. The frame arithmetic
//! lives in [`pbv_format::mashup`]; this module handles the inner zip and
//! the per-entry dispatch.

use crate::registry::content_hash_line;
use crate::xml::XmlConverter;
use pbv_format::constants::{
    MASHUP_CONTENT_TYPES, MASHUP_PACKAGE, MASHUP_SECTION, MASHUP_TRAILER_NAME, MASHUP_XML1_NAME,
    MASHUP_XML2_NAME, ORDER_INDEX_NAME,
};
use pbv_format::{MashupFrame, OrderIndex, PbvError, Result, TextEncoding};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn zip_err<E: std::fmt::Display>(e: E) -> PbvError {
    PbvError::Zip(e.to_string())
}

/// Deflate with a fixed timestamp so rebuilt archives are deterministic.
pub fn deflate_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
}

fn block_converter() -> XmlConverter {
    XmlConverter::new(TextEncoding::Utf8Sig, true)
}

enum InnerConverter {
    Xml(XmlConverter),
    Noop,
}

/// Inner entries are dispatched by exact name; anything else is a
/// format violation, not a pass-through.
fn inner_converter(name: &str) -> Result<InnerConverter> {
    match name {
        MASHUP_CONTENT_TYPES | MASHUP_PACKAGE => Ok(InnerConverter::Xml(block_converter())),
        MASHUP_SECTION => Ok(InnerConverter::Noop),
        other => Err(PbvError::UnknownMashupMember(other.to_string())),
    }
}

/// Converter for the DataMashup member.
#[derive(Debug, Clone, Copy, Default)]
pub struct MashupConverter;

impl MashupConverter {
    /// Create the converter.
    pub fn new() -> Self {
        Self
    }

    /// Decompose raw mashup bytes into a directory subtree.
    pub fn write_raw_to_vcs(&self, raw: &[u8], out_dir: &Path) -> Result<()> {
        let frame = MashupFrame::decode(raw)?;
        fs::create_dir_all(out_dir)?;

        let mut archive = ZipArchive::new(Cursor::new(&frame.zip_blob)).map_err(zip_err)?;
        let mut order = OrderIndex::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(zip_err)?;
            let name = entry.name().to_string();
            let mut raw_entry = Vec::new();
            entry.read_to_end(&mut raw_entry)?;
            order.push(name.clone());

            let vcs_path = out_dir.join(&name);
            if let Some(parent) = vcs_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let converted = match inner_converter(&name)? {
                InnerConverter::Xml(conv) => conv.raw_to_vcs(&raw_entry)?,
                InnerConverter::Noop => raw_entry,
            };
            fs::write(vcs_path, converted)?;
        }
        fs::write(out_dir.join(ORDER_INDEX_NAME), order.to_text())?;

        let xml = block_converter();
        fs::write(
            out_dir.join(MASHUP_XML1_NAME),
            xml.raw_to_vcs(&frame.xml_block1)?,
        )?;
        fs::write(
            out_dir.join(MASHUP_XML2_NAME),
            xml.raw_to_vcs(&frame.xml_block2)?,
        )?;
        fs::write(out_dir.join(MASHUP_TRAILER_NAME), &frame.trailer)?;
        Ok(())
    }

    /// Rebuild raw mashup bytes from a decomposed subtree.
    pub fn write_vcs_to_raw(&self, vcs_dir: &Path, out: &mut dyn Write) -> Result<()> {
        let order =
            OrderIndex::parse(&fs::read_to_string(vcs_dir.join(ORDER_INDEX_NAME))?);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for name in order.iter() {
            let vcs_bytes = fs::read(vcs_dir.join(name))?;
            let raw = match inner_converter(name)? {
                InnerConverter::Xml(conv) => conv.vcs_to_raw(&vcs_bytes)?,
                InnerConverter::Noop => vcs_bytes,
            };
            zip.start_file(name, deflate_options()).map_err(zip_err)?;
            zip.write_all(&raw)?;
        }
        let zip_blob = zip.finish().map_err(zip_err)?.into_inner();

        let xml = block_converter();
        let frame = MashupFrame {
            zip_blob,
            xml_block1: xml.vcs_to_raw(&fs::read(vcs_dir.join(MASHUP_XML1_NAME))?)?,
            xml_block2: xml.vcs_to_raw(&fs::read(vcs_dir.join(MASHUP_XML2_NAME))?)?,
            trailer: fs::read(vcs_dir.join(MASHUP_TRAILER_NAME))?,
        };
        out.write_all(&frame.encode())?;
        Ok(())
    }

    /// Render the decomposed pieces as readable text for diffing.
    pub fn raw_to_textconv(&self, raw: &[u8], out: &mut dyn Write) -> Result<()> {
        let frame = MashupFrame::decode(raw)?;

        let mut archive = ZipArchive::new(Cursor::new(&frame.zip_blob)).map_err(zip_err)?;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(zip_err)?;
            let name = entry.name().to_string();
            let mut raw_entry = Vec::new();
            entry.read_to_end(&mut raw_entry)?;
            writeln!(out, "Filename: {name}")?;
            match inner_converter(&name)? {
                InnerConverter::Xml(conv) => {
                    writeln!(out, "{}", conv.raw_to_textconv(&raw_entry)?)?
                }
                InnerConverter::Noop => writeln!(out, "{}", content_hash_line(&raw_entry))?,
            }
        }

        let xml = block_converter();
        writeln!(out, "DataMashup -> XML Block 1")?;
        writeln!(out, "{}", xml.raw_to_textconv(&frame.xml_block1)?)?;
        writeln!(out, "DataMashup -> XML Block 2")?;
        writeln!(out, "{}", xml.raw_to_textconv(&frame.xml_block2)?)?;
        writeln!(out, "DataMashup -> Extra Content")?;
        writeln!(out, "{}", content_hash_line(&frame.trailer))?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTENT_TYPES: &str =
        r#"<?xml version="1.0" encoding="utf-8"?><Types><Default Extension="xml"/></Types>"#;
    const PACKAGE: &str =
        r#"<?xml version="1.0" encoding="utf-8"?><Package Version="2.0"/>"#;
    const SECTION: &str = "section Section1;\n\nshared Query1 = 1;";

    fn sample_mashup() -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in [
            (MASHUP_CONTENT_TYPES, TextEncoding::Utf8Sig.encode(CONTENT_TYPES)),
            (MASHUP_PACKAGE, TextEncoding::Utf8Sig.encode(PACKAGE)),
            (MASHUP_SECTION, SECTION.as_bytes().to_vec()),
        ] {
            zip.start_file(name, deflate_options()).unwrap();
            zip.write_all(&body).unwrap();
        }
        let zip_blob = zip.finish().unwrap().into_inner();

        let xml = block_converter();
        MashupFrame {
            zip_blob,
            xml_block1: xml
                .vcs_to_raw(br#"<?xml version="1.0" encoding="utf-8"?><PermissionList/>"#)
                .unwrap(),
            xml_block2: xml
                .vcs_to_raw(br#"<?xml version="1.0" encoding="utf-8"?><LocalPackageMetadataFile/>"#)
                .unwrap(),
            trailer: vec![0x16, 0, 0, 0, 0x50, 0x4B, 0x05, 0x06, 1, 2, 3],
        }
        .encode()
    }

    #[test]
    fn test_decompose_then_rebuild_is_byte_exact() {
        let dir = TempDir::new().unwrap();
        let raw = sample_mashup();
        let conv = MashupConverter::new();

        conv.write_raw_to_vcs(&raw, dir.path()).unwrap();
        assert!(dir.path().join(MASHUP_SECTION).is_file());
        assert!(dir.path().join(MASHUP_XML1_NAME).is_file());
        assert!(dir.path().join(ORDER_INDEX_NAME).is_file());

        let mut rebuilt = Vec::new();
        conv.write_vcs_to_raw(dir.path(), &mut rebuilt).unwrap();
        assert_eq!(rebuilt, raw);
    }

    #[test]
    fn test_inner_order_recorded() {
        let dir = TempDir::new().unwrap();
        MashupConverter::new()
            .write_raw_to_vcs(&sample_mashup(), dir.path())
            .unwrap();
        let order = fs::read_to_string(dir.path().join(ORDER_INDEX_NAME)).unwrap();
        assert_eq!(
            order,
            format!("{MASHUP_CONTENT_TYPES}\n{MASHUP_PACKAGE}\n{MASHUP_SECTION}")
        );
    }

    #[test]
    fn test_unknown_inner_entry_is_fatal() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("Bogus.bin", deflate_options()).unwrap();
        zip.write_all(b"x").unwrap();
        let zip_blob = zip.finish().unwrap().into_inner();
        let xml = block_converter();
        let raw = MashupFrame {
            zip_blob,
            xml_block1: xml.vcs_to_raw(b"<a/>").unwrap(),
            xml_block2: xml.vcs_to_raw(b"<b/>").unwrap(),
            trailer: Vec::new(),
        }
        .encode();

        let dir = TempDir::new().unwrap();
        assert!(matches!(
            MashupConverter::new().write_raw_to_vcs(&raw, dir.path()),
            Err(PbvError::UnknownMashupMember(_))
        ));
    }

    #[test]
    fn test_textconv_labels_all_pieces() {
        let mut out = Vec::new();
        MashupConverter::new()
            .raw_to_textconv(&sample_mashup(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("Filename: {MASHUP_CONTENT_TYPES}")));
        assert!(text.contains("DataMashup -> XML Block 1"));
        assert!(text.contains("DataMashup -> Extra Content"));
        assert!(text.contains("File hash: "));
    }
}
