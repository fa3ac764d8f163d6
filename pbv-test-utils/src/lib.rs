//! PBV Test Utilities
//!
//! Builds synthetic Power BI template containers for integration tests.
//! Every byte of the fixture is produced by the same encoders the crate
//! itself uses (serde_json compact form, the XML compactor, the deflate
//! writer with a fixed timestamp), so extract-then-compress round trips
//! can be asserted byte-for-byte.

use pbv_codec::mashup::deflate_options;
use pbv_codec::XmlConverter;
use pbv_format::constants::{MASHUP_CONTENT_TYPES, MASHUP_PACKAGE, MASHUP_SECTION};
use pbv_format::{MashupFrame, Result, TextEncoding};
use serde_json::Value;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::ZipWriter;

fn compact_json(text: &str, encoding: TextEncoding) -> Vec<u8> {
    let value: Value = serde_json::from_str(text).expect("fixture JSON must parse");
    encoding.encode(&serde_json::to_string(&value).expect("fixture JSON must serialize"))
}

fn compact_xml(pretty: &str, encoding: TextEncoding, declaration: bool) -> Vec<u8> {
    XmlConverter::new(encoding, declaration)
        .vcs_to_raw(pretty.as_bytes())
        .expect("fixture XML must convert")
}

/// Raw bytes of the sample DataMashup member.
pub fn sample_mashup_bytes() -> Vec<u8> {
    let section = "section Section1;\n\nshared Query1 = let Source = 1 in Source;";
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in [
        (
            MASHUP_CONTENT_TYPES,
            compact_xml(
                r#"<?xml version="1.0" encoding="utf-8"?><Types><Default Extension="xml" ContentType="text/xml"/></Types>"#,
                TextEncoding::Utf8Sig,
                true,
            ),
        ),
        (
            MASHUP_PACKAGE,
            compact_xml(
                r#"<?xml version="1.0" encoding="utf-8"?><Package><Version>2.55</Version></Package>"#,
                TextEncoding::Utf8Sig,
                true,
            ),
        ),
        (MASHUP_SECTION, section.as_bytes().to_vec()),
    ] {
        zip.start_file(name, deflate_options()).expect("fixture zip entry");
        zip.write_all(&body).expect("fixture zip body");
    }
    let zip_blob = zip.finish().expect("fixture zip").into_inner();

    MashupFrame {
        zip_blob,
        xml_block1: compact_xml(
            r#"<?xml version="1.0" encoding="utf-8"?><PermissionList><CanEvaluateFuturePackages>false</CanEvaluateFuturePackages></PermissionList>"#,
            TextEncoding::Utf8Sig,
            true,
        ),
        xml_block2: compact_xml(
            r#"<?xml version="1.0" encoding="utf-8"?><LocalPackageMetadataFile><Items/></LocalPackageMetadataFile>"#,
            TextEncoding::Utf8Sig,
            true,
        ),
        trailer: vec![
            0x16, 0x00, 0x00, 0x00, 0x50, 0x4B, 0x05, 0x06, 0x00, 0x00, 0x00, 0x00, 0xDE, 0xAD,
        ],
    }
    .encode()
}

/// Members of the sample container in archive order.
pub fn sample_members() -> Vec<(String, Vec<u8>)> {
    vec![
        (
            "Version".to_string(),
            TextEncoding::Utf16Le.encode("1.28"),
        ),
        (
            "[Content_Types].xml".to_string(),
            compact_xml(
                r#"<?xml version="1.0" encoding="utf-8"?><Types><Default Extension="json" ContentType=""/><Override PartName="/Version" ContentType=""/></Types>"#,
                TextEncoding::Utf8Sig,
                true,
            ),
        ),
        (
            "DataModelSchema".to_string(),
            compact_json(
                r#"{"name":"Model","modifiedTime":"2024-03-05T09:30:00","model":{"tables":[{"name":"Sales","rows":10},{"name":"Costs","rows":4}]}}"#,
                TextEncoding::Utf16Le,
            ),
        ),
        (
            "Report/Layout".to_string(),
            compact_json(
                r#"{"id":0,"sections":[{"name":"ReportSection1","displayName":"Page 1","query":"line1\nline2","config":"{\"a\":1}"}]}"#,
                TextEncoding::Utf16Le,
            ),
        ),
        ("DataMashup".to_string(), sample_mashup_bytes()),
        (
            "Metadata".to_string(),
            compact_json(r#"{"version":3,"createdFrom":"Cloud"}"#, TextEncoding::Utf16Le),
        ),
        (
            "Report/StaticResources/RegisteredResources/logo.png".to_string(),
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00],
        ),
        ("SecurityBindings".to_string(), vec![0x01, 0x02, 0x03]),
        // Deliberately unmapped: exercises the pass-through fallback.
        ("Unknown.bin".to_string(), b"opaque".to_vec()),
    ]
}

/// Build the sample container and write it to `path`.
pub fn write_sample_container(path: &Path) -> Result<()> {
    let bytes = sample_container_bytes();
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Raw bytes of the sample container archive.
pub fn sample_container_bytes() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in sample_members() {
        zip.start_file(name, deflate_options()).expect("fixture zip entry");
        zip.write_all(&body).expect("fixture zip body");
    }
    zip.finish().expect("fixture zip").into_inner()
}
