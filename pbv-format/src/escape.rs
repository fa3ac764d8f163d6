//! Byte-string escape codec for metadata members
//!
//! Metadata members are nearly readable as-is, so instead of a binary
//! dump the vcs form renders them as a source-code-style byte-string
//! literal (`b'...'`) with a line feed inserted after every run of hex
//! escapes. Stripping the line feeds and parsing the literal recovers the
//! original bytes exactly.

use crate::error::{PbvError, Result};

/// One lexical token of the escaped representation.
#[derive(Debug, PartialEq, Eq)]
enum Token {
    /// Printable character or short escape (`\\`, `\'`, `\t`, `\n`, `\r`).
    Literal(String),
    /// Hex escape of a non-printable byte (`\xNN`).
    Hex(String),
}

fn tokenize(data: &[u8]) -> Vec<Token> {
    data.iter()
        .map(|&b| match b {
            b'\\' => Token::Literal("\\\\".to_string()),
            b'\'' => Token::Literal("\\'".to_string()),
            b'\t' => Token::Literal("\\t".to_string()),
            b'\n' => Token::Literal("\\n".to_string()),
            b'\r' => Token::Literal("\\r".to_string()),
            0x20..=0x7E => Token::Literal((b as char).to_string()),
            _ => Token::Hex(format!("\\x{b:02x}")),
        })
        .collect()
}

/// Render bytes as a byte-string literal with no line breaks.
pub fn escape_bytes(data: &[u8]) -> String {
    let mut out = String::from("b'");
    for token in tokenize(data) {
        match token {
            Token::Literal(s) | Token::Hex(s) => out.push_str(&s),
        }
    }
    out.push('\'');
    out
}

/// Render bytes as a byte-string literal, broken into lines after every
/// run of hex escapes.
///
/// Fails if the plain escaped representation already contains a literal
/// line feed, since the inserted delimiter would then be ambiguous. The
/// current escape table never produces one, but the guard stays in case
/// the table ever changes.
pub fn escape_bytes_multiline(data: &[u8]) -> Result<String> {
    if escape_bytes(data).contains('\n') {
        return Err(PbvError::AmbiguousDelimiter);
    }
    let mut out = String::from("b'");
    let mut prev_was_hex = false;
    for token in tokenize(data) {
        match token {
            Token::Hex(s) => {
                out.push_str(&s);
                prev_was_hex = true;
            }
            Token::Literal(s) => {
                if prev_was_hex {
                    out.push('\n');
                }
                out.push_str(&s);
                prev_was_hex = false;
            }
        }
    }
    out.push('\'');
    Ok(out)
}

/// Parse a byte-string literal back into the original bytes.
///
/// Literal line feeds (the inserted delimiters) must be removed by the
/// caller beforehand; they are rejected here.
pub fn unescape_bytes(text: &str) -> Result<Vec<u8>> {
    let body = text
        .strip_prefix("b'")
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| PbvError::BadEscape("missing b'...' delimiters".to_string()))?;

    let mut out = Vec::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if !(' '..='~').contains(&c) {
                return Err(PbvError::BadEscape(format!("unexpected character {c:?}")));
            }
            out.push(c as u8);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push(b'\\'),
            Some('\'') => out.push(b'\''),
            Some('t') => out.push(b'\t'),
            Some('n') => out.push(b'\n'),
            Some('r') => out.push(b'\r'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                let (hi, lo) = match (hi, lo) {
                    (Some(h), Some(l)) => (h, l),
                    _ => return Err(PbvError::BadEscape("truncated hex escape".to_string())),
                };
                let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16)
                    .map_err(|e| PbvError::BadEscape(e.to_string()))?;
                out.push(byte);
            }
            other => {
                return Err(PbvError::BadEscape(format!(
                    "unsupported escape sequence {other:?}"
                )))
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_printable_passthrough() {
        assert_eq!(escape_bytes(b"hello"), "b'hello'");
    }

    #[test]
    fn test_escape_control_bytes() {
        assert_eq!(escape_bytes(b"\x00ab\xff"), "b'\\x00ab\\xff'");
        assert_eq!(escape_bytes(b"a\nb"), "b'a\\nb'");
        assert_eq!(escape_bytes(b"\\'"), "b'\\\\\\''");
    }

    #[test]
    fn test_multiline_breaks_after_hex_runs() {
        let rendered = escape_bytes_multiline(b"\x00\x01ab\x02c").unwrap();
        assert_eq!(rendered, "b'\\x00\\x01\nab\\x02\nc'");
    }

    #[test]
    fn test_multiline_no_break_without_hex() {
        assert_eq!(escape_bytes_multiline(b"plain").unwrap(), "b'plain'");
    }

    #[test]
    fn test_unescape_roundtrip() {
        let data = b"\x00\x01ab\\'\t\n\r\xfe\xff";
        let rendered = escape_bytes(data);
        assert_eq!(unescape_bytes(&rendered).unwrap(), data);
    }

    #[test]
    fn test_unescape_rejects_missing_delimiters() {
        assert!(unescape_bytes("hello").is_err());
        assert!(unescape_bytes("b'hello").is_err());
    }

    #[test]
    fn test_unescape_rejects_truncated_hex() {
        assert!(unescape_bytes("b'\\x0'").is_err());
    }

    proptest! {
        #[test]
        fn prop_escape_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let rendered = escape_bytes(&data);
            prop_assert_eq!(unescape_bytes(&rendered).unwrap(), data);
        }

        #[test]
        fn prop_multiline_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let rendered = escape_bytes_multiline(&data).unwrap();
            let stripped: String = rendered.chars().filter(|&c| c != '\n').collect();
            prop_assert_eq!(unescape_bytes(&stripped).unwrap(), data);
        }
    }
}
