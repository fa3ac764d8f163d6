//! Text encodings used by container members
//!
//! The container mixes UTF-8, UTF-8 with a leading signature, and
//! UTF-16LE members. `encoding_rs` handles UTF-16LE decoding; encoding to
//! UTF-16LE and the UTF-8 signature are handled at the byte level since
//! the encoding layer only understands base encoding names.

use crate::error::{PbvError, Result};
use encoding_rs::UTF_16LE;

/// The three-byte UTF-8 signature (byte-order-mark equivalent).
pub const UTF8_SIGNATURE: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Text encoding of a container member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Plain UTF-8, no signature.
    Utf8,
    /// UTF-8 preceded by the three signature bytes.
    Utf8Sig,
    /// UTF-16 little-endian, no byte order mark.
    Utf16Le,
}

impl TextEncoding {
    /// Base encoding name as it appears in XML declarations.
    ///
    /// Signature and endianness variants are not valid declaration values,
    /// so both UTF-8 flavours declare `utf-8` and UTF-16LE declares
    /// `utf-16`.
    pub fn base_name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Sig => "utf-8",
            TextEncoding::Utf16Le => "utf-16",
        }
    }

    /// Decode raw member bytes into text.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| PbvError::Encoding(e.to_string())),
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(&UTF8_SIGNATURE).unwrap_or(bytes);
                String::from_utf8(body.to_vec()).map_err(|e| PbvError::Encoding(e.to_string()))
            }
            TextEncoding::Utf16Le => {
                let (text, had_errors) = UTF_16LE.decode_without_bom_handling(bytes);
                if had_errors {
                    return Err(PbvError::Encoding("invalid UTF-16LE input".to_string()));
                }
                Ok(text.into_owned())
            }
        }
    }

    /// Encode text into raw member bytes.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Sig => {
                let mut out = Vec::with_capacity(text.len() + UTF8_SIGNATURE.len());
                out.extend_from_slice(&UTF8_SIGNATURE);
                out.extend_from_slice(text.as_bytes());
                out
            }
            TextEncoding::Utf16Le => text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect(),
        }
    }
}
