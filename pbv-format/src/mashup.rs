//! DataMashup frame codec
//!
//! The DataMashup member embeds a secondary zip archive, two
//! length-prefixed XML blocks, and an opaque trailing byte range. The
//! layout is hand-reverse-engineered; there is no published
//! specification, so decode-then-encode must reproduce the input byte
//! stream exactly. All length fields are little-endian u32:
//!
//! ```text
//! 00 00 00 00                 magic
//! L1  <L1 bytes>              inner zip archive
//! L2  <L2 bytes>              xml block 1 (UTF-8 with signature)
//! V   00 00 00 00  L3  <L3 bytes>   xml block 2, with V == L3 + 34
//! <remaining bytes>           trailer, carried verbatim
//! ```
//!
//! The trailer contains a foreign end-of-central-directory marker and
//! other bytes the consuming application insists on; it is never
//! interpreted.

use crate::constants::{MASHUP_MAGIC, XML_BLOCK2_LENGTH_BIAS};
use crate::error::{PbvError, Result};

/// Parsed DataMashup frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MashupFrame {
    /// Raw bytes of the inner zip archive.
    pub zip_blob: Vec<u8>,
    /// First length-prefixed XML block.
    pub xml_block1: Vec<u8>,
    /// Second length-prefixed XML block.
    pub xml_block2: Vec<u8>,
    /// Opaque trailing bytes, preserved verbatim.
    pub trailer: Vec<u8>,
}

fn read_u32(bytes: &[u8], pos: usize) -> Result<u32> {
    let end = pos.checked_add(4).ok_or(PbvError::UnexpectedEof)?;
    let slice = bytes.get(pos..end).ok_or(PbvError::UnexpectedEof)?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

fn read_block(bytes: &[u8], pos: usize, len: u32) -> Result<&[u8]> {
    let end = pos.checked_add(len as usize).ok_or(PbvError::UnexpectedEof)?;
    bytes.get(pos..end).ok_or(PbvError::UnexpectedEof)
}

impl MashupFrame {
    /// Decode a frame from raw member bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.get(..4) != Some(&MASHUP_MAGIC[..]) {
            return Err(PbvError::InvalidMagic);
        }
        let mut pos = 4;

        let zip_len = read_u32(bytes, pos)?;
        pos += 4;
        let zip_blob = read_block(bytes, pos, zip_len)?.to_vec();
        pos += zip_len as usize;

        let xml1_len = read_u32(bytes, pos)?;
        pos += 4;
        let xml_block1 = read_block(bytes, pos, xml1_len)?.to_vec();
        pos += xml1_len as usize;

        let biased_len = read_u32(bytes, pos)?;
        pos += 4;
        let padding = read_block(bytes, pos, 4)?;
        if padding != MASHUP_MAGIC {
            return Err(PbvError::InvalidMagic);
        }
        pos += 4;
        let xml2_len = read_u32(bytes, pos)?;
        pos += 4;
        if biased_len.wrapping_sub(xml2_len) != XML_BLOCK2_LENGTH_BIAS {
            return Err(PbvError::LengthMismatch {
                expected: xml2_len.wrapping_add(XML_BLOCK2_LENGTH_BIAS),
                actual: biased_len,
            });
        }
        let xml_block2 = read_block(bytes, pos, xml2_len)?.to_vec();
        pos += xml2_len as usize;

        Ok(Self {
            zip_blob,
            xml_block1,
            xml_block2,
            trailer: bytes[pos..].to_vec(),
        })
    }

    /// Encode the frame back into raw member bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            24 + self.zip_blob.len()
                + self.xml_block1.len()
                + self.xml_block2.len()
                + self.trailer.len(),
        );
        out.extend_from_slice(&MASHUP_MAGIC);
        out.extend_from_slice(&(self.zip_blob.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.zip_blob);
        out.extend_from_slice(&(self.xml_block1.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.xml_block1);
        let xml2_len = self.xml_block2.len() as u32;
        out.extend_from_slice(&(xml2_len + XML_BLOCK2_LENGTH_BIAS).to_le_bytes());
        out.extend_from_slice(&MASHUP_MAGIC);
        out.extend_from_slice(&xml2_len.to_le_bytes());
        out.extend_from_slice(&self.xml_block2);
        out.extend_from_slice(&self.trailer);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_frame() -> MashupFrame {
        MashupFrame {
            zip_blob: b"PK-inner-zip-bytes".to_vec(),
            xml_block1: b"<a/>".to_vec(),
            xml_block2: b"<b attr='1'/>".to_vec(),
            trailer: vec![0x16, 0x00, 0x00, 0x00, 0x50, 0x4B, 0x05, 0x06, 0xAA],
        }
    }

    #[test]
    fn test_frame_roundtrip() {
        let frame = sample_frame();
        let bytes = frame.encode();
        let decoded = MashupFrame::decode(&bytes).unwrap();
        assert_eq!(decoded, frame);
        // Exact byte reproduction, not just field equality.
        assert_eq!(decoded.encode(), bytes);
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let mut bytes = sample_frame().encode();
        bytes[0] = 1;
        assert!(matches!(
            MashupFrame::decode(&bytes),
            Err(PbvError::InvalidMagic)
        ));
    }

    #[test]
    fn test_decode_rejects_biased_length_violation() {
        let frame = sample_frame();
        let bytes = frame.encode();
        // The biased length field sits right after the two leading blocks.
        let offset = 4 + 4 + frame.zip_blob.len() + 4 + frame.xml_block1.len();
        let mut corrupted = bytes.clone();
        let bad = (frame.xml_block2.len() as u32 + XML_BLOCK2_LENGTH_BIAS + 1).to_le_bytes();
        corrupted[offset..offset + 4].copy_from_slice(&bad);
        assert!(matches!(
            MashupFrame::decode(&corrupted),
            Err(PbvError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_nonzero_padding() {
        let frame = sample_frame();
        let bytes = frame.encode();
        let offset = 4 + 4 + frame.zip_blob.len() + 4 + frame.xml_block1.len() + 4;
        let mut corrupted = bytes.clone();
        corrupted[offset] = 0xFF;
        assert!(MashupFrame::decode(&corrupted).is_err());
    }

    #[test]
    fn test_decode_rejects_truncation() {
        let bytes = sample_frame().encode();
        for cut in [0, 3, 7, 10, bytes.len() - sample_frame().trailer.len() - 1] {
            assert!(MashupFrame::decode(&bytes[..cut]).is_err(), "cut={cut}");
        }
    }

    #[test]
    fn test_empty_trailer_allowed() {
        let mut frame = sample_frame();
        frame.trailer.clear();
        let bytes = frame.encode();
        assert_eq!(MashupFrame::decode(&bytes).unwrap(), frame);
    }

    proptest! {
        #[test]
        fn prop_frame_roundtrip(
            zip_blob in proptest::collection::vec(any::<u8>(), 0..256),
            xml_block1 in proptest::collection::vec(any::<u8>(), 0..128),
            xml_block2 in proptest::collection::vec(any::<u8>(), 0..128),
            trailer in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let frame = MashupFrame { zip_blob, xml_block1, xml_block2, trailer };
            let bytes = frame.encode();
            let decoded = MashupFrame::decode(&bytes).unwrap();
            prop_assert_eq!(&decoded, &frame);
            prop_assert_eq!(decoded.encode(), bytes);
        }
    }
}
