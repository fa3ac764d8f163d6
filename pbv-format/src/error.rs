//! Error types for PBV

use std::path::PathBuf;
use thiserror::Error;

/// PBV error types
#[derive(Debug, Error)]
pub enum PbvError {
    /// Destination path exists and overwriting was not permitted.
    #[error("Output path {0:?} already exists")]
    AlreadyExists(PathBuf),
    /// Input and output paths refer to the same location.
    #[error("Input and output paths cannot be the same")]
    SamePath,
    /// Input does not start with the expected magic bytes.
    #[error("Invalid magic bytes")]
    InvalidMagic,
    /// A length field does not satisfy the format's arithmetic invariant.
    #[error("Length field mismatch: expected {expected}, found {actual}")]
    LengthMismatch {
        /// Value required by the invariant.
        expected: u32,
        /// Value actually present in the input.
        actual: u32,
    },
    /// Encountered unexpected end of input.
    #[error("Unexpected end of input")]
    UnexpectedEof,
    /// XML document declares an encoding other than the converter expects.
    #[error("XML declares encoding {declared:?}, expected {expected:?}")]
    EncodingMismatch {
        /// Encoding the converter was configured for.
        expected: String,
        /// Encoding declared inside the document.
        declared: String,
    },
    /// The escaped representation already contains the line delimiter.
    #[error("Escaped representation contains a literal line feed; delimiter would be ambiguous")]
    AmbiguousDelimiter,
    /// Escaped byte-string literal could not be parsed back into bytes.
    #[error("Malformed byte-string literal: {0}")]
    BadEscape(String),
    /// Nested container entry has no converter in the fixed dispatch table.
    #[error("Unknown DataMashup member: {0:?}")]
    UnknownMashupMember(String),
    /// Externalized list element carries no usable name field.
    #[error("List element has no name to derive a reference file from")]
    MissingReferenceName,
    /// Text could not be decoded or encoded in the declared encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),
    /// XML parsing or serialization failed.
    #[error("XML error: {0}")]
    Xml(String),
    /// Zip archive could not be read or written.
    #[error("Zip error: {0}")]
    Zip(String),
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Glob pattern in the converter table failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(String),
    /// Internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PbvError>;
