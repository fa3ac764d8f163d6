//! PBV Format - Core primitives for Power BI template conversion
//!
//! This crate provides the format-level building blocks for PBV with no
//! filesystem dependencies. It includes:
//!
//! - Wrapper keys, sentinel names, and frame constants
//! - The DataMashup binary frame codec (length-prefixed layout)
//! - Text encoding helpers (UTF-8, UTF-8 with signature, UTF-16LE)
//! - The byte-string escape codec used for metadata members
//! - The order-index line format
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod index;
pub mod mashup;

// Re-export commonly used types
pub use encoding::TextEncoding;
pub use error::{PbvError, Result};
pub use index::OrderIndex;
pub use mashup::MashupFrame;
