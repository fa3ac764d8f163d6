//! PBV Codec - per-member converters
//!
//! This crate maps archive members to converters and implements each
//! conversion between raw container bytes and the decomposed vcs form:
//!
//! - Converter registry (glob patterns, first match wins)
//! - JSON tree transform pipeline and reference store
//! - XML pretty-printer / compactor
//! - Metadata byte-string textifier
//! - DataMashup nested-container decomposer

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod json;
pub mod mashup;
pub mod metadata;
pub mod registry;
pub mod transform;
pub mod xml;

mod refstore;

// Re-export commonly used types
pub use context::ConvertContext;
pub use json::JsonConverter;
pub use mashup::MashupConverter;
pub use metadata::MetadataConverter;
pub use refstore::ReferenceStore;
pub use registry::{Converter, ConverterRegistry};
pub use xml::XmlConverter;
