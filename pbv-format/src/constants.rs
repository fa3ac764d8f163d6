//! Wrapper keys, sentinel names, and frame constants

/// Wrapper key marking a string that itself parsed as JSON.
pub const EMBEDDED_JSON_KEY: &str = "__powerbi-vcs-embedded-json__";

/// Wrapper key marking a multiline string stored as an array of lines.
pub const MULTILINE_KEY: &str = "__powerbi-vcs-multiline__";

/// Wrapper key marking a list element externalized into a sibling file.
pub const REFERENCED_ENTRY_KEY: &str = "__powerbi-vcs-reference__";

/// Key holding the original element inside a reference file.
pub const REFERENCED_VALUE_KEY: &str = "value";

/// Mapping keys whose values are too volatile to keep under version control.
pub const VOLATILE_DATE_KEYS: [&str; 3] =
    ["modifiedTime", "structureModifiedTime", "refreshedTime"];

/// Fixed timestamp written over volatile date fields in diffable mode.
pub const VOLATILE_DATE_SENTINEL: &str = "1699-12-31T00:00:00";

/// List keys whose named elements are externalized into sibling files.
pub const REFERENCE_LIST_KEYS: [&str; 3] = ["tables", "sections", "bookmarks"];

/// Name of the order-index sentinel file at the root of a decomposed tree.
pub const ORDER_INDEX_NAME: &str = ".zo";

/// DataMashup frame magic: four zero bytes.
pub const MASHUP_MAGIC: [u8; 4] = [0, 0, 0, 0];

/// Empirical bias between the mashup's paired second-XML length fields.
///
/// No documented justification exists for this value; it was derived by
/// byte-matching real containers and must be preserved as-is.
pub const XML_BLOCK2_LENGTH_BIAS: u32 = 34;

/// vcs file name for the mashup's first XML block.
pub const MASHUP_XML1_NAME: &str = "3.xml";

/// vcs file name for the mashup's second XML block.
pub const MASHUP_XML2_NAME: &str = "6.xml";

/// vcs file name for the mashup's opaque trailing bytes.
pub const MASHUP_TRAILER_NAME: &str = "7.bytes";

/// Inner zip entry holding the content-types XML.
pub const MASHUP_CONTENT_TYPES: &str = "[Content_Types].xml";

/// Inner zip entry holding the package XML.
pub const MASHUP_PACKAGE: &str = "Config/Package.xml";

/// Inner zip entry holding the formula-language section.
pub const MASHUP_SECTION: &str = "Formulas/Section1.m";
