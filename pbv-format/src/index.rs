//! Order-index line format
//!
//! A decomposed tree carries a sentinel file (`.zo`) listing the archive
//! members one per line, in the exact order they appeared in the source
//! container. The order is semantically significant to the producing
//! application and must survive every round trip.

/// Ordered list of archive member names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderIndex {
    names: Vec<String>,
}

impl OrderIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member name.
    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Parse the line format. Empty lines are retained so the serialized
    /// form round-trips; iteration skips them.
    pub fn parse(text: &str) -> Self {
        Self {
            names: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Serialize to the line format.
    pub fn to_text(&self) -> String {
        self.names.join("\n")
    }

    /// Iterate member names in order, skipping empty entries.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str).filter(|n| !n.is_empty())
    }

    /// Number of non-empty entries.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True if the index holds no non-empty entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<String> for OrderIndex {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
