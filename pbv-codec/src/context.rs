//! Per-call conversion context
//!
//! Converters hold no mutable state; everything a single conversion needs
//! travels in this context so repeated invocations cannot leak state
//! between runs.

use std::path::Path;

/// State for one conversion call.
#[derive(Debug, Clone, Copy)]
pub struct ConvertContext<'a> {
    /// Apply the partially lossy diff-friendly transforms.
    pub diffable: bool,
    /// Directory holding the member's vcs form; reference files are
    /// written to and resolved from subfolders of this directory.
    pub vcs_dir: &'a Path,
}

impl<'a> ConvertContext<'a> {
    /// Create a context rooted at the given vcs directory.
    pub fn new(diffable: bool, vcs_dir: &'a Path) -> Self {
        Self { diffable, vcs_dir }
    }
}
