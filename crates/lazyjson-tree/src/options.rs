//! Parse options.

use lazyjson_scan::DEFAULT_MAX_DEPTH;

/// Options controlling how a document is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum container nesting depth (default: 256)
    pub max_depth: usize,

    /// Reject inputs longer than this many bytes (default: no limit beyond
    /// the 4 GiB span range)
    pub max_input_len: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum input length in bytes.
    pub fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = Some(len);
        self
    }
}
