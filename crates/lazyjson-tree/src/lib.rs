#![doc = include_str!("../README.md")]

mod diagnostic;
mod document;
mod materialize;
mod node;
mod options;
mod path;
mod unescape;

pub use diagnostic::{ParseError, ParseErrorKind};
pub use document::Document;
pub use lazyjson_scan::{ScanErrorKind, Span};
pub use node::{Node, NodeId, NodeKind};
pub use options::ParseOptions;
pub use unescape::unescape;

/// Parse a JSON document with default options.
pub fn parse(input: impl AsRef<[u8]>) -> Result<Document, ParseError> {
    Document::parse(input)
}
