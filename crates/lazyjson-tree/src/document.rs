//! Document construction and ownership.

use std::cell::RefCell;
use std::rc::Rc;

use lazyjson_scan::{Cursor, Span, ValueKind, Validator};
use tracing::{debug, trace};

use crate::node::{NodeData, NodeId};
use crate::{Node, ParseError, ParseErrorKind, ParseOptions};

/// A parsed JSON document.
///
/// Parsing validates the entire input once and creates only the root node.
/// Every other node is built the first time its parent is read, and kept
/// until the document is dropped.
///
/// A document is single-threaded: it is neither `Send` nor `Sync`.
pub struct Document {
    text: Box<str>,
    options: ParseOptions,
    nodes: RefCell<Vec<Rc<NodeData>>>,
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

impl Document {
    /// Parse with default options.
    pub fn parse(input: impl AsRef<[u8]>) -> Result<Self, ParseError> {
        Self::parse_with_options(input, ParseOptions::default())
    }

    /// Parse with the given options.
    pub fn parse_with_options(
        input: impl AsRef<[u8]>,
        options: ParseOptions,
    ) -> Result<Self, ParseError> {
        let bytes = input.as_ref();
        let result = Self::parse_bytes(bytes, options);
        match &result {
            Ok(doc) => debug!(
                len = bytes.len(),
                kind = ?doc.root().kind(),
                "Parsed document"
            ),
            Err(err) => debug!(
                len = bytes.len(),
                kind = ?err.kind,
                offset = err.span.start,
                "Rejected document"
            ),
        }
        result
    }

    fn parse_bytes(bytes: &[u8], options: ParseOptions) -> Result<Self, ParseError> {
        let len = bytes.len();
        if len == 0 {
            return Err(ParseError::new(ParseErrorKind::Empty, Span::empty(0)));
        }
        let max = options
            .max_input_len
            .unwrap_or(u32::MAX as usize)
            .min(u32::MAX as usize);
        if len > max {
            return Err(ParseError::new(
                ParseErrorKind::InputTooLarge { len, max },
                Span::empty(0),
            ));
        }

        if let Some(pos) = bytes.iter().position(|&b| b == 0) {
            return Err(ParseError::new(
                ParseErrorKind::EmbeddedNul,
                Span::new(pos as u32, pos as u32 + 1),
            ));
        }
        let text = std::str::from_utf8(bytes).map_err(|err| {
            let pos = err.valid_up_to() as u32;
            ParseError::new(ParseErrorKind::InvalidUtf8, Span::new(pos, pos + 1))
        })?;

        let without_leading = text.trim_start_matches(is_ws);
        let lead = (text.len() - without_leading.len()) as u32;
        let trimmed = without_leading.trim_end_matches(is_ws);
        if trimmed.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::OnlyWhitespace,
                Span::new(0, len as u32),
            ));
        }
        trace!(lead, len = trimmed.len(), "Trimmed input");

        let mut buffer = String::new();
        buffer.try_reserve_exact(trimmed.len()).map_err(|_| {
            ParseError::new(ParseErrorKind::OutOfMemory, Span::new(0, len as u32))
        })?;
        buffer.push_str(trimmed);
        let text = buffer.into_boxed_str();

        let cursor = Cursor::new(&text);
        let kind = match cursor.peek() {
            Some(b'{') => ValueKind::Object,
            Some(b'[') => ValueKind::Array,
            _ => {
                return Err(
                    ParseError::new(ParseErrorKind::NotAContainer, cursor.span_through(0))
                        .shifted(lead),
                );
            }
        };

        let mut validator = Validator::new(options.max_depth);
        let end = validator
            .validate(cursor, kind)
            .map_err(|err| ParseError::from(err).shifted(lead))?;
        if !end.is_eof() {
            let rest = end.span_from(end.position());
            let rest = Span::new(rest.start, text.len() as u32);
            return Err(ParseError::new(ParseErrorKind::TrailingContent, rest).shifted(lead));
        }
        trace!(values = validator.values(), "Validated document");

        let root = NodeData::new(kind.into(), Span::new(0, text.len() as u32), None, None);
        Ok(Self {
            text,
            options,
            nodes: RefCell::new(vec![Rc::new(root)]),
        })
    }

    /// The root object or array.
    pub fn root(&self) -> Node<'_> {
        self.node(NodeId::ROOT)
    }

    /// The document text with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The options this document was parsed with; materialization reuses
    /// their depth limit.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Follow `path` from the root. See [`Node::traverse`].
    pub fn traverse(&self, path: &str) -> Option<Node<'_>> {
        self.root().traverse(path)
    }

    /// Number of nodes built so far, the root included.
    pub fn materialized_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Release the document and every node built from it.
    ///
    /// Always succeeds; outstanding node handles borrow the document, so none
    /// can outlive this call.
    pub fn free(self) -> bool {
        debug!(nodes = self.materialized_count(), "Freeing document");
        drop(self);
        true
    }

    pub(crate) fn node(&self, id: NodeId) -> Node<'_> {
        let data = Rc::clone(&self.nodes.borrow()[id.index()]);
        Node::new(self, id, data)
    }

    /// Append freshly built nodes and return their ids.
    pub(crate) fn push_nodes(&self, built: Vec<NodeData>) -> Box<[NodeId]> {
        let mut nodes = self.nodes.borrow_mut();
        let first = nodes.len();
        nodes.extend(built.into_iter().map(Rc::new));
        (first..nodes.len()).map(|i| NodeId(i as u32)).collect()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.text.len())
            .field("nodes", &self.materialized_count())
            .finish()
    }
}
