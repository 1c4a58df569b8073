//! Node handles and their lazily filled state.

use std::cell::OnceCell;
use std::rc::Rc;

use lazyjson_scan::{Span, ValueKind};

use crate::Document;

/// The kind of a node, plus `Invalid` for an absent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No node (e.g. a failed traversal).
    Invalid,
    Object,
    Array,
    True,
    False,
    Null,
    Number,
    String,
}

impl NodeKind {
    /// Kind of an optional node; `Invalid` when there is none.
    pub fn of(node: Option<&Node<'_>>) -> NodeKind {
        node.map_or(NodeKind::Invalid, Node::kind)
    }

    /// Returns true for objects and arrays.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }

    /// Uppercase label used by the tree printer.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Invalid => "INVALID",
            NodeKind::Object => "OBJECT",
            NodeKind::Array => "ARRAY",
            NodeKind::True => "TRUE",
            NodeKind::False => "FALSE",
            NodeKind::Null => "NULL",
            NodeKind::Number => "NUMBER",
            NodeKind::String => "STRING",
        }
    }
}

impl From<ValueKind> for NodeKind {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Object => NodeKind::Object,
            ValueKind::Array => NodeKind::Array,
            ValueKind::True => NodeKind::True,
            ValueKind::False => NodeKind::False,
            ValueKind::Null => NodeKind::Null,
            ValueKind::Number => NodeKind::Number,
            ValueKind::String => NodeKind::String,
        }
    }
}

/// Index of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root node of every document.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena entry for one node.
#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    /// Exact source text of the value, quotes and brackets included.
    pub(crate) span: Span,
    /// Decoded member name, for object members.
    pub(crate) name: Option<Box<str>>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) state: OnceCell<NodeState>,
}

impl NodeData {
    pub(crate) fn new(
        kind: NodeKind,
        span: Span,
        name: Option<Box<str>>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            kind,
            span,
            name,
            parent,
            state: OnceCell::new(),
        }
    }
}

/// What a node holds once materialized.
#[derive(Debug)]
pub(crate) enum NodeState {
    Leaf(LeafValue),
    Children(Box<[NodeId]>),
}

#[derive(Debug)]
pub(crate) enum LeafValue {
    /// Literals and empty containers.
    None,
    Number { value: f64, rounded: i64 },
    String(Box<str>),
}

/// A handle to one node of a [`Document`].
///
/// Handles are cheap to clone and stay valid for as long as the document is
/// borrowed. Reading a value, a child or a child count materializes the node
/// on first use; the name, kind and span never require it.
///
/// Nodes cannot be freed individually; only the [`Document`] can, by being
/// dropped or passed to [`Document::free`].
#[derive(Clone)]
pub struct Node<'doc> {
    doc: &'doc Document,
    id: NodeId,
    data: Rc<NodeData>,
}

impl<'doc> Node<'doc> {
    pub(crate) fn new(doc: &'doc Document, id: NodeId, data: Rc<NodeData>) -> Self {
        Self { doc, id, data }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind
    }

    /// Source range of this value within [`Document::text`].
    pub fn span(&self) -> Span {
        self.data.span
    }

    /// Member name, or the empty string for array elements and the root.
    pub fn name(&self) -> &str {
        self.name_opt().unwrap_or("")
    }

    /// Member name, if this node is an object member.
    pub fn name_opt(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.data.parent.is_none()
    }

    pub fn parent(&self) -> Option<Node<'doc>> {
        self.data.parent.map(|id| self.doc.node(id))
    }

    pub fn root(&self) -> Node<'doc> {
        self.doc.root()
    }

    /// The whole (trimmed) document text, whichever node it is asked from.
    pub fn document_text(&self) -> &'doc str {
        self.doc.text()
    }

    /// Source text of this value, still escaped.
    pub fn raw_text(&self) -> &'doc str {
        self.data.span.slice(self.doc.text())
    }

    /// Whether this node's children or value have been built yet.
    pub fn is_materialized(&self) -> bool {
        self.data.state.get().is_some()
    }

    fn ensure_materialized(&self) -> &NodeState {
        self.data
            .state
            .get_or_init(|| self.doc.materialize(self.id, &self.data))
    }

    /// Number of direct children; zero for leaves and empty containers.
    pub fn children_count(&self) -> usize {
        match self.ensure_materialized() {
            NodeState::Children(ids) => ids.len(),
            NodeState::Leaf(_) => 0,
        }
    }

    /// The child at `index`, in document order.
    pub fn child(&self, index: usize) -> Option<Node<'doc>> {
        match self.ensure_materialized() {
            NodeState::Children(ids) => ids.get(index).map(|&id| self.doc.node(id)),
            NodeState::Leaf(_) => None,
        }
    }

    /// Iterate over the direct children in document order.
    pub fn children(&self) -> impl Iterator<Item = Node<'doc>> + '_ {
        (0..self.children_count()).filter_map(move |index| self.child(index))
    }

    /// The decoded string, if this is a string node.
    pub fn value_as_str(&self) -> Option<&str> {
        if self.kind() != NodeKind::String {
            return None;
        }
        match self.ensure_materialized() {
            NodeState::Leaf(LeafValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The numeric value, or NaN if this is not a number.
    pub fn value_as_f64(&self) -> f64 {
        if self.kind() != NodeKind::Number {
            return f64::NAN;
        }
        match self.ensure_materialized() {
            NodeState::Leaf(LeafValue::Number { value, .. }) => *value,
            _ => f64::NAN,
        }
    }

    /// The number rounded half away from zero (saturating), 1 for `true`,
    /// and 0 for everything else.
    pub fn value_as_i64(&self) -> i64 {
        match self.kind() {
            NodeKind::True => 1,
            NodeKind::Number => match self.ensure_materialized() {
                NodeState::Leaf(LeafValue::Number { rounded, .. }) => *rounded,
                _ => 0,
            },
            _ => 0,
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Node");
        s.field("id", &self.id).field("kind", &self.kind());
        if let Some(name) = self.name_opt() {
            s.field("name", &name);
        }
        s.field("span", &self.span()).finish()
    }
}
