//! On-demand construction of a node's children or value.
//!
//! Materializing re-scans the node's own source range. Because the whole
//! document was validated at parse time, a scan failure here means the
//! buffer no longer matches what was validated, which is a bug rather than
//! bad input.

use lazyjson_scan::{Cursor, Layer, ScanError, Span, ValueKind, scan_literal, scan_number, scan_string};
use tracing::trace;

use crate::node::{LeafValue, NodeData, NodeId, NodeState};
use crate::unescape::unescape;
use crate::{Document, NodeKind};

/// A validated range that failed to re-scan.
#[derive(Debug)]
pub(crate) struct Corruption {
    id: NodeId,
    kind: NodeKind,
    span: Span,
    reason: Reason,
}

#[derive(Debug)]
enum Reason {
    Scan(ScanError),
    Length { expected: u32, found: u32 },
    Number,
    Kind,
}

impl std::fmt::Display for Corruption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node {:?} ({:?} at {}..{}) ",
            self.id, self.kind, self.span.start, self.span.end
        )?;
        match &self.reason {
            Reason::Scan(err) => write!(f, "failed to re-scan: {err}"),
            Reason::Length { expected, found } => {
                write!(f, "re-scanned to {found}, expected {expected}")
            }
            Reason::Number => write!(f, "holds an unparsable number"),
            Reason::Kind => write!(f, "has no value kind"),
        }
    }
}

impl std::error::Error for Corruption {}

impl Document {
    /// Build the state of node `id`.
    ///
    /// # Panics
    ///
    /// Panics if the node's source range no longer scans as it did during
    /// validation.
    pub(crate) fn materialize(&self, id: NodeId, data: &NodeData) -> NodeState {
        match self.build_state(id, data) {
            Ok(state) => state,
            Err(err) => panic!("document invariant violated: {err}"),
        }
    }

    fn build_state(&self, id: NodeId, data: &NodeData) -> Result<NodeState, Corruption> {
        let text = self.text();
        let span = data.span;
        let corrupt = |reason| Corruption {
            id,
            kind: data.kind,
            span,
            reason,
        };
        let cursor = Cursor::at(text, span.start);
        let check_end = |end: Cursor<'_>| {
            if end.position() == span.end {
                Ok(())
            } else {
                Err(corrupt(Reason::Length {
                    expected: span.end,
                    found: end.position(),
                }))
            }
        };

        let state = match data.kind {
            NodeKind::Object | NodeKind::Array => {
                let kind = if data.kind == NodeKind::Object {
                    ValueKind::Object
                } else {
                    ValueKind::Array
                };
                let layer = Layer::new(text, span.start, kind, self.options().max_depth)
                    .map_err(|err| corrupt(Reason::Scan(err)))?;

                let mut built = Vec::new();
                for member in layer {
                    let member = member.map_err(|err| corrupt(Reason::Scan(err)))?;
                    let name = member.name.map(|name| {
                        let inner = Span::new(name.start + 1, name.end - 1).slice(text);
                        unescape(inner).into_owned().into_boxed_str()
                    });
                    built.push(NodeData::new(member.kind.into(), member.span, name, Some(id)));
                }

                if built.is_empty() {
                    NodeState::Leaf(LeafValue::None)
                } else {
                    trace!(?id, children = built.len(), "Materialized container");
                    NodeState::Children(self.push_nodes(built))
                }
            }
            NodeKind::Number => {
                check_end(scan_number(cursor).map_err(|err| corrupt(Reason::Scan(err)))?)?;
                let value: f64 = span
                    .slice(text)
                    .parse()
                    .map_err(|_| corrupt(Reason::Number))?;
                trace!(?id, value, "Materialized number");
                NodeState::Leaf(LeafValue::Number {
                    value,
                    rounded: value.round() as i64,
                })
            }
            NodeKind::String => {
                check_end(scan_string(cursor).map_err(|err| corrupt(Reason::Scan(err)))?)?;
                let inner = Span::new(span.start + 1, span.end - 1).slice(text);
                let value = unescape(inner).into_owned().into_boxed_str();
                trace!(?id, len = value.len(), "Materialized string");
                NodeState::Leaf(LeafValue::String(value))
            }
            NodeKind::True | NodeKind::False | NodeKind::Null => {
                let kind = match data.kind {
                    NodeKind::True => ValueKind::True,
                    NodeKind::False => ValueKind::False,
                    _ => ValueKind::Null,
                };
                check_end(scan_literal(cursor, kind).map_err(|err| corrupt(Reason::Scan(err)))?)?;
                NodeState::Leaf(LeafValue::None)
            }
            NodeKind::Invalid => return Err(corrupt(Reason::Kind)),
        };
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Document, NodeKind};

    #[test]
    fn test_children_built_once() {
        let doc = Document::parse(r#"{"a":[1,2,3],"b":{"c":null}}"#).unwrap();
        assert_eq!(doc.materialized_count(), 1);

        let root = doc.root();
        assert_eq!(root.children_count(), 2);
        assert_eq!(doc.materialized_count(), 3);

        // asking again reuses the same nodes
        assert_eq!(root.children_count(), 2);
        assert_eq!(root.child(0), root.child(0));
        assert_eq!(doc.materialized_count(), 3);

        let a = root.child(0).unwrap();
        assert!(!a.is_materialized());
        assert_eq!(a.children_count(), 3);
        assert!(a.is_materialized());
        assert_eq!(doc.materialized_count(), 6);
    }

    #[test]
    fn test_empty_container_is_leaf() {
        let doc = Document::parse(r#"{"o":{},"a":[ ]}"#).unwrap();
        let root = doc.root();
        for child in root.children() {
            assert!(child.kind().is_container());
            assert_eq!(child.children_count(), 0);
            assert!(child.child(0).is_none());
        }
        assert_eq!(doc.materialized_count(), 3);
    }

    #[test]
    fn test_member_names_decoded() {
        let doc = Document::parse(r#"{"a\tb":1,"\u00e9":2}"#).unwrap();
        let root = doc.root();
        assert_eq!(root.child(0).unwrap().name(), "a\tb");
        assert_eq!(root.child(1).unwrap().name(), "\u{e9}");
    }

    #[test]
    fn test_number_values() {
        let doc = Document::parse("[2.5, -2.5, 1e3, -0, 1E-2, 123456789012]").unwrap();
        let values: Vec<(f64, i64)> = doc
            .root()
            .children()
            .map(|n| (n.value_as_f64(), n.value_as_i64()))
            .collect();
        assert_eq!(
            values,
            vec![
                (2.5, 3),
                (-2.5, -3),
                (1000.0, 1000),
                (0.0, 0),
                (0.01, 0),
                (123456789012.0, 123456789012),
            ]
        );
    }

    #[test]
    fn test_huge_number_saturates() {
        let doc = Document::parse("[1e300, -1e300]").unwrap();
        let root = doc.root();
        assert_eq!(root.child(0).unwrap().value_as_i64(), i64::MAX);
        assert_eq!(root.child(1).unwrap().value_as_i64(), i64::MIN);
    }

    #[test]
    fn test_literals() {
        let doc = Document::parse("[true,false,null]").unwrap();
        let kinds: Vec<_> = doc.root().children().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::True, NodeKind::False, NodeKind::Null]);
        for child in doc.root().children() {
            assert_eq!(child.children_count(), 0);
            assert!(child.is_materialized());
        }
    }
}
