//! Slash-separated path traversal.
//!
//! ```text
//! /a/b        absolute: start from the root
//! a/b         relative to the current node
//! items[2]    element 2 of the array member `items`
//! [0][1]      nested array indices
//! ../x        member `x` of the parent
//! ..          the parent itself
//! ```

use tracing::trace;

use crate::{Node, NodeKind};

impl<'doc> Node<'doc> {
    /// Follow `path` from this node.
    ///
    /// Returns `None` if any step names a missing member, an out-of-range
    /// index, a step into a leaf, or `..` above the root. Object members are
    /// matched by exact decoded name; with duplicate names the first wins.
    /// An empty path returns this node.
    pub fn traverse(&self, path: &str) -> Option<Node<'doc>> {
        let (mut node, mut rest) = match path.strip_prefix('/') {
            Some(rest) => (self.root(), rest),
            None => (self.clone(), path),
        };

        loop {
            if rest.is_empty() {
                return Some(node);
            }
            trace!(node = ?node.id(), rest, "Traverse");

            if rest == ".." {
                return node.parent();
            }
            if let Some(after) = rest.strip_prefix("../") {
                node = node.parent()?;
                rest = after;
                continue;
            }
            if rest.starts_with("..[") {
                node = node.parent()?;
                rest = &rest[2..];
                continue;
            }

            match node.kind() {
                NodeKind::Object => {
                    let end = rest.find(['/', '[']).unwrap_or(rest.len());
                    let name = &rest[..end];
                    let child = node.children().find(|c| c.name_opt() == Some(name))?;
                    rest = &rest[end..];
                    rest = rest.strip_prefix('/').unwrap_or(rest);
                    node = child;
                }
                NodeKind::Array => {
                    let inner = rest.strip_prefix('[')?;
                    let close = inner.find(']')?;
                    let digits = &inner[..close];
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    let child = node.child(digits.parse().ok()?)?;
                    rest = &inner[close + 1..];
                    if let Some(after) = rest.strip_prefix('/') {
                        rest = after;
                    } else if !rest.is_empty() && !rest.starts_with('[') {
                        return None;
                    }
                    node = child;
                }
                _ => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Document, NodeKind};

    const SOURCE: &str = r#"{
        "name": "lazy",
        "nested": {"deep": {"value": 42}},
        "items": [10, [20, 21], {"id": "x"}],
        "dup": 1,
        "dup": 2,
        "a/b": true
    }"#;

    fn doc() -> Document {
        Document::parse(SOURCE).unwrap()
    }

    #[test]
    fn test_member_paths() {
        let doc = doc();
        assert_eq!(doc.traverse("name").unwrap().value_as_str(), Some("lazy"));
        assert_eq!(doc.traverse("/nested/deep/value").unwrap().value_as_i64(), 42);
        assert_eq!(doc.traverse("nested/deep/").unwrap().kind(), NodeKind::Object);
    }

    #[test]
    fn test_index_paths() {
        let doc = doc();
        assert_eq!(doc.traverse("items[0]").unwrap().value_as_f64(), 10.0);
        assert_eq!(doc.traverse("items[1][1]").unwrap().value_as_i64(), 21);
        assert_eq!(doc.traverse("items[2]/id").unwrap().value_as_str(), Some("x"));

        let items = doc.traverse("items").unwrap();
        assert_eq!(items.traverse("[1]").unwrap().children_count(), 2);
    }

    #[test]
    fn test_parent_paths() {
        let doc = doc();
        let deep = doc.traverse("nested/deep").unwrap();
        assert_eq!(deep.traverse("..").unwrap().name(), "nested");
        assert_eq!(deep.traverse("../../name").unwrap().value_as_str(), Some("lazy"));
        assert_eq!(deep.traverse("/name").unwrap().value_as_str(), Some("lazy"));

        let inner = doc.traverse("items[1]").unwrap();
        assert_eq!(inner.traverse("..[0]").unwrap().value_as_i64(), 10);
    }

    #[test]
    fn test_empty_path_is_identity() {
        let doc = doc();
        let items = doc.traverse("items").unwrap();
        assert_eq!(items.traverse(""), Some(items.clone()));
        assert_eq!(doc.traverse("/"), Some(doc.root()));
    }

    #[test]
    fn test_missing_paths() {
        let doc = doc();
        assert!(doc.traverse("missing").is_none());
        assert!(doc.traverse("items[3]").is_none());
        assert!(doc.traverse("items[x]").is_none());
        assert!(doc.traverse("items[+1]").is_none());
        assert!(doc.traverse("items[1").is_none());
        assert!(doc.traverse("items[0]x").is_none());
        assert!(doc.traverse("name/more").is_none());
        assert!(doc.traverse("nested[0]").is_none());
        assert!(doc.traverse("..").is_none());
        assert!(doc.traverse("../name").is_none());
        assert_eq!(NodeKind::of(doc.traverse("nope").as_ref()), NodeKind::Invalid);
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let doc = doc();
        assert_eq!(doc.traverse("dup").unwrap().value_as_i64(), 1);
    }

    #[test]
    fn test_slash_in_name_unreachable() {
        // `/` always separates steps
        let doc = doc();
        assert!(doc.traverse("a/b").is_none());
        let found = doc.root().children().any(|c| c.name() == "a/b");
        assert!(found);
    }

    #[test]
    fn test_deep_path_is_iterative() {
        let depth = 500;
        let source = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        let options = crate::ParseOptions::new().max_depth(depth);
        let doc = Document::parse_with_options(&source, options).unwrap();
        let path = "[0]".repeat(depth);
        let leaf = doc.traverse(&path).unwrap();
        assert_eq!(leaf.value_as_i64(), 1);
    }
}
