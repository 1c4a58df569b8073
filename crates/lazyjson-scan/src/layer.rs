//! Walk the direct members of one container.
//!
//! This is the re-scan half of the two-phase contract: a container that the
//! [`Validator`] already accepted is walked again, one layer deep, yielding
//! the span and kind of each member value. Nested values are skipped with the
//! validator rather than descended into by the caller.

use crate::validator::skip_ws;
use crate::{Cursor, ScanError, ScanErrorKind, Span, ValueKind, Validator};

/// One direct member of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// The quoted member name (quotes included), for object members.
    pub name: Option<Span>,
    /// Kind of the member value.
    pub kind: ValueKind,
    /// Exact text of the member value.
    pub span: Span,
}

/// Iterator over the members of one object or array.
pub struct Layer<'src> {
    cursor: Cursor<'src>,
    kind: ValueKind,
    close: u8,
    validator: Validator,
    done: bool,
}

impl<'src> Layer<'src> {
    /// Start walking the container of `kind` that begins at `start`.
    pub fn new(
        source: &'src str,
        start: u32,
        kind: ValueKind,
        max_depth: usize,
    ) -> Result<Self, ScanError> {
        let cursor = Cursor::at(source, start);
        let (open, close) = match kind {
            ValueKind::Object => (b'{', b'}'),
            _ => (b'[', b']'),
        };
        if !kind.is_container() || cursor.peek() != Some(open) {
            return Err(ScanError::new(
                ScanErrorKind::UnexpectedChar,
                cursor.span_through(start),
            ));
        }

        let cursor = skip_ws(cursor.advance(1))?;
        let done = cursor.peek() == Some(close);
        Ok(Self {
            cursor,
            kind,
            close,
            validator: Validator::new(max_depth),
            done,
        })
    }

    fn next_member(&mut self) -> Result<Member, ScanError> {
        let mut cursor = self.cursor;

        let name = if self.kind == ValueKind::Object {
            let start = cursor.position();
            let end = crate::scan_string(cursor)?;
            let name = end.span_from(start);
            cursor = skip_ws(end)?;
            if cursor.peek() != Some(b':') {
                return Err(ScanError::new(
                    ScanErrorKind::ExpectedColon,
                    cursor.span_through(cursor.position()),
                ));
            }
            cursor = skip_ws(cursor.advance(1))?;
            Some(name)
        } else {
            None
        };

        let start = cursor.position();
        let (kind, end) = self.validator.value(cursor)?;
        let span = end.span_from(start);

        cursor = skip_ws(end)?;
        match cursor.peek() {
            Some(b) if b == self.close => self.done = true,
            Some(b',') => {
                let comma = cursor.position();
                cursor = skip_ws(cursor.advance(1))?;
                if cursor.peek() == Some(self.close) {
                    return Err(ScanError::new(
                        ScanErrorKind::TrailingComma,
                        cursor.span_through(comma),
                    ));
                }
            }
            _ => {
                return Err(ScanError::new(
                    ScanErrorKind::ExpectedCommaOrClose,
                    cursor.span_through(cursor.position()),
                ));
            }
        }
        self.cursor = cursor;

        Ok(Member { name, kind, span })
    }
}

impl Iterator for Layer<'_> {
    type Item = Result<Member, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let member = self.next_member();
        if member.is_err() {
            self.done = true;
        }
        Some(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(source: &str) -> Vec<(Option<&str>, ValueKind, &str)> {
        let kind = crate::dispatch(Cursor::new(source));
        Layer::new(source, 0, kind, 16)
            .unwrap()
            .map(|m| {
                let m = m.unwrap();
                (m.name.map(|n| n.slice(source)), m.kind, m.span.slice(source))
            })
            .collect()
    }

    #[test]
    fn test_object_layer() {
        let source = r#"{ "a" : 1 , "b":{"c":[1,2]}, "d\n": "x" }"#;
        assert_eq!(
            members(source),
            vec![
                (Some(r#""a""#), ValueKind::Number, "1"),
                (Some(r#""b""#), ValueKind::Object, r#"{"c":[1,2]}"#),
                (Some(r#""d\n""#), ValueKind::String, r#""x""#),
            ]
        );
    }

    #[test]
    fn test_array_layer() {
        let source = "[true, null ,false,[[]] ,-1.5e3]";
        assert_eq!(
            members(source),
            vec![
                (None, ValueKind::True, "true"),
                (None, ValueKind::Null, "null"),
                (None, ValueKind::False, "false"),
                (None, ValueKind::Array, "[[]]"),
                (None, ValueKind::Number, "-1.5e3"),
            ]
        );
    }

    #[test]
    fn test_empty_layer() {
        assert!(members("{ }").is_empty());
        assert!(members("[]").is_empty());
    }

    #[test]
    fn test_inner_container() {
        let source = r#"{"outer":[4,5]}"#;
        let kinds: Vec<_> = Layer::new(source, 9, ValueKind::Array, 16)
            .unwrap()
            .map(|m| m.unwrap().span.slice(source))
            .collect();
        assert_eq!(kinds, vec!["4", "5"]);
    }

    #[test]
    fn test_wrong_start() {
        assert!(Layer::new("[1]", 0, ValueKind::Object, 16).is_err());
        assert!(Layer::new("[1]", 0, ValueKind::Number, 16).is_err());
    }

    #[test]
    fn test_error_stops_iteration() {
        let mut layer = Layer::new("[1 2]", 0, ValueKind::Array, 16).unwrap();
        assert!(layer.next().unwrap().is_err());
        assert!(layer.next().is_none());
    }
}
