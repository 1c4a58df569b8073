//! Recursive-descent grammar checker.
//!
//! ```text
//! object := '{' ws (member (',' ws member)*)? ws '}'
//! member := string ws ':' ws value
//! array  := '[' ws (value (',' ws value)*)? ws ']'
//! ```
//!
//! The checker only proves validity; it builds nothing. Recursion depth is
//! bounded by [`Validator::max_depth`].

use tracing::trace;

use crate::scanner::{dispatch, scan_literal, scan_number, scan_string};
use crate::{Cursor, ScanError, ScanErrorKind, ValueKind};

/// Default maximum container nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Validating checker for JSON containers.
#[derive(Debug, Clone)]
pub struct Validator {
    max_depth: usize,
    values: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Validator {
    /// Create a validator that rejects nesting deeper than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            values: 0,
        }
    }

    /// Number of values proven valid so far, containers included.
    pub fn values(&self) -> usize {
        self.values
    }

    /// Validate a container of the given kind starting at `cursor`.
    ///
    /// Returns the cursor just past the closing bracket.
    pub fn validate<'src>(
        &mut self,
        cursor: Cursor<'src>,
        kind: ValueKind,
    ) -> Result<Cursor<'src>, ScanError> {
        self.values += 1;
        self.container(cursor, kind, 1)
    }

    /// Validate the value starting at `cursor`, whatever its kind.
    ///
    /// Returns the value's kind and the cursor just past it.
    pub fn value<'src>(
        &mut self,
        cursor: Cursor<'src>,
    ) -> Result<(ValueKind, Cursor<'src>), ScanError> {
        self.value_at(cursor, 0)
    }

    fn value_at<'src>(
        &mut self,
        cursor: Cursor<'src>,
        depth: usize,
    ) -> Result<(ValueKind, Cursor<'src>), ScanError> {
        self.values += 1;
        let kind = dispatch(cursor);
        let end = match kind {
            ValueKind::Object | ValueKind::Array => self.container(cursor, kind, depth + 1)?,
            ValueKind::True | ValueKind::False | ValueKind::Null => scan_literal(cursor, kind)?,
            ValueKind::String => scan_string(cursor)?,
            ValueKind::Number => scan_number(cursor)?,
        };
        Ok((kind, end))
    }

    fn container<'src>(
        &mut self,
        cursor: Cursor<'src>,
        kind: ValueKind,
        depth: usize,
    ) -> Result<Cursor<'src>, ScanError> {
        let start = cursor.position();
        let (open, close) = match kind {
            ValueKind::Object => (b'{', b'}'),
            ValueKind::Array => (b'[', b']'),
            _ => {
                return Err(ScanError::new(
                    ScanErrorKind::UnexpectedChar,
                    cursor.span_through(start),
                ));
            }
        };

        if cursor.peek() != Some(open) {
            return Err(unexpected(cursor));
        }
        if depth > self.max_depth {
            return Err(ScanError::new(
                ScanErrorKind::NestingTooDeep,
                cursor.span_through(start),
            ));
        }
        trace!("Enter {:?} at {} (depth {})", kind, start, depth);

        let mut cursor = skip_ws(cursor.advance(1))?;
        if cursor.peek() == Some(close) {
            return Ok(cursor.advance(1));
        }

        loop {
            if kind == ValueKind::Object {
                if cursor.peek() != Some(b'"') {
                    return Err(ScanError::new(
                        ScanErrorKind::ExpectedString,
                        cursor.span_through(cursor.position()),
                    ));
                }
                cursor = skip_ws(scan_string(cursor)?)?;
                if cursor.peek() != Some(b':') {
                    return Err(ScanError::new(
                        ScanErrorKind::ExpectedColon,
                        cursor.span_through(cursor.position()),
                    ));
                }
                cursor = skip_ws(cursor.advance(1))?;
            }

            let (_, end) = self.value_at(cursor, depth)?;
            cursor = skip_ws(end)?;

            match cursor.peek() {
                Some(b) if b == close => {
                    trace!("Leave {:?} at {}", kind, cursor.position());
                    return Ok(cursor.advance(1));
                }
                Some(b',') => {
                    let comma = cursor.position();
                    cursor = skip_ws(cursor.advance(1))?;
                    if cursor.peek() == Some(close) {
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
        }
    }
}

/// Skip whitespace; running out of input is an error inside a container.
pub(crate) fn skip_ws(cursor: Cursor<'_>) -> Result<Cursor<'_>, ScanError> {
    let cursor = cursor.skip_whitespace();
    if cursor.is_eof() {
        return Err(ScanError::new(
            ScanErrorKind::UnexpectedEof,
            cursor.span_from(cursor.position()),
        ));
    }
    Ok(cursor)
}

fn unexpected(cursor: Cursor<'_>) -> ScanError {
    if cursor.is_eof() {
        ScanError::new(ScanErrorKind::UnexpectedEof, cursor.span_from(cursor.position()))
    } else {
        ScanError::new(
            ScanErrorKind::UnexpectedChar,
            cursor.span_through(cursor.position()),
        )
    }
}
