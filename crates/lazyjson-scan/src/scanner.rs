//! Leaf scanners: one lexical unit starting at a cursor.
//!
//! Each scanner returns the cursor just past the unit it recognized. Every
//! value in a valid document is followed by at least one more character (a
//! delimiter or the enclosing bracket), so the scanners report
//! [`ScanErrorKind::UnexpectedEof`] when a unit runs into the end of input.

use tracing::trace;

use crate::{Cursor, ScanError, ScanErrorKind};

/// The kind of a JSON value, as decided by its first characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// A decimal number.
    Number,
    /// A quoted string.
    String,
}

impl ValueKind {
    /// Whether values of this kind can have children.
    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Object | ValueKind::Array)
    }

    /// The literal text for `true`, `false` and `null`.
    pub fn literal(&self) -> Option<&'static str> {
        match self {
            ValueKind::True => Some("true"),
            ValueKind::False => Some("false"),
            ValueKind::Null => Some("null"),
            _ => None,
        }
    }
}

/// JSON whitespace: space, tab, CR, LF.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Bytes that may directly follow a complete value.
#[inline]
fn is_delimiter(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b',' | b'}' | b']')
}

/// Decide the kind of the value starting at `cursor`.
///
/// Anything that is not a container, literal or string is assumed to be a
/// number; the number scanner rejects it if it is not.
pub fn dispatch(cursor: Cursor<'_>) -> ValueKind {
    match cursor.peek() {
        Some(b'{') => ValueKind::Object,
        Some(b'[') => ValueKind::Array,
        Some(b'"') => ValueKind::String,
        _ if cursor.starts_with("true") => ValueKind::True,
        _ if cursor.starts_with("null") => ValueKind::Null,
        _ if cursor.starts_with("false") => ValueKind::False,
        _ => ValueKind::Number,
    }
}

/// Scan a quoted string, escapes included.
pub fn scan_string(cursor: Cursor<'_>) -> Result<Cursor<'_>, ScanError> {
    let start = cursor.position();
    if cursor.peek() != Some(b'"') {
        return Err(ScanError::new(
            ScanErrorKind::ExpectedString,
            cursor.span_through(start),
        ));
    }

    let mut cursor = cursor.advance(1);
    loop {
        match cursor.peek() {
            None => {
                return Err(ScanError::new(
                    ScanErrorKind::UnterminatedString,
                    cursor.span_from(start),
                ));
            }
            Some(b'"') => break,
            Some(b'\\') => cursor = scan_escape(cursor, start)?,
            // Multi-byte characters never contain '"' or '\\' bytes.
            Some(_) => cursor = cursor.advance(1),
        }
    }

    // Closing quote
    let cursor = cursor.advance(1);
    if cursor.is_eof() {
        return Err(ScanError::new(
            ScanErrorKind::UnexpectedEof,
            cursor.span_from(cursor.position()),
        ));
    }

    trace!("String at {}..{}", start, cursor.position());
    Ok(cursor)
}

/// Step over one escape sequence; `cursor` is on the backslash.
fn scan_escape(cursor: Cursor<'_>, string_start: u32) -> Result<Cursor<'_>, ScanError> {
    match cursor.peek_nth(1) {
        None => Err(ScanError::new(
            ScanErrorKind::UnterminatedString,
            cursor.advance(1).span_from(string_start),
        )),
        Some(b'\\' | b'"' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => Ok(cursor.advance(2)),
        Some(b'u') => {
            for n in 2..6 {
                match cursor.peek_nth(n) {
                    Some(b) if b.is_ascii_hexdigit() => {}
                    _ => {
                        let bad = cursor.advance(n as u32);
                        return Err(ScanError::new(
                            ScanErrorKind::InvalidUnicodeEscape,
                            bad.span_through(cursor.position()),
                        ));
                    }
                }
            }
            Ok(cursor.advance(6))
        }
        Some(_) => Err(ScanError::new(
            ScanErrorKind::InvalidEscape,
            cursor.advance(1).span_through(cursor.position()),
        )),
    }
}

/// Scan a number: `-?(0|[1-9][0-9]*)(.[0-9]+)?([eE][+-]?[0-9]+)?`.
///
/// The number ends at the first character that cannot continue it; the
/// enclosing container decides whether that character is an acceptable
/// delimiter.
pub fn scan_number(cursor: Cursor<'_>) -> Result<Cursor<'_>, ScanError> {
    let start = cursor.position();
    let mut cursor = cursor;

    if cursor.peek() == Some(b'-') {
        cursor = cursor.advance(1);
    }

    match cursor.peek() {
        Some(b'0') => {
            cursor = cursor.advance(1);
            if matches!(cursor.peek(), Some(b'0'..=b'9')) {
                // Leading zeros are not allowed
                return Err(invalid_number(cursor, start));
            }
        }
        Some(b'1'..=b'9') => cursor = eat_digits(cursor),
        _ => return Err(invalid_number(cursor, start)),
    }

    if cursor.peek() == Some(b'.') {
        cursor = cursor.advance(1);
        if !matches!(cursor.peek(), Some(b'0'..=b'9')) {
            return Err(invalid_number(cursor, start));
        }
        cursor = eat_digits(cursor);
    }

    if matches!(cursor.peek(), Some(b'e' | b'E')) {
        cursor = cursor.advance(1);
        if matches!(cursor.peek(), Some(b'+' | b'-')) {
            cursor = cursor.advance(1);
        }
        if !matches!(cursor.peek(), Some(b'0'..=b'9')) {
            return Err(invalid_number(cursor, start));
        }
        cursor = eat_digits(cursor);
    }

    if cursor.is_eof() {
        return Err(ScanError::new(
            ScanErrorKind::UnexpectedEof,
            cursor.span_from(cursor.position()),
        ));
    }

    trace!("Number {:?} at {}", cursor.slice_from(start), start);
    Ok(cursor)
}

fn eat_digits(mut cursor: Cursor<'_>) -> Cursor<'_> {
    while matches!(cursor.peek(), Some(b'0'..=b'9')) {
        cursor = cursor.advance(1);
    }
    cursor
}

fn invalid_number(cursor: Cursor<'_>, start: u32) -> ScanError {
    if cursor.is_eof() {
        ScanError::new(ScanErrorKind::UnexpectedEof, cursor.span_from(cursor.position()))
    } else {
        ScanError::new(ScanErrorKind::InvalidNumber, cursor.span_through(start))
    }
}

/// Scan `true`, `false` or `null`; the literal must end at a delimiter.
pub fn scan_literal(cursor: Cursor<'_>, kind: ValueKind) -> Result<Cursor<'_>, ScanError> {
    let start = cursor.position();
    let Some(literal) = kind.literal().filter(|lit| cursor.starts_with(lit)) else {
        return Err(ScanError::new(
            ScanErrorKind::InvalidLiteral,
            cursor.span_through(start),
        ));
    };

    let end = cursor.advance(literal.len() as u32);
    match end.peek() {
        None => Err(ScanError::new(
            ScanErrorKind::UnexpectedEof,
            end.span_from(end.position()),
        )),
        Some(b) if is_delimiter(b) => Ok(end),
        Some(_) => Err(ScanError::new(
            ScanErrorKind::InvalidLiteral,
            end.span_through(start),
        )),
    }
}
