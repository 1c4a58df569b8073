//! A position in the backing buffer, passed and returned by value.

use crate::Span;

/// A read position in the source text.
///
/// Scanners take a cursor and hand back a new one positioned just past the
/// unit they recognized, so a failed scan never disturbs the caller's cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'src> {
    source: &'src str,
    pos: u32,
}

impl<'src> Cursor<'src> {
    /// Create a cursor at the start of `source`.
    ///
    /// The source must be shorter than `u32::MAX` bytes; callers check this
    /// before scanning.
    #[inline]
    pub fn new(source: &'src str) -> Self {
        Self::at(source, 0)
    }

    /// Create a cursor at a byte offset in `source`.
    #[inline]
    pub fn at(source: &'src str, pos: u32) -> Self {
        debug_assert!(pos as usize <= source.len());
        Self { source, pos }
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos as usize >= self.source.len()
    }

    /// Peek at the current byte.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.peek_nth(0)
    }

    /// Peek at the byte `n` positions ahead.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos as usize + n).copied()
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.source.as_bytes()[self.pos as usize..].starts_with(prefix.as_bytes())
    }

    /// Move forward by `n` bytes.
    #[inline]
    pub fn advance(self, n: u32) -> Self {
        Self::at(self.source, self.pos + n)
    }

    /// Skip JSON whitespace (space, tab, CR, LF).
    pub fn skip_whitespace(self) -> Self {
        let mut cursor = self;
        while let Some(b) = cursor.peek() {
            if !crate::is_whitespace(b) {
                break;
            }
            cursor = cursor.advance(1);
        }
        cursor
    }

    /// Span from `start` up to the current position.
    #[inline]
    pub fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.pos)
    }

    /// Span from `start` through the character under the cursor, so error
    /// labels include the offending character.
    pub fn span_through(&self, start: u32) -> Span {
        let width = self.source[self.pos as usize..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        Span::new(start, self.pos + width as u32)
    }

    /// Text from `start` up to the current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.pos as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_by_value() {
        let start = Cursor::new("[1, 2]");
        let moved = start.advance(2);
        assert_eq!(start.position(), 0);
        assert_eq!(moved.position(), 2);
        assert_eq!(moved.peek(), Some(b' '));
    }

    #[test]
    fn test_skip_whitespace() {
        let cursor = Cursor::new(" \t\r\n x").skip_whitespace();
        assert_eq!(cursor.peek(), Some(b'x'));
        assert!(Cursor::new("   ").skip_whitespace().is_eof());
    }

    #[test]
    fn test_span_through_multibyte() {
        let cursor = Cursor::at("ab\u{e9}", 2);
        assert_eq!(cursor.span_through(0), Span::new(0, 4));
        assert_eq!(Cursor::at("ab", 2).span_through(1), Span::new(1, 2));
    }
}
