//! Scan failures.

use crate::Span;

/// What went wrong while scanning or validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    /// Input ended where more text was required.
    UnexpectedEof,
    /// A character that cannot start or continue anything here.
    UnexpectedChar,
    /// An object member did not start with a quoted name.
    ExpectedString,
    /// A member name was not followed by `:`.
    ExpectedColon,
    /// A value was not followed by `,` or the closing bracket.
    ExpectedCommaOrClose,
    /// A closing bracket directly after a comma.
    TrailingComma,
    /// A string without its closing quote.
    UnterminatedString,
    /// A backslash followed by something other than a known escape.
    InvalidEscape,
    /// `\u` not followed by exactly four hex digits.
    InvalidUnicodeEscape,
    /// Text that does not match the number grammar.
    InvalidNumber,
    /// `true`, `false` or `null` run into other text.
    InvalidLiteral,
    /// Containers nested deeper than the configured limit.
    NestingTooDeep,
}

impl ScanErrorKind {
    /// Short human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            ScanErrorKind::UnexpectedEof => "unexpected end of input",
            ScanErrorKind::UnexpectedChar => "unexpected character",
            ScanErrorKind::ExpectedString => "expected a quoted member name",
            ScanErrorKind::ExpectedColon => "expected ':' after member name",
            ScanErrorKind::ExpectedCommaOrClose => "expected ',' or a closing bracket",
            ScanErrorKind::TrailingComma => "trailing comma",
            ScanErrorKind::UnterminatedString => "unterminated string",
            ScanErrorKind::InvalidEscape => "invalid escape sequence",
            ScanErrorKind::InvalidUnicodeEscape => "invalid unicode escape",
            ScanErrorKind::InvalidNumber => "invalid number",
            ScanErrorKind::InvalidLiteral => "invalid literal",
            ScanErrorKind::NestingTooDeep => "nesting too deep",
        }
    }
}

impl std::fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A scan failure with the source range it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanError {
    /// The kind of error.
    pub kind: ScanErrorKind,
    /// Source location.
    pub span: Span,
}

impl ScanError {
    /// Create a new scan error.
    pub fn new(kind: ScanErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.span.start)
    }
}

impl std::error::Error for ScanError {}
