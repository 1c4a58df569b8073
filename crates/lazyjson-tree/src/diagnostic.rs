//! Parse errors and their diagnostic rendering.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use lazyjson_scan::{ScanError, ScanErrorKind, Span};

/// Why a document was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Zero-length input.
    Empty,
    /// A NUL byte inside the input.
    EmbeddedNul,
    /// The input is not UTF-8 text.
    InvalidUtf8,
    /// The input exceeds the configured or addressable length.
    InputTooLarge {
        /// Input length in bytes.
        len: usize,
        /// The limit that was exceeded.
        max: usize,
    },
    /// Nothing but whitespace.
    OnlyWhitespace,
    /// The document does not start with `{` or `[`.
    NotAContainer,
    /// Text after the top-level container.
    TrailingContent,
    /// The backing buffer could not be allocated.
    OutOfMemory,
    /// A grammar violation inside the document.
    Syntax(ScanErrorKind),
}

/// A rejected document, with the offending range of the input.
///
/// Spans are byte offsets into the input exactly as it was passed to
/// [`Document::parse`](crate::Document::parse), before trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Shift the span by `offset` bytes.
    pub(crate) fn shifted(self, offset: u32) -> Self {
        Self {
            kind: self.kind,
            span: Span::new(self.span.start + offset, self.span.end + offset),
        }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename, source);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
        source: &str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        // Offsets can land inside a character when `source` is a lossy decoding.
        let end = ceil_char_boundary(source, self.span.end as usize);
        let start = floor_char_boundary(source, (self.span.start as usize).min(end));
        let range = start..end;

        let builder = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(self.to_string());

        let (label, help) = match &self.kind {
            ParseErrorKind::Empty => ("input is empty", None),
            ParseErrorKind::EmbeddedNul => (
                "NUL byte here",
                Some("the input length must delimit the content exactly"),
            ),
            ParseErrorKind::InvalidUtf8 => ("not valid UTF-8", None),
            ParseErrorKind::InputTooLarge { .. } => (
                "input starts here",
                Some("raise the input length limit or split the document"),
            ),
            ParseErrorKind::OnlyWhitespace => ("only whitespace", None),
            ParseErrorKind::NotAContainer => (
                "expected '{' or '['",
                Some("a document must be an object or an array"),
            ),
            ParseErrorKind::TrailingContent => (
                "unexpected content here",
                Some("the top-level object or array is the entire document"),
            ),
            ParseErrorKind::OutOfMemory => ("while copying this input", None),
            ParseErrorKind::Syntax(kind) => (kind.message(), syntax_help(*kind)),
        };

        let builder = builder.with_label(
            Label::new((filename, range))
                .with_message(label)
                .with_color(Color::Red),
        );
        match help {
            Some(help) => builder.with_help(help),
            None => builder,
        }
    }
}

fn floor_char_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn syntax_help(kind: ScanErrorKind) -> Option<&'static str> {
    match kind {
        ScanErrorKind::TrailingComma => Some("remove the comma before the closing bracket"),
        ScanErrorKind::InvalidEscape => {
            Some(r#"valid escapes are: \\, \", \/, \b, \f, \n, \r, \t, \uXXXX"#)
        }
        ScanErrorKind::InvalidUnicodeEscape => Some(r"\u must be followed by exactly four hex digits"),
        ScanErrorKind::InvalidNumber => Some("numbers look like -12, 0.5 or 6.02e23"),
        ScanErrorKind::InvalidLiteral => Some("true, false and null must end at a delimiter"),
        ScanErrorKind::ExpectedString => Some("object member names must be quoted"),
        _ => None,
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ParseErrorKind::Empty => write!(f, "empty input"),
            ParseErrorKind::EmbeddedNul => write!(f, "embedded NUL byte"),
            ParseErrorKind::InvalidUtf8 => write!(f, "input is not valid UTF-8"),
            ParseErrorKind::InputTooLarge { len, max } => {
                write!(f, "input of {len} bytes exceeds the limit of {max}")
            }
            ParseErrorKind::OnlyWhitespace => write!(f, "input contains only whitespace"),
            ParseErrorKind::NotAContainer => write!(f, "document is not an object or array"),
            ParseErrorKind::TrailingContent => write!(f, "trailing content after document"),
            ParseErrorKind::OutOfMemory => write!(f, "out of memory"),
            ParseErrorKind::Syntax(kind) => write!(f, "{kind}"),
        }?;
        write!(f, " at offset {}", self.span.start)
    }
}

impl std::error::Error for ParseError {}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> Self {
        ParseError::new(ParseErrorKind::Syntax(err.kind), err.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn render_stripped(source: &str) -> String {
        let err = Document::parse(source).unwrap_err();
        let rendered = err.render("test.json", source);
        String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap()
    }

    #[test]
    fn test_display_includes_offset() {
        let err = ParseError::new(
            ParseErrorKind::Syntax(ScanErrorKind::TrailingComma),
            Span::new(7, 9),
        );
        assert_eq!(err.to_string(), "trailing comma at offset 7");
    }

    #[test]
    fn test_trailing_comma_diagnostic() {
        let rendered = render_stripped("{\"a\": 1,\n}");
        assert!(rendered.contains("trailing comma"), "{rendered}");
        assert!(rendered.contains("test.json"), "{rendered}");
        assert!(rendered.contains("remove the comma"), "{rendered}");
    }

    #[test]
    fn test_invalid_escape_diagnostic() {
        let rendered = render_stripped(r#"{"name": "hello\qworld"}"#);
        assert!(rendered.contains("invalid escape sequence"), "{rendered}");
        assert!(rendered.contains("valid escapes are"), "{rendered}");
    }

    #[test]
    fn test_not_a_container_diagnostic() {
        let rendered = render_stripped("  null");
        assert!(rendered.contains("not an object or array"), "{rendered}");
        assert!(rendered.contains("expected '{' or '['"), "{rendered}");
    }

    #[test]
    fn test_invalid_utf8_against_lossy_source() {
        let input = b"[\"ab\xff\xfe\"]";
        let err = Document::parse(input).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
        assert_eq!(err.span, Span::new(4, 5));

        let lossy = String::from_utf8_lossy(input);
        let rendered = err.render("x.json", &lossy);
        let stripped = String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap();
        assert!(stripped.contains("not valid UTF-8"), "{stripped}");
    }

    #[test]
    fn test_span_past_end_of_source() {
        let err = ParseError::new(ParseErrorKind::TrailingContent, Span::new(40, 50));
        let rendered = err.render("short.json", "[1] x");
        let stripped = String::from_utf8(strip_ansi_escapes::strip(rendered.as_bytes())).unwrap();
        assert!(stripped.contains("trailing content"), "{stripped}");
    }

    #[test]
    fn test_unexpected_eof_at_end_of_source() {
        let rendered = render_stripped("[1, 2");
        assert!(rendered.contains("unexpected end of input"), "{rendered}");
    }
}
