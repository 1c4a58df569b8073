//! Decoding of JSON string escapes.

use std::borrow::Cow;

/// Decode the escapes in the interior of a JSON string (the text between
/// the quotes).
///
/// Returns the input unchanged if it contains no backslash. Surrogate pairs
/// combine into one character; an unpaired surrogate becomes U+FFFD. An
/// escape that is not recognized drops both the backslash and the character
/// after it.
pub fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let rest = chars.as_str();
                if let Some(unit) = hex4(rest) {
                    chars = rest[4..].chars();
                    out.push(decode_unit(unit, &mut chars));
                }
            }
            Some(_) | None => {}
        }
    }
    Cow::Owned(out)
}

fn decode_unit(unit: u32, chars: &mut std::str::Chars<'_>) -> char {
    match unit {
        0xD800..=0xDBFF => {
            let rest = chars.as_str();
            let low = rest
                .strip_prefix("\\u")
                .and_then(hex4)
                .filter(|low| (0xDC00..=0xDFFF).contains(low));
            match low {
                Some(low) => {
                    *chars = rest[6..].chars();
                    let scalar = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER)
                }
                None => char::REPLACEMENT_CHARACTER,
            }
        }
        _ => char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}

fn hex4(s: &str) -> Option<u32> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
