//! Scanners and a validating recursive-descent checker for JSON text.
//!
//! Everything here works on a borrowed buffer through a [`Cursor`] and builds
//! nothing: the [`Validator`] proves a whole document valid once, and
//! [`Layer`] later re-walks a single container of that document one level
//! deep.

mod cursor;
pub use cursor::Cursor;

mod error;
pub use error::{ScanError, ScanErrorKind};

mod layer;
pub use layer::{Layer, Member};

mod scanner;
pub use scanner::{ValueKind, dispatch, is_whitespace, scan_literal, scan_number, scan_string};

mod span;
pub use span::Span;

mod validator;
pub use validator::{DEFAULT_MAX_DEPTH, Validator};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn scalar() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("true".to_string()),
            Just("false".to_string()),
            Just("null".to_string()),
            (-1_000_000i64..1_000_000).prop_map(|n| n.to_string()),
            (-1000.0f64..1000.0).prop_map(|f| format!("{f:e}")),
            prop::string::string_regex(r#"[a-zA-Z0-9 _-]{0,12}"#)
                .unwrap()
                .prop_map(|s| format!("\"{s}\"")),
            Just(r#""esc\"\\\/\b\f\n\r\té""#.to_string()),
        ]
    }

    fn value() -> impl Strategy<Value = String> {
        scalar().prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6)
                    .prop_map(|items| format!("[{}]", items.join(" , "))),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|members| {
                    let body: Vec<String> = members
                        .into_iter()
                        .map(|(k, v)| format!("\"{k}\":\t{v}"))
                        .collect();
                    format!("{{ {} }}", body.join(","))
                }),
            ]
        })
    }

    fn container() -> impl Strategy<Value = String> {
        (value(), value()).prop_map(|(a, b)| format!("[{a},{b}]"))
    }

    proptest! {
        /// Generated documents are accepted in full.
        #[test]
        fn validator_accepts_generated(source in container()) {
            let mut validator = Validator::default();
            let end = validator.validate(Cursor::new(&source), ValueKind::Array);
            prop_assert_eq!(end.map(|c| c.position()), Ok(source.len() as u32));
        }

        /// Walking a layer agrees with the validator on every member.
        #[test]
        fn layer_members_revalidate(source in container()) {
            let layer = Layer::new(&source, 0, ValueKind::Array, DEFAULT_MAX_DEPTH).unwrap();
            for member in layer {
                let member = member.unwrap();
                let cursor = Cursor::at(&source, member.span.start);
                prop_assert_eq!(dispatch(cursor), member.kind);
                let (kind, end) = Validator::default().value(cursor).unwrap();
                prop_assert_eq!(kind, member.kind);
                prop_assert_eq!(end.position(), member.span.end);
            }
        }

        /// Cutting a valid document short never validates.
        #[test]
        fn truncation_is_rejected(source in container(), cut in 1usize..8) {
            let cut = source.len().saturating_sub(cut);
            if source.is_char_boundary(cut) {
                let truncated = &source[..cut];
                let mut validator = Validator::default();
                let end = validator.validate(Cursor::new(truncated), ValueKind::Array);
                prop_assert!(end.is_err());
            }
        }
    }
}
