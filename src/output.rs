//! Query result text.
//!
//! Results are assembled from raw slices of the source document, so numbers
//! keep their original spelling and objects keep their original key order
//! and whitespace.
//!
//! # Shapes
//!
//! - **Definite path** - the single matched value, decoded: strings lose
//!   their quotes and escapes, `null` becomes the empty string, containers
//!   are returned as written
//! - **Indefinite path** - a JSON array of every match, in discovery order
//! - **Aggregate function** - a number printed with six decimals, then
//!   trimmed of trailing zeros
//!
//! # Examples
//!
//! ```
//! use pathwise::output::format_number;
//!
//! assert_eq!(format_number(1.5).unwrap(), "1.5");
//! assert_eq!(format_number(3.0).unwrap(), "3");
//! ```

use crate::{
    cursor::Cursor,
    error::{Error, Result},
    value::format_double,
};

/// Formats the matches of a path with no trailing function.
///
/// Zero matches is `Ok(None)`.
pub fn format_matches(matches: &[Cursor<'_>], definite: bool) -> Result<Option<String>> {
    let Some(first) = matches.first() else {
        return Ok(None);
    };

    if definite {
        return extract_element(first).map(Some);
    }

    let capacity = matches.iter().map(|m| m.as_str().len() + 1).sum::<usize>() + 2;
    let mut output = String::with_capacity(capacity);

    output.push('[');
    for (i, item) in matches.iter().enumerate() {
        if i != 0 {
            output.push(',');
        }
        output.push_str(item.as_str());
    }
    output.push(']');

    Ok(Some(output))
}

/// Decoded text of one value.
pub fn extract_element(cursor: &Cursor<'_>) -> Result<String> {
    Ok(cursor.decode_scalar()?.into_owned())
}

/// Aggregate result text. Non-finite values are rejected.
pub fn format_number(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::FunctionInput(format!(
            "invalid function result: {}",
            value
        )));
    }
    Ok(format_double(value))
}

/// Re-indents JSON text with two spaces. Text that is not JSON (a decoded
/// string, say) is returned unchanged.
pub fn to_json_pretty(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) if value.is_object() || value.is_array() => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string())
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_of(doc: &str) -> Vec<Cursor<'_>> {
        Cursor::parse(doc)
            .unwrap()
            .elements()
            .map(|e| e.unwrap())
            .collect()
    }

    #[test]
    fn test_no_matches_is_none() {
        assert_eq!(format_matches(&[], true).unwrap(), None);
        assert_eq!(format_matches(&[], false).unwrap(), None);
    }

    #[test]
    fn test_definite_decodes_first() {
        let doc = r#"["a\tb", 2]"#;
        let matches = matches_of(doc);
        assert_eq!(format_matches(&matches, true).unwrap().as_deref(), Some("a\tb"));
    }

    #[test]
    fn test_indefinite_keeps_raw_text() {
        let doc = r#"[ "x", 1.50, {"k" : null} ]"#;
        let matches = matches_of(doc);
        assert_eq!(
            format_matches(&matches, false).unwrap().as_deref(),
            Some(r#"["x",1.50,{"k" : null}]"#)
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0).unwrap(), "2");
        assert_eq!(format_number(-0.25).unwrap(), "-0.25");
        assert_eq!(format_number(1.0 / 3.0).unwrap(), "0.333333");
        assert!(format_number(f64::INFINITY).is_err());
        assert!(format_number(f64::NAN).is_err());
    }

    #[test]
    fn test_pretty_passthrough_for_scalars() {
        assert_eq!(to_json_pretty("hello"), "hello");
        assert_eq!(to_json_pretty("[1,2]"), "[\n  1,\n  2\n]");
    }
}
