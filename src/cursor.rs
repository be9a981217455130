//! Zero-copy cursor over JSON text.
//!
//! A [`Cursor`] is a validated byte range of the original document. Nothing
//! is materialized: containers are walked by rescanning their children, and
//! scalars are decoded only on request.

use std::borrow::Cow;

use crate::ast::RefStep;
use crate::error::{Error, Result};

/// Containers nested deeper than this are rejected.
pub const MAX_NESTING: usize = 512;

/// Kind of the value a cursor points at, taken from its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    doc: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    /// Validates `doc` as a single JSON value, optionally surrounded by
    /// whitespace.
    pub fn parse(doc: &'a str) -> Result<Self> {
        let bytes = doc.as_bytes();
        let start = skip_ws(bytes, 0);
        if start == bytes.len() {
            return Err(Error::json(start, "cannot parse as a valid JSON object: empty input"));
        }

        let end = scan_value(bytes, start, 0)?;
        let trailing = skip_ws(bytes, end);
        if trailing != bytes.len() {
            return Err(Error::json(trailing, "unexpected data after JSON value"));
        }

        Ok(Cursor { doc, start, end })
    }

    /// Value starting at byte `start` of `doc`.
    fn at(doc: &'a str, start: usize, depth: usize) -> Result<Self> {
        let end = scan_value(doc.as_bytes(), start, depth)?;
        Ok(Cursor { doc, start, end })
    }

    /// Raw text of the value.
    pub fn as_str(&self) -> &'a str {
        &self.doc[self.start..self.end]
    }

    /// Byte offset of the value in the document.
    pub fn offset(&self) -> usize {
        self.start
    }

    pub fn kind(&self) -> JsonKind {
        match self.doc.as_bytes()[self.start] {
            b'{' => JsonKind::Object,
            b'[' => JsonKind::Array,
            b'"' => JsonKind::String,
            b't' | b'f' => JsonKind::Bool,
            b'n' => JsonKind::Null,
            _ => JsonKind::Number,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind(), JsonKind::Object | JsonKind::Array)
    }

    pub fn is_array(&self) -> bool {
        self.kind() == JsonKind::Array
    }

    /// Elements of an array. Empty for anything else.
    pub fn elements(&self) -> Elements<'a> {
        let inner = if self.is_array() {
            self.start + 1
        } else {
            self.end
        };
        Elements {
            doc: self.doc,
            pos: inner,
            end: self.end,
            first: true,
        }
    }

    /// Key/value pairs of an object. Empty for anything else.
    pub fn members(&self) -> Members<'a> {
        let inner = if self.kind() == JsonKind::Object {
            self.start + 1
        } else {
            self.end
        };
        Members {
            doc: self.doc,
            pos: inner,
            end: self.end,
            first: true,
        }
    }

    /// Scalar text: strings unescaped, `null` as the empty string, numbers
    /// and booleans as written. Containers yield their raw text.
    pub fn decode_scalar(&self) -> Result<Cow<'a, str>> {
        match self.kind() {
            JsonKind::String => unescape(self.as_str(), self.start),
            JsonKind::Null => Ok(Cow::Borrowed("")),
            _ => Ok(Cow::Borrowed(self.as_str())),
        }
    }

    /// Child reached by one step, if present.
    pub fn child(&self, step: &RefStep) -> Result<Option<Cursor<'a>>> {
        match step {
            RefStep::Name(name) => {
                for member in self.members() {
                    let (key, value) = member?;
                    if key.decode_scalar()? == name.as_str() {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
            RefStep::Index(index) => self.elements().nth(*index).transpose(),
        }
    }

    /// Follows every step in turn.
    pub fn resolve(&self, steps: &[RefStep]) -> Result<Option<Cursor<'a>>> {
        let mut current = *self;
        for step in steps {
            match current.child(step)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

/// Iterator over array elements.
pub struct Elements<'a> {
    doc: &'a str,
    pos: usize,
    end: usize,
    first: bool,
}

impl<'a> Iterator for Elements<'a> {
    type Item = Result<Cursor<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.doc.as_bytes();
        if self.pos >= self.end {
            return None;
        }

        let mut pos = skip_ws(bytes, self.pos);
        if !self.first {
            match bytes.get(pos) {
                Some(b',') => pos = skip_ws(bytes, pos + 1),
                Some(b']') => {
                    self.pos = self.end;
                    return None;
                }
                _ => {
                    self.pos = self.end;
                    return Some(Err(Error::json(pos, "expected ',' or ']' in array")));
                }
            }
        } else if bytes.get(pos) == Some(&b']') {
            self.pos = self.end;
            return None;
        }
        self.first = false;

        match Cursor::at(self.doc, pos, 0) {
            Ok(cursor) => {
                self.pos = cursor.end;
                Some(Ok(cursor))
            }
            Err(err) => {
                self.pos = self.end;
                Some(Err(err))
            }
        }
    }
}

/// Iterator over object members as (key, value) cursors.
pub struct Members<'a> {
    doc: &'a str,
    pos: usize,
    end: usize,
    first: bool,
}

impl<'a> Members<'a> {
    fn next_pair(&mut self) -> Result<Option<(Cursor<'a>, Cursor<'a>)>> {
        let bytes = self.doc.as_bytes();
        let mut pos = skip_ws(bytes, self.pos);

        if !self.first {
            match bytes.get(pos) {
                Some(b',') => pos = skip_ws(bytes, pos + 1),
                Some(b'}') => return Ok(None),
                _ => return Err(Error::json(pos, "expected ',' or '}' in object")),
            }
        } else if bytes.get(pos) == Some(&b'}') {
            return Ok(None);
        }
        self.first = false;

        if bytes.get(pos) != Some(&b'"') {
            return Err(Error::json(pos, "expected string key in object"));
        }
        let key = Cursor::at(self.doc, pos, 0)?;

        pos = skip_ws(bytes, key.end);
        if bytes.get(pos) != Some(&b':') {
            return Err(Error::json(pos, "expected ':' after object key"));
        }
        pos = skip_ws(bytes, pos + 1);

        let value = Cursor::at(self.doc, pos, 0)?;
        self.pos = value.end;

        Ok(Some((key, value)))
    }
}

impl<'a> Iterator for Members<'a> {
    type Item = Result<(Cursor<'a>, Cursor<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        match self.next_pair() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => {
                self.pos = self.end;
                None
            }
            Err(err) => {
                self.pos = self.end;
                Some(Err(err))
            }
        }
    }
}

fn skip_ws(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b' ' | b'\t' | b'\r' | b'\n')) {
        pos += 1;
    }
    pos
}

/// Validates the value at `pos` and returns the offset one past it.
fn scan_value(bytes: &[u8], pos: usize, depth: usize) -> Result<usize> {
    match bytes.get(pos) {
        Some(b'{') => scan_object(bytes, pos, depth + 1),
        Some(b'[') => scan_array(bytes, pos, depth + 1),
        Some(b'"') => scan_string(bytes, pos),
        Some(b'-' | b'0'..=b'9') => scan_number(bytes, pos),
        Some(b't') => scan_literal(bytes, pos, b"true"),
        Some(b'f') => scan_literal(bytes, pos, b"false"),
        Some(b'n') => scan_literal(bytes, pos, b"null"),
        Some(_) => Err(Error::json(pos, "invalid JSON value")),
        None => Err(Error::json(pos, "unexpected end of JSON data")),
    }
}

fn scan_object(bytes: &[u8], pos: usize, depth: usize) -> Result<usize> {
    if depth > MAX_NESTING {
        return Err(Error::json(pos, "JSON nesting too deep"));
    }

    let mut i = skip_ws(bytes, pos + 1);
    if bytes.get(i) == Some(&b'}') {
        return Ok(i + 1);
    }

    loop {
        if bytes.get(i) != Some(&b'"') {
            return Err(Error::json(i, "expected string key in object"));
        }
        i = skip_ws(bytes, scan_string(bytes, i)?);

        if bytes.get(i) != Some(&b':') {
            return Err(Error::json(i, "expected ':' after object key"));
        }
        i = skip_ws(bytes, i + 1);
        i = skip_ws(bytes, scan_value(bytes, i, depth)?);

        match bytes.get(i) {
            Some(b',') => i = skip_ws(bytes, i + 1),
            Some(b'}') => return Ok(i + 1),
            Some(_) => return Err(Error::json(i, "expected ',' or '}' in object")),
            None => return Err(Error::json(i, "unexpected end of object")),
        }
    }
}

fn scan_array(bytes: &[u8], pos: usize, depth: usize) -> Result<usize> {
    if depth > MAX_NESTING {
        return Err(Error::json(pos, "JSON nesting too deep"));
    }

    let mut i = skip_ws(bytes, pos + 1);
    if bytes.get(i) == Some(&b']') {
        return Ok(i + 1);
    }

    loop {
        i = skip_ws(bytes, scan_value(bytes, i, depth)?);

        match bytes.get(i) {
            Some(b',') => i = skip_ws(bytes, i + 1),
            Some(b']') => return Ok(i + 1),
            Some(_) => return Err(Error::json(i, "expected ',' or ']' in array")),
            None => return Err(Error::json(i, "unexpected end of array")),
        }
    }
}

fn scan_string(bytes: &[u8], pos: usize) -> Result<usize> {
    let mut i = pos + 1;

    loop {
        match bytes.get(i) {
            Some(b'"') => return Ok(i + 1),
            Some(b'\\') => {
                match bytes.get(i + 1) {
                    Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => i += 2,
                    Some(b'u') => {
                        let hex = bytes.get(i + 2..i + 6);
                        if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                            return Err(Error::json(i, "invalid unicode escape"));
                        }
                        i += 6;
                    }
                    _ => return Err(Error::json(i, "invalid escape sequence")),
                }
            }
            Some(&b) if b < 0x20 => return Err(Error::json(i, "control character in string")),
            Some(_) => i += 1,
            None => return Err(Error::json(pos, "unterminated string")),
        }
    }
}

fn scan_number(bytes: &[u8], pos: usize) -> Result<usize> {
    let digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);
    let mut i = pos;

    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }

    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while digit(i) {
                i += 1;
            }
        }
        _ => return Err(Error::json(pos, "invalid number")),
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        if !digit(i) {
            return Err(Error::json(pos, "invalid number"));
        }
        while digit(i) {
            i += 1;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if !digit(i) {
            return Err(Error::json(pos, "invalid number"));
        }
        while digit(i) {
            i += 1;
        }
    }

    Ok(i)
}

fn scan_literal(bytes: &[u8], pos: usize, literal: &[u8]) -> Result<usize> {
    if bytes.get(pos..pos + literal.len()) == Some(literal) {
        Ok(pos + literal.len())
    } else {
        Err(Error::json(pos, "invalid JSON literal"))
    }
}

/// Quoted JSON string to its text. Borrows when there is nothing to unescape.
fn unescape(raw: &str, offset: usize) -> Result<Cow<'_, str>> {
    let inner = &raw[1..raw.len() - 1];
    if !inner.contains('\\') {
        return Ok(Cow::Borrowed(inner));
    }

    serde_json::from_str::<String>(raw)
        .map(Cow::Owned)
        .map_err(|err| Error::json(offset, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_trailing_data() {
        assert!(Cursor::parse(r#"{"a":1} x"#).is_err());
        assert!(Cursor::parse("  [1, 2]  ").is_ok());
    }

    #[test]
    fn test_parse_reports_position() {
        let err = Cursor::parse(r#"{"a":[1,2}"#).unwrap_err();
        assert_eq!(err.position(), Some(9));
    }

    #[test]
    fn test_elements_are_raw_slices() {
        let root = Cursor::parse(r#"[1, "two", {"x": [3]}, null]"#).unwrap();
        let items: Vec<&str> = root.elements().map(|e| e.unwrap().as_str()).collect();
        assert_eq!(items, vec!["1", "\"two\"", "{\"x\": [3]}", "null"]);
    }

    #[test]
    fn test_members_in_document_order() {
        let root = Cursor::parse(r#"{"b": 1, "a": {"c": true}}"#).unwrap();
        let pairs: Vec<(String, &str)> = root
            .members()
            .map(|m| {
                let (k, v) = m.unwrap();
                (k.decode_scalar().unwrap().into_owned(), v.as_str())
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("b".to_string(), "1"),
                ("a".to_string(), "{\"c\": true}")
            ]
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(Cursor::parse("[]").unwrap().elements().count(), 0);
        assert_eq!(Cursor::parse("{ }").unwrap().members().count(), 0);
    }

    #[test]
    fn test_decode_scalar() {
        let root = Cursor::parse(r#"["a\"bA", null, 1.50, false, [1]]"#).unwrap();
        let decoded: Vec<String> = root
            .elements()
            .map(|e| e.unwrap().decode_scalar().unwrap().into_owned())
            .collect();
        assert_eq!(decoded, vec!["a\"bA", "", "1.50", "false", "[1]"]);
    }

    #[test]
    fn test_resolve_steps() {
        let root = Cursor::parse(r#"{"a": [10, {"b c": "x"}]}"#).unwrap();
        let steps = vec![
            RefStep::Name("a".to_string()),
            RefStep::Index(1),
            RefStep::Name("b c".to_string()),
        ];
        let found = root.resolve(&steps).unwrap().unwrap();
        assert_eq!(found.as_str(), "\"x\"");

        let missing = vec![RefStep::Name("a".to_string()), RefStep::Index(5)];
        assert!(root.resolve(&missing).unwrap().is_none());
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(Cursor::parse("01").is_err());
        assert!(Cursor::parse("1.").is_err());
        assert!(Cursor::parse("-").is_err());
        assert!(Cursor::parse("1e+5").is_ok());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_NESTING + 1), "]".repeat(MAX_NESTING + 1));
        assert!(Cursor::parse(&deep).is_err());
    }
}
