use std::fmt;
use std::str::FromStr;

use crate::{
    ast::Segment,
    error::{Error, Result},
    evaluator::Evaluator,
    parser::Parser,
};

/// A path compiled once and evaluated any number of times.
///
/// Immutable after compilation. Dropping it releases every segment and
/// token list it owns.
///
/// # Examples
///
/// ```
/// use pathwise::CompiledPath;
///
/// let path = CompiledPath::compile("$.store.book[0].title").unwrap();
/// assert!(path.is_definite());
///
/// let doc = r#"{"store": {"book": [{"title": "Dune"}]}}"#;
/// assert_eq!(path.query(doc).unwrap().as_deref(), Some("Dune"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    pub(crate) segments: Vec<Segment>,
    pub(crate) definite: bool,
}

impl CompiledPath {
    pub fn compile(path: &str) -> Result<Self> {
        Parser::new(path).parse()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when every segment selects at most one child, so the result is a
    /// bare value rather than a JSON array.
    pub fn is_definite(&self) -> bool {
        self.definite
    }

    /// Evaluate against JSON text.
    ///
    /// Returns `Ok(None)` when nothing matched.
    pub fn query(&self, document: &str) -> Result<Option<String>> {
        Evaluator::new(self).evaluate(document)
    }
}

impl FromStr for CompiledPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CompiledPath::compile(s)
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
