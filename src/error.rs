use thiserror::Error;

/// Errors produced while compiling or evaluating a JSONPath.
///
/// Compilation and evaluation report through this single type. A query
/// either succeeds (possibly with no match) or fails with one of these;
/// there is no partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The path text does not start with `$` or has nothing after it.
    #[error("JSONPath query must start with the root object/element $.")]
    MissingRoot,

    /// Unparsable path text. `fragment` is the remainder of the path
    /// starting at the offending byte (empty when the path ended early).
    #[error("{}", describe_syntax(.fragment))]
    Syntax { position: usize, fragment: String },

    /// A filter expression whose parentheses do not pair up.
    #[error("mismatched () brackets in expression: {expression}")]
    MismatchedParens { position: usize, expression: String },

    /// Well-formed but unknown construct, e.g. `.median()`.
    #[error("unsupported construct in jsonpath: \"{construct}\"")]
    UnsupportedConstruct { position: usize, construct: String },

    /// A filter's postfix stream left the operand stack in a bad shape.
    #[error("invalid compiled expression: {0}")]
    CompiledExpression(String),

    /// An aggregate function got empty, non-array or non-numeric input.
    #[error("{0}")]
    FunctionInput(String),

    #[error("invalid regular expression in JSON path: {0}")]
    RegexCompile(String),

    /// The document text is not valid JSON where the evaluator walked it.
    #[error("invalid JSON at position {position}: {message}")]
    InternalJson { position: usize, message: String },
}

fn describe_syntax(fragment: &str) -> String {
    if fragment.is_empty() {
        "jsonpath was unexpectedly terminated".to_string()
    } else {
        format!("unsupported construct in jsonpath starting with: \"{}\"", fragment)
    }
}

impl Error {
    /// Syntax error anchored at byte `position` of `path`.
    pub fn syntax(path: &str, position: usize) -> Self {
        Error::Syntax {
            position,
            fragment: path.get(position..).unwrap_or_default().to_string(),
        }
    }

    pub(crate) fn json(position: usize, message: impl Into<String>) -> Self {
        Error::InternalJson {
            position,
            message: message.into(),
        }
    }

    /// True for every error caused by malformed path text.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::MissingRoot | Error::Syntax { .. } | Error::MismatchedParens { .. }
        )
    }

    /// Byte offset into the path (compile errors) or document (JSON errors).
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::MissingRoot => Some(0),
            Error::Syntax { position, .. }
            | Error::MismatchedParens { position, .. }
            | Error::UnsupportedConstruct { position, .. }
            | Error::InternalJson { position, .. } => Some(*position),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
