use std::fmt;

use crate::ast::{Operator, TokenGroup};

/// A path reference inside a filter expression (`$.a.b`, `@['c'][0]`).
///
/// References are always definite: each step names one member or one
/// element. The steps are resolved at compile time so evaluation only walks
/// the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRef {
    /// Source text, including the leading `$` or `@`
    pub text: String,
    pub steps: Vec<RefStep>,
}

/// A numeric literal inside a filter expression, kept as written.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    /// Source text, including any sign or exponent
    pub text: String,
    pub value: f64,
}

impl NumberLiteral {
    /// `None` when `text` does not parse as a double.
    pub fn parse(text: &str) -> Option<Self> {
        let value = text.parse::<f64>().ok()?;
        Some(NumberLiteral {
            text: text.to_string(),
            value,
        })
    }
}

/// One step of a [`PathRef`].
#[derive(Debug, Clone, PartialEq)]
pub enum RefStep {
    /// Object member by name (`.name`, `['name']`)
    Name(String),
    /// Array element by position (`[3]`)
    Index(usize),
}

/// Filter-expression token.
///
/// The compiler produces these in postfix order; parentheses only exist
/// while compiling and never reach a compiled stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Reference resolved against the document root
    ///
    /// # Examples
    /// ```text
    /// $.threshold
    /// $['limits'][0]
    /// ```
    AbsolutePath(PathRef),

    /// Reference resolved against the node being filtered
    ///
    /// # Examples
    /// ```text
    /// @.price
    /// @
    /// ```
    RelativePath(PathRef),

    /// Quoted string literal, already unescaped
    ///
    /// # Examples
    /// ```text
    /// 'active'
    /// "it's"
    /// ```
    String(String),

    /// Numeric literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -1.5e3
    /// ```
    Number(NumberLiteral),

    /// Left parenthesis
    LParen,

    /// Right parenthesis
    RParen,

    /// Operator
    Op(Operator),
}

impl Token {
    pub fn group(&self) -> TokenGroup {
        match self {
            Token::AbsolutePath(_) | Token::RelativePath(_) | Token::String(_) | Token::Number(_) => {
                TokenGroup::Operand
            }
            Token::LParen | Token::RParen => TokenGroup::None,
            Token::Op(op) => op.group(),
        }
    }

    /// Operator precedence; zero for everything that is not an operator.
    pub fn precedence(&self) -> u8 {
        match self {
            Token::Op(op) => op.precedence(),
            _ => 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::AbsolutePath(path) | Token::RelativePath(path) => f.write_str(&path.text),
            Token::String(s) => f.write_str(s),
            Token::Number(n) => f.write_str(&n.text),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Op(op) => write!(f, "{}", op),
        }
    }
}
