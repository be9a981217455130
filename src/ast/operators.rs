use std::fmt;

/// Filter-expression operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // Arithmetic
    /// Addition (`+`)
    Plus,
    /// Subtraction (`-`)
    Minus,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,

    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,

    // Logical
    /// Negation (`!`), the only unary operator
    Not,
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,

    /// Regular expression match (`=~`)
    Regex,
}

/// Token classification used by the expression compiler to reject
/// operands and operators in the wrong position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenGroup {
    /// Parentheses, or nothing seen yet
    None,
    /// Literal, path reference, or a closed `( ... )`
    Operand,
    /// Unary operator
    Unary,
    /// Binary operator
    Binary,
}

impl Operator {
    /// Binding strength; lower binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Not => 2,
            Operator::Multiply | Operator::Divide => 3,
            Operator::Plus | Operator::Minus => 4,
            Operator::GreaterThan
            | Operator::GreaterEqual
            | Operator::LessThan
            | Operator::LessEqual => 6,
            Operator::Equal | Operator::NotEqual | Operator::Regex => 7,
            Operator::And => 11,
            Operator::Or => 12,
        }
    }

    pub fn group(self) -> TokenGroup {
        match self {
            Operator::Not => TokenGroup::Unary,
            _ => TokenGroup::Binary,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessEqual => "<=",
            Operator::Not => "!",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Regex => "=~",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
