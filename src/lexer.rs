use crate::ast::{NumberLiteral, Operator, PathRef, RefStep, Token, TokenGroup};
use crate::error::{Error, Result};

/// Filter-expression tokenizer.
///
/// Works on byte offsets into the full path text so every error can point
/// back at the offending fragment. Whether `-` is the minus operator or the
/// sign of a number depends on the group of the preceding token, which the
/// caller passes to [`Lexer::next_token`].
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, position: usize) -> Self {
        Lexer { input, position }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.position
    }

    fn current_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.position + offset).copied()
    }

    fn advance(&mut self, count: usize) {
        self.position += count;
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.current_byte() {
            if is_space(b) {
                self.advance(1);
            } else {
                break;
            }
        }
    }

    fn error_here(&self) -> Error {
        Error::syntax(self.input, self.position)
    }

    fn operator(&mut self, op: Operator, len: usize) -> Token {
        self.advance(len);
        Token::Op(op)
    }

    /// Reads one token. Returns the token and the offset it started at.
    pub fn next_token(&mut self, prev_group: TokenGroup) -> Result<(Token, usize)> {
        self.skip_whitespace();
        let start = self.position;

        let token = match self.current_byte() {
            None => return Err(self.error_here()),
            Some(b'(') => {
                self.advance(1);
                Token::LParen
            }
            Some(b')') => {
                self.advance(1);
                Token::RParen
            }
            Some(b'+') => self.operator(Operator::Plus, 1),
            Some(b'-') if prev_group == TokenGroup::Operand => self.operator(Operator::Minus, 1),
            Some(b'/') => self.operator(Operator::Divide, 1),
            Some(b'*') => self.operator(Operator::Multiply, 1),
            Some(b'!') => {
                if self.peek_byte(1) == Some(b'=') {
                    self.operator(Operator::NotEqual, 2)
                } else {
                    self.operator(Operator::Not, 1)
                }
            }
            Some(b'=') => match self.peek_byte(1) {
                Some(b'=') => self.operator(Operator::Equal, 2),
                Some(b'~') => self.operator(Operator::Regex, 2),
                _ => return Err(self.error_here()),
            },
            Some(b'<') => {
                if self.peek_byte(1) == Some(b'=') {
                    self.operator(Operator::LessEqual, 2)
                } else {
                    self.operator(Operator::LessThan, 1)
                }
            }
            Some(b'>') => {
                if self.peek_byte(1) == Some(b'=') {
                    self.operator(Operator::GreaterEqual, 2)
                } else {
                    self.operator(Operator::GreaterThan, 1)
                }
            }
            Some(b'|') if self.peek_byte(1) == Some(b'|') => self.operator(Operator::Or, 2),
            Some(b'&') if self.peek_byte(1) == Some(b'&') => self.operator(Operator::And, 2),
            Some(b'@') => Token::RelativePath(self.read_path_ref()?),
            Some(b'$') => Token::AbsolutePath(self.read_path_ref()?),
            Some(b'\'' | b'"') => Token::String(self.read_string()?),
            Some(b) if b == b'-' || b.is_ascii_digit() => Token::Number(self.read_number()?),
            Some(_) => return Err(self.error_here()),
        };

        Ok((token, start))
    }

    /// Quoted literal. Only the quote character itself and the backslash
    /// may be escaped.
    fn read_string(&mut self) -> Result<String> {
        let start = self.position;
        let end = scan_quoted(self.input, start).ok_or_else(|| self.error_here())?;
        self.position = end;

        Ok(unquote(&self.input[start + 1..end - 1]))
    }

    fn read_number(&mut self) -> Result<NumberLiteral> {
        let start = self.position;
        let end = scan_number(self.input, start).ok_or_else(|| self.error_here())?;

        let literal = NumberLiteral::parse(&self.input[start..end]).ok_or_else(|| self.error_here())?;
        self.position = end;

        Ok(literal)
    }

    /// `$` or `@` followed by definite steps.
    fn read_path_ref(&mut self) -> Result<PathRef> {
        let start = self.position;
        let (steps, end) = scan_path_ref(self.input, start)?;
        self.position = end;

        Ok(PathRef {
            text: self.input[start..end].to_string(),
            steps,
        })
    }
}

/// Space, tab, carriage return or line feed.
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

pub fn skip_spaces(input: &str, mut pos: usize) -> usize {
    while input.as_bytes().get(pos).copied().is_some_and(is_space) {
        pos += 1;
    }
    pos
}

/// Member-name byte in dot notation.
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Finds the end (one past the closing quote) of the quoted substring
/// starting at `start`.
pub fn scan_quoted(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let quote = *bytes.get(start)?;
    let mut pos = start + 1;

    while let Some(&b) = bytes.get(pos) {
        if b == quote {
            return Some(pos + 1);
        }
        if b == b'\\' {
            match bytes.get(pos + 1) {
                Some(&next) if next == quote || next == b'\\' => pos += 1,
                _ => return None,
            }
        }
        pos += 1;
    }

    None
}

/// Drops the backslash of every escape pair.
pub fn unquote(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Optional sign, mantissa with at least one digit, optional exponent.
/// Returns the offset one past the number.
pub fn scan_number(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let at = |i: usize| bytes.get(i).copied();
    let mut pos = start;

    if matches!(at(pos), Some(b'-' | b'+')) {
        pos += 1;
    }

    let mut digits = 0;
    while at(pos).is_some_and(|b| b.is_ascii_digit()) {
        pos += 1;
        digits += 1;
    }
    if at(pos) == Some(b'.') {
        pos += 1;
        while at(pos).is_some_and(|b| b.is_ascii_digit()) {
            pos += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(at(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(at(pos), Some(b'-' | b'+')) {
            pos += 1;
        }
        if !at(pos).is_some_and(|b| b.is_ascii_digit()) {
            return None;
        }
        while at(pos).is_some_and(|b| b.is_ascii_digit()) {
            pos += 1;
        }
    }

    Some(pos)
}

/// Parses the steps of a filter path reference. `start` points at the
/// `$`/`@` sigil. Returns the steps and the offset one past the reference.
///
/// ```text
/// .name    .['name']    ['name']    ["name"]    [3]
/// ```
///
/// Quoted names take no escapes.
pub fn scan_path_ref(input: &str, start: usize) -> Result<(Vec<RefStep>, usize)> {
    let bytes = input.as_bytes();
    let at = |i: usize| bytes.get(i).copied();
    let mut steps = Vec::new();
    let mut pos = start + 1;

    while matches!(at(pos), Some(b'.' | b'[')) {
        let step_start = pos;
        let fail = || Error::syntax(input, step_start);

        if at(pos) == Some(b'.') {
            pos += 1;
            match at(pos) {
                None => return Err(fail()),
                Some(b'[') => {}
                Some(_) => {
                    let name_start = pos;
                    while at(pos).is_some_and(is_ident_byte) {
                        pos += 1;
                    }
                    if pos == name_start {
                        return Err(fail());
                    }
                    steps.push(RefStep::Name(input[name_start..pos].to_string()));
                    continue;
                }
            }
        }

        // at '['
        pos = skip_spaces(input, pos + 1);

        match at(pos) {
            Some(b) if b.is_ascii_digit() => {
                let digits_start = pos;
                while at(pos).is_some_and(|b| b.is_ascii_digit()) {
                    pos += 1;
                }
                let index = input[digits_start..pos].parse::<usize>().map_err(|_| fail())?;
                steps.push(RefStep::Index(index));
                pos = skip_spaces(input, pos);
            }
            Some(quote @ (b'\'' | b'"')) => {
                let name_start = pos + 1;
                let close = bytes[name_start..]
                    .iter()
                    .position(|&b| b == quote)
                    .map(|offset| name_start + offset)
                    .ok_or_else(fail)?;
                steps.push(RefStep::Name(input[name_start..close].to_string()));
                pos = skip_spaces(input, close + 1);
            }
            _ => return Err(fail()),
        }

        if at(pos) != Some(b']') {
            return Err(fail());
        }
        pos += 1;
    }

    Ok((steps, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(text: &str) -> Token {
        Token::Number(NumberLiteral::parse(text).unwrap())
    }

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input, 0);
        let mut prev = TokenGroup::None;
        let mut result = Vec::new();

        while lexer.position() < input.len() {
            let (token, _) = lexer.next_token(prev).unwrap();
            prev = token.group();
            result.push(token);
        }
        result
    }

    #[test]
    fn test_minus_after_operand_is_operator() {
        assert_eq!(
            tokens("1-2"),
            vec![num("1"), Token::Op(Operator::Minus), num("2")]
        );
    }

    #[test]
    fn test_minus_after_operator_is_sign() {
        assert_eq!(
            tokens("1 - -2"),
            vec![num("1"), Token::Op(Operator::Minus), num("-2")]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            tokens("!= == =~ <= >= && ||"),
            vec![
                Token::Op(Operator::NotEqual),
                Token::Op(Operator::Equal),
                Token::Op(Operator::Regex),
                Token::Op(Operator::LessEqual),
                Token::Op(Operator::GreaterEqual),
                Token::Op(Operator::And),
                Token::Op(Operator::Or),
            ]
        );
    }

    #[test]
    fn test_single_ampersand_rejected() {
        let mut lexer = Lexer::new("& 1", 0);
        assert!(lexer.next_token(TokenGroup::Operand).is_err());
    }

    #[test]
    fn test_scan_number_exponent() {
        assert_eq!(scan_number("1.5e-3)", 0), Some(6));
        assert_eq!(scan_number("1e)", 0), None);
        assert_eq!(scan_number("-)", 0), None);
    }

    #[test]
    fn test_scan_quoted_escapes() {
        assert_eq!(scan_quoted(r"'it\'s'", 0), Some(7));
        assert_eq!(scan_quoted(r"'a\nb'", 0), None);
        assert_eq!(scan_quoted("'open", 0), None);
    }

    #[test]
    fn test_path_ref_steps() {
        let (steps, end) = scan_path_ref("@.a['b c'][ 2 ] > 1", 0).unwrap();
        assert_eq!(
            steps,
            vec![
                RefStep::Name("a".to_string()),
                RefStep::Name("b c".to_string()),
                RefStep::Index(2),
            ]
        );
        assert_eq!(end, 15);
    }

    #[test]
    fn test_bare_reference() {
        let (steps, end) = scan_path_ref("@ == 1", 0).unwrap();
        assert!(steps.is_empty());
        assert_eq!(end, 1);
    }
}
