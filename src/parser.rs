use crate::{
    ast::{
        CompiledPath, Function, MatchList, Operator, Range, Segment, SegmentKind, Token,
        TokenGroup, render_postfix,
    },
    error::{Error, Result},
    lexer::{Lexer, is_ident_byte, skip_spaces, unquote},
};

/// Compiles path text into a [`CompiledPath`].
///
/// Segments are built left to right. Nothing is returned unless the whole
/// path compiled, so a failure never exposes a partial path.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    segments: Vec<Segment>,
    definite: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            position: 0,
            segments: Vec::new(),
            definite: true,
        }
    }

    fn current_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }

    fn advance(&mut self, count: usize) {
        self.position += count;
    }

    fn error_at(&self, pos: usize) -> Error {
        Error::syntax(self.input, pos)
    }

    pub fn parse(mut self) -> Result<CompiledPath> {
        if !self.input.starts_with('$') || self.input.len() == 1 {
            return Err(Error::MissingRoot);
        }
        self.position = 1;

        while self.position < self.input.len() {
            let mut prefix = self.current_byte();
            let mut detached = false;

            if prefix == Some(b'.') {
                self.advance(1);
                if self.current_byte() == Some(b'.') {
                    detached = true;
                    self.advance(1);
                }
                match self.current_byte() {
                    Some(b'[') => prefix = Some(b'['),
                    None | Some(b'.') => prefix = None,
                    _ => {}
                }
            }

            let body_start = self.position;
            let mut segment = match prefix {
                Some(b'.') => self.parse_dot_segment()?,
                Some(b'[') => {
                    self.advance(1);
                    self.parse_bracket_segment()?
                }
                _ => return Err(self.error_at(body_start)),
            };
            segment.detached = detached;

            // functions can only be followed by functions
            let after_function = self.segments.last().is_some_and(Segment::is_function);
            if after_function && !segment.is_function() {
                return Err(self.error_at(body_start));
            }

            self.definite &= segment.is_definite();
            self.segments.push(segment);
        }

        log::debug!(
            "compiled jsonpath {:?}: {} segment(s), definite: {}",
            self.input,
            self.segments.len(),
            self.definite
        );

        Ok(CompiledPath {
            segments: self.segments,
            definite: self.definite,
        })
    }

    /// `.name`, `.*` or `.function()`; position is just past the dot.
    fn parse_dot_segment(&mut self) -> Result<Segment> {
        let start = self.position;

        if self.current_byte() == Some(b'*') {
            self.advance(1);
            return Ok(Segment::new(SegmentKind::MatchAll));
        }

        let mut end = start;
        while self.byte_at(end).is_some_and(is_ident_byte) {
            end += 1;
        }

        if self.byte_at(end) == Some(b'(') {
            let close = skip_spaces(self.input, end + 1);
            if self.byte_at(close) == Some(b')') {
                let name = &self.input[start..end];
                let function =
                    Function::from_name(name).ok_or_else(|| Error::UnsupportedConstruct {
                        position: start,
                        construct: self.input[start..=close].to_string(),
                    })?;
                self.position = close + 1;
                return Ok(Segment::new(SegmentKind::Function(function)));
            }
        }

        if end == start {
            return Err(self.error_at(start));
        }

        self.position = end;
        Ok(Segment::new(SegmentKind::MatchList(MatchList::Names(vec![
            self.input[start..end].to_string(),
        ]))))
    }

    /// Content of `[...]`; position is just past the `[`.
    fn parse_bracket_segment(&mut self) -> Result<Segment> {
        self.position = skip_spaces(self.input, self.position);

        let segment = match self.current_byte() {
            Some(b'?') => {
                self.advance(1);
                self.parse_expression()?
            }
            Some(b'*') => {
                self.advance(1);
                Segment::new(SegmentKind::MatchAll)
            }
            Some(b'\'' | b'"') => self.parse_names()?,
            Some(b) if b.is_ascii_digit() || b == b':' || b == b'-' => self.parse_indexes()?,
            _ => return Err(self.error_at(self.position)),
        };

        self.position = skip_spaces(self.input, self.position);
        if self.current_byte() != Some(b']') {
            return Err(self.error_at(self.position));
        }
        self.advance(1);

        Ok(segment)
    }

    /// Comma-separated quoted names, stopping at the closing `]`.
    ///
    /// Backslash escapes the quote character or another backslash and is
    /// only valid inside quotes.
    fn parse_names(&mut self) -> Result<Segment> {
        let mut names = Vec::new();
        let mut open: Option<usize> = None;
        let mut parsed_name = false;
        let mut pos = self.position;

        loop {
            let Some(b) = self.byte_at(pos) else {
                return Err(self.error_at(pos));
            };

            match (b, open) {
                (b']', None) => break,
                (b'\'' | b'"', None) => {
                    if parsed_name {
                        return Err(self.error_at(pos));
                    }
                    open = Some(pos);
                }
                (b'\'' | b'"', Some(start)) if self.byte_at(start) == Some(b) => {
                    if start + 1 == pos {
                        return Err(self.error_at(start));
                    }
                    names.push(unquote(&self.input[start + 1..pos]));
                    parsed_name = true;
                    open = None;
                }
                (b'\\', Some(start)) => {
                    let next = self.byte_at(pos + 1);
                    if next != Some(b'\\') && next != self.byte_at(start) {
                        return Err(self.error_at(pos));
                    }
                    pos += 1;
                }
                (b'\\', None) => return Err(self.error_at(pos)),
                (b' ' | b'\t', None) => {}
                (b',', None) => {
                    if !parsed_name {
                        return Err(self.error_at(pos));
                    }
                    parsed_name = false;
                }
                (_, None) => return Err(self.error_at(pos)),
                (0, Some(_)) => return Err(self.error_at(pos)),
                (_, Some(_)) => {}
            }
            pos += 1;
        }

        if !parsed_name {
            return Err(self.error_at(pos));
        }

        self.position = pos;
        Ok(Segment::new(SegmentKind::MatchList(MatchList::Names(names))))
    }

    /// Comma-separated indices or a single `start:end` slice, stopping at
    /// the closing `]`.
    fn parse_indexes(&mut self) -> Result<Segment> {
        let mut values: Vec<i64> = Vec::new();
        let mut number_start: Option<usize> = None;
        let mut parsed_index = false;
        let mut is_list = false;
        let mut is_range = false;
        let mut has_start = false;
        let mut has_end = false;
        let mut pos = self.position;

        loop {
            let b = self.byte_at(pos);

            match b {
                Some(d) if d.is_ascii_digit() => {
                    if number_start.is_none() {
                        if parsed_index {
                            return Err(self.error_at(pos));
                        }
                        number_start = Some(pos);
                    }
                    pos += 1;
                    continue;
                }
                Some(b'-') => {
                    if number_start.is_some() || parsed_index {
                        return Err(self.error_at(pos));
                    }
                    number_start = Some(pos);
                    pos += 1;
                    continue;
                }
                _ => {}
            }

            if let Some(start) = number_start.take() {
                let value = self.input[start..pos]
                    .parse::<i64>()
                    .map_err(|_| self.error_at(start))?;
                values.push(value);
                parsed_index = true;
            }

            match b {
                Some(b']') => {
                    if is_range {
                        has_end = parsed_index;
                    } else if !parsed_index {
                        return Err(self.error_at(pos));
                    }
                    break;
                }
                Some(b':') => {
                    if is_range || is_list {
                        return Err(self.error_at(pos));
                    }
                    is_range = true;
                    has_start = parsed_index;
                    parsed_index = false;
                }
                Some(b',') => {
                    if is_range || !parsed_index {
                        return Err(self.error_at(pos));
                    }
                    is_list = true;
                    parsed_index = false;
                }
                Some(b' ' | b'\t') => {}
                _ => return Err(self.error_at(pos)),
            }
            pos += 1;
        }

        self.position = pos;

        if is_range {
            let range = Range {
                start: if has_start { values.first().copied() } else { None },
                end: if has_end { values.last().copied() } else { None },
            };
            return Ok(Segment::new(SegmentKind::MatchRange(range)));
        }

        Ok(Segment::new(SegmentKind::MatchList(MatchList::Indices(values))))
    }

    /// `( ... )` of a `[?( ... )]` filter; position is just past the `?`.
    ///
    /// Shunting-yard over the lexer's tokens. Operators pop while the stacked
    /// operator binds at least as tightly, which makes every binary operator
    /// left-associative. The result is stored in postfix order.
    fn parse_expression(&mut self) -> Result<Segment> {
        let expression_start = self.position;
        if self.current_byte() != Some(b'(') {
            return Err(self.error_at(expression_start));
        }

        let mut lexer = Lexer::new(self.input, expression_start + 1);
        let mut output: Vec<Token> = Vec::new();
        let mut operators: Vec<Token> = Vec::new();
        let mut nesting = 1;
        let mut prev_group = TokenGroup::None;

        loop {
            let (token, token_start) = lexer.next_token(prev_group)?;

            match token {
                Token::LParen => {
                    nesting += 1;
                    operators.push(token);
                    prev_group = TokenGroup::None;
                }
                Token::RParen => {
                    if prev_group != TokenGroup::Operand {
                        return Err(self.error_at(token_start));
                    }
                    nesting -= 1;
                    if nesting == 0 {
                        break;
                    }
                    loop {
                        match operators.pop() {
                            Some(Token::LParen) => break,
                            Some(op) => output.push(op),
                            None => return Err(self.error_at(token_start)),
                        }
                    }
                    prev_group = TokenGroup::Operand;
                }
                Token::Op(op) => {
                    if op.group() == TokenGroup::Binary && prev_group != TokenGroup::Operand {
                        return Err(self.error_at(token_start));
                    }
                    if op == Operator::Not && prev_group == TokenGroup::Operand {
                        return Err(self.error_at(token_start));
                    }
                    while let Some(top) = operators.last() {
                        if *top == Token::LParen || top.precedence() > op.precedence() {
                            break;
                        }
                        if let Some(top) = operators.pop() {
                            output.push(top);
                        }
                    }
                    operators.push(token);
                    prev_group = op.group();
                }
                operand => {
                    if prev_group == TokenGroup::Operand {
                        return Err(self.error_at(token_start));
                    }
                    output.push(operand);
                    prev_group = TokenGroup::Operand;
                }
            }
        }

        self.position = lexer.position();

        while let Some(top) = operators.pop() {
            if top == Token::LParen {
                return Err(Error::MismatchedParens {
                    position: expression_start,
                    expression: self.input[expression_start..self.position].to_string(),
                });
            }
            output.push(top);
        }

        log::trace!("compiled filter expression: {}", render_postfix(&output));

        Ok(Segment::new(SegmentKind::MatchExpression(output)))
    }
}
