// tests/lexer_tests.rs

use pathwise::ast::{NumberLiteral, Operator, PathRef, RefStep, Token, TokenGroup};
use pathwise::lexer::Lexer;

fn lex_all(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input, 0);
    let mut prev = TokenGroup::None;
    let mut tokens = Vec::new();

    while lexer.position() < input.len() {
        let (token, _) = lexer.next_token(prev).unwrap();
        prev = token.group();
        tokens.push(token);
    }
    tokens
}

fn lex_error(input: &str) -> String {
    let mut lexer = Lexer::new(input, 0);
    let mut prev = TokenGroup::None;
    loop {
        match lexer.next_token(prev) {
            Ok((token, _)) => prev = token.group(),
            Err(e) => return e.to_string(),
        }
    }
}

fn num(text: &str) -> Token {
    Token::Number(NumberLiteral::parse(text).unwrap())
}

fn name(s: &str) -> RefStep {
    RefStep::Name(s.to_string())
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_arithmetic_operators() {
    assert_eq!(
        lex_all("1 + 2 * 3 / 4"),
        vec![
            num("1"),
            Token::Op(Operator::Plus),
            num("2"),
            Token::Op(Operator::Multiply),
            num("3"),
            Token::Op(Operator::Divide),
            num("4"),
        ]
    );
}

#[test]
fn test_comparison_operators() {
    let tokens = lex_all("1 < 2 <= 3 > 4 >= 5");
    let ops: Vec<&Token> = tokens.iter().filter(|t| matches!(t, Token::Op(_))).collect();
    assert_eq!(
        ops,
        vec![
            &Token::Op(Operator::LessThan),
            &Token::Op(Operator::LessEqual),
            &Token::Op(Operator::GreaterThan),
            &Token::Op(Operator::GreaterEqual),
        ]
    );
}

#[test]
fn test_not_versus_not_equal() {
    assert_eq!(
        lex_all("!1 != 2"),
        vec![
            Token::Op(Operator::Not),
            num("1"),
            Token::Op(Operator::NotEqual),
            num("2"),
        ]
    );
}

#[test]
fn test_leading_minus_is_a_sign() {
    assert_eq!(lex_all("-3"), vec![num("-3")]);
}

#[test]
fn test_minus_after_parenthesis_is_a_sign() {
    assert_eq!(lex_all("(-3"), vec![Token::LParen, num("-3")]);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_number_forms() {
    assert_eq!(
        lex_all("1.5e2 == 0.25"),
        vec![
            num("1.5e2"),
            Token::Op(Operator::Equal),
            num("0.25"),
        ]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(lex_all(r"'it\'s'"), vec![Token::String("it's".to_string())]);
    assert_eq!(lex_all(r#""a\\b""#), vec![Token::String(r"a\b".to_string())]);
    assert_eq!(lex_all(r#""say 'hi'""#), vec![Token::String("say 'hi'".to_string())]);
}

#[test]
fn test_unsupported_escape_is_rejected() {
    assert_eq!(
        lex_error(r"'a\nb'"),
        r#"unsupported construct in jsonpath starting with: "'a\nb'""#
    );
}

#[test]
fn test_unterminated_string() {
    assert!(lex_error("'abc").starts_with("unsupported construct"));
}

// ============================================================================
// Path references
// ============================================================================

#[test]
fn test_relative_and_absolute_references() {
    assert_eq!(
        lex_all("@.a['b'] == $[0].c"),
        vec![
            Token::RelativePath(PathRef {
                text: "@.a['b']".to_string(),
                steps: vec![name("a"), name("b")],
            }),
            Token::Op(Operator::Equal),
            Token::AbsolutePath(PathRef {
                text: "$[0].c".to_string(),
                steps: vec![RefStep::Index(0), name("c")],
            }),
        ]
    );
}

#[test]
fn test_dot_bracket_reference() {
    let tokens = lex_all(r#"@.["x y"]"#);
    assert_eq!(
        tokens,
        vec![Token::RelativePath(PathRef {
            text: r#"@.["x y"]"#.to_string(),
            steps: vec![name("x y")],
        })]
    );
}

#[test]
fn test_reference_rejects_negative_index() {
    assert!(lex_error("@[-1]").starts_with("unsupported construct"));
}

#[test]
fn test_reference_needs_name_after_dot() {
    assert_eq!(
        lex_error("@.+1"),
        r#"unsupported construct in jsonpath starting with: ".+1""#
    );
}

// ============================================================================
// Positions and errors
// ============================================================================

#[test]
fn test_token_start_offsets() {
    let mut lexer = Lexer::new("  @.a  ==", 0);
    let (_, start) = lexer.next_token(TokenGroup::None).unwrap();
    assert_eq!(start, 2);
    let (token, start) = lexer.next_token(TokenGroup::Operand).unwrap();
    assert_eq!(token, Token::Op(Operator::Equal));
    assert_eq!(start, 7);
}

#[test]
fn test_end_of_input() {
    assert_eq!(lex_error("1 +  "), "jsonpath was unexpectedly terminated");
}

#[test]
fn test_single_equals_is_rejected() {
    assert_eq!(
        lex_error("1 = 2"),
        r#"unsupported construct in jsonpath starting with: "= 2""#
    );
}

#[test]
fn test_single_pipe_is_rejected() {
    assert!(lex_error("1 | 2").contains("\"| 2\""));
}
