//! Tokenizer for rule text, implemented with nom.
//!
//! Scanning never fails: every character of the input ends up in some
//! token or is skipped as whitespace. An unterminated quote swallows the
//! rest of the input as a string literal.

use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_till, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

/// Token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bare word that is not a keyword or number.
    Identifier,
    /// `-?digits(.digits)?`
    Number,
    /// Quoted text (quotes stripped).
    String,
    /// `true` / `false`, any case.
    Boolean,
    /// One of `> < >= <= == != =`.
    Operator,
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// `in`
    In,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

/// A lexical token with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Literal text as it appeared in the input (quotes removed for strings).
    pub text: String,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// True if the token has the given kind.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Splits rule text into tokens.
///
/// # Examples
///
/// ```rust
/// use eligibility_rules::{tokenize, TokenKind};
///
/// let tokens = tokenize("income >= 50000 AND NOT in vip_list");
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Identifier,
///         TokenKind::Operator,
///         TokenKind::Number,
///         TokenKind::And,
///         TokenKind::Not,
///         TokenKind::In,
///         TokenKind::Identifier,
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        match token(rest) {
            Ok((remaining, tok)) => {
                tokens.push(tok);
                rest = remaining.trim_start();
            }
            Err(_) => break,
        }
    }

    tokens
}

/// True if `word` is a complete number literal.
pub(crate) fn is_number_literal(word: &str) -> bool {
    all_consuming(number_literal)(word).is_ok()
}

// ============================================================================
// Token parsers
// ============================================================================

fn token(input: &str) -> IResult<&str, Token> {
    // Order matters - two-character operators before single ones, quotes
    // before bare words
    alt((parenthesis, operator, quoted, word, stray))(input)
}

fn parenthesis(input: &str) -> IResult<&str, Token> {
    alt((
        map(char('('), |_| Token::new(TokenKind::LeftParen, "(")),
        map(char(')'), |_| Token::new(TokenKind::RightParen, ")")),
    ))(input)
}

fn operator(input: &str) -> IResult<&str, Token> {
    map(
        alt((
            tag(">="),
            tag("<="),
            tag("!="),
            tag("=="),
            tag(">"),
            tag("<"),
            tag("="),
        )),
        |op: &str| Token::new(TokenKind::Operator, op),
    )(input)
}

fn quoted(input: &str) -> IResult<&str, Token> {
    let (input, quote) = one_of("\"'")(input)?;
    let (input, body) = take_till(|c| c == quote)(input)?;
    let (input, _) = opt(char(quote))(input)?;
    Ok((input, Token::new(TokenKind::String, body)))
}

fn word(input: &str) -> IResult<&str, Token> {
    map(take_while1(is_word_char), classify_word)(input)
}

/// A lone `!` is neither an operator nor part of a word.
fn stray(input: &str) -> IResult<&str, Token> {
    map(take(1usize), |c: &str| Token::new(TokenKind::Identifier, c))(input)
}

fn number_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1)))))(input)
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '>' | '<' | '=' | '!')
}

fn classify_word(word: &str) -> Token {
    let kind = match word.to_lowercase().as_str() {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "in" => TokenKind::In,
        "true" | "false" => TokenKind::Boolean,
        _ if is_number_literal(word) => TokenKind::Number,
        _ => TokenKind::Identifier,
    };
    Token::new(kind, word)
}
