use super::error::LexError;
use crate::restapi::{ExpressionOperator, TagFilterEntity};
use regex::Regex;
use serde_json::Number;
use std::fmt;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_./\-]*").expect("valid word regex"));
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?").expect("valid number regex")
});
static ORIGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z]*)").expect("valid origin regex"));

/// Kinds of tokens in a tag filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Dotted entity path such as `entity.name`
    Identifier(String),
    /// Unescaped content of a single-quoted literal
    String(String),
    Number(Number),
    Boolean(bool),
    Operator(ExpressionOperator),
    And,
    Or,
    OpenBracket,
    CloseBracket,
    /// Separates an identifier from its tag key
    Colon,
    /// `@dest`, `@src` or `@na` suffix of the preceding entity
    Origin(TagFilterEntity),
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::String(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::Boolean(_) => "boolean",
            TokenKind::Operator(op) if op.is_unary() => "unary operator",
            TokenKind::Operator(_) => "comparison operator",
            TokenKind::And => "logical and",
            TokenKind::Or => "logical or",
            TokenKind::OpenBracket => "open bracket",
            TokenKind::CloseBracket => "close bracket",
            TokenKind::Colon => "tag key separator",
            TokenKind::Origin(_) => "entity origin",
        }
    }

    /// Tokens scanned as a bare word, keywords included
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier(_)
                | TokenKind::Boolean(_)
                | TokenKind::Operator(_)
                | TokenKind::And
                | TokenKind::Or
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::String(_) | TokenKind::Number(_) | TokenKind::Boolean(_)
        )
    }
}

/// A token together with its raw text and byte offset in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split an expression into tokens, skipping whitespace
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = input[pos..].chars().next() {
        if c.is_whitespace() {
            pos += c.len_utf8();
            continue;
        }

        let rest = &input[pos..];
        let (kind, len) = match c {
            '(' => (TokenKind::OpenBracket, 1),
            ')' => (TokenKind::CloseBracket, 1),
            ':' => (TokenKind::Colon, 1),
            '\'' => {
                let (value, len) = lex_string(rest, pos)?;
                (TokenKind::String(value), len)
            }
            '@' => lex_origin(rest, pos)?,
            _ => {
                if let Some(m) = NUMBER_RE.find(rest) {
                    (TokenKind::Number(parse_number(m.as_str(), pos)?), m.end())
                } else if let Some(m) = WORD_RE.find(rest) {
                    (classify_word(m.as_str()), m.end())
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        offset: pos,
                        found: c,
                    });
                }
            }
        };

        tokens.push(Token {
            kind,
            text: rest[..len].to_string(),
            offset: pos,
        });
        pos += len;
    }

    Ok(tokens)
}

/// Keywords are matched case-insensitively, boolean literals exactly
fn classify_word(word: &str) -> TokenKind {
    match word {
        "true" => return TokenKind::Boolean(true),
        "false" => return TokenKind::Boolean(false),
        _ => {}
    }

    if word.eq_ignore_ascii_case("AND") {
        TokenKind::And
    } else if word.eq_ignore_ascii_case("OR") {
        TokenKind::Or
    } else if let Some(op) = ExpressionOperator::from_keyword(word) {
        TokenKind::Operator(op)
    } else {
        TokenKind::Identifier(word.to_string())
    }
}

fn lex_origin(rest: &str, offset: usize) -> Result<(TokenKind, usize), LexError> {
    let caps = ORIGIN_RE.captures(rest).ok_or(LexError::UnexpectedCharacter {
        offset,
        found: '@',
    })?;
    let origin = caps.get(1).map_or("", |m| m.as_str());
    let entity = TagFilterEntity::from_origin_key(origin).ok_or_else(|| LexError::UnknownOrigin {
        offset,
        origin: origin.to_string(),
    })?;

    Ok((TokenKind::Origin(entity), origin.len() + 1))
}

/// Scan a single-quoted literal starting at the opening quote
fn lex_string(rest: &str, offset: usize) -> Result<(String, usize), LexError> {
    let mut value = String::new();
    let mut chars = rest.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '\'' => return Ok((value, i + 1)),
            '\\' => match chars.next() {
                Some((_, '\\')) => value.push('\\'),
                Some((_, '\'')) => value.push('\''),
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, found)) => {
                    return Err(LexError::InvalidEscape {
                        offset: offset + i,
                        found,
                    });
                }
                None => break,
            },
            other => value.push(other),
        }
    }

    Err(LexError::UnterminatedString { offset })
}

fn parse_number(literal: &str, offset: usize) -> Result<Number, LexError> {
    let digits = literal.strip_prefix('+').unwrap_or(literal);

    if let Ok(value) = digits.parse::<i64>() {
        return Ok(value.into());
    }
    if let Ok(value) = digits.parse::<u64>() {
        return Ok(value.into());
    }

    digits
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| LexError::NumberOutOfRange {
            offset,
            literal: literal.to_string(),
        })
}
