use crate::restapi::ExpressionOperator;
use thiserror::Error;

/// Errors raised while splitting an expression into tokens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter { offset: usize, found: char },

    #[error("Unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Invalid escape sequence '\\{found}' at offset {offset}")]
    InvalidEscape { offset: usize, found: char },

    #[error("Unknown entity origin '@{origin}' at offset {offset}. Valid origins are: @dest, @src, @na")]
    UnknownOrigin { offset: usize, origin: String },

    #[error("Number literal '{literal}' at offset {offset} is out of range")]
    NumberOutOfRange { offset: usize, literal: String },
}

/// Grammar violations detected by the parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty filter expression")]
    EmptyInput,

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedToken {
        offset: usize,
        found: String,
        expected: &'static str,
    },

    #[error("Operator {operator} at offset {offset} does not take a value")]
    UnexpectedValue {
        offset: usize,
        operator: ExpressionOperator,
    },

    #[error("Tag key '{key}' cannot be used with unary operator {operator} at offset {offset}")]
    TagKeyOnUnaryOperator {
        offset: usize,
        key: String,
        operator: ExpressionOperator,
    },

    #[error("Unexpected trailing input '{found}' at offset {offset}")]
    TrailingInput { offset: usize, found: String },
}

/// Invariant violations in hand-built syntax trees
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Operator {operator} used for '{name}' is not a comparison operator")]
    NotAComparisonOperator {
        name: String,
        operator: ExpressionOperator,
    },

    #[error("Operator {operator} used for '{name}' is not a unary operator")]
    NotAUnaryOperator {
        name: String,
        operator: ExpressionOperator,
    },

    #[error("Tag key '{key}' of '{name}' cannot be combined with unary operator {operator}")]
    TagKeyOnUnaryOperator {
        name: String,
        key: String,
        operator: ExpressionOperator,
    },

    #[error("Tag key '{key}' of '{name}' is not supported by match specifications")]
    TagKeyNotSupported { name: String, key: String },
}

/// Any failure turning an expression string into a wire model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid filter expression: {0}")]
    Lex(#[from] LexError),

    #[error("Invalid filter expression: {0}")]
    Parse(#[from] ParseError),

    #[error("Cannot map filter expression: {0}")]
    Mapping(#[from] MappingError),
}
