use super::ast::{
    BracketExpression, ComparisonExpression, EntitySpec, FilterExpression, Literal,
    LogicalAndExpression, LogicalOrExpression, PrimaryExpression, UnaryOperationExpression,
};
use super::error::{FilterError, ParseError};
use super::lexer::{Token, TokenKind, tokenize};

/// Parse an expression string into its syntax tree
pub fn parse(input: &str) -> Result<FilterExpression, FilterError> {
    let tokens = tokenize(input)?;
    Ok(parse_tokens(&tokens)?)
}

/// Parse an already tokenized expression
///
/// Precedence from lowest to highest: `OR`, `AND`, brackets and primaries.
pub fn parse_tokens(tokens: &[Token]) -> Result<FilterExpression, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expression = parser.parse_or()?;

    if let Some(token) = parser.peek() {
        return Err(ParseError::TrailingInput {
            offset: token.offset,
            found: token.text.clone(),
        });
    }

    Ok(FilterExpression { expression })
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token if it has the given kind
    fn eat(&mut self, kind: &TokenKind) -> bool {
        match self.peek() {
            Some(token) if &token.kind == kind => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn unexpected(token: Option<&Token>, expected: &'static str) -> ParseError {
        match token {
            Some(token) => ParseError::UnexpectedToken {
                offset: token.offset,
                found: token.text.clone(),
                expected,
            },
            None => ParseError::UnexpectedEnd { expected },
        }
    }

    fn parse_or(&mut self) -> Result<LogicalOrExpression, ParseError> {
        let mut operands = vec![self.parse_and()?];
        while self.eat(&TokenKind::Or) {
            operands.push(self.parse_and()?);
        }

        LogicalOrExpression::chain(operands)
            .ok_or(ParseError::UnexpectedEnd { expected: "expression" })
    }

    fn parse_and(&mut self) -> Result<LogicalAndExpression, ParseError> {
        let mut operands = vec![self.parse_bracket()?];
        while self.eat(&TokenKind::And) {
            operands.push(self.parse_bracket()?);
        }

        LogicalAndExpression::chain(operands)
            .ok_or(ParseError::UnexpectedEnd { expected: "expression" })
    }

    fn parse_bracket(&mut self) -> Result<BracketExpression, ParseError> {
        if !self.eat(&TokenKind::OpenBracket) {
            return Ok(BracketExpression::Primary(self.parse_primary()?));
        }

        let inner = self.parse_or()?;
        if !self.eat(&TokenKind::CloseBracket) {
            return Err(Self::unexpected(self.peek(), "')'"));
        }
        Ok(BracketExpression::Bracket(Box::new(inner)))
    }

    fn parse_primary(&mut self) -> Result<PrimaryExpression, ParseError> {
        let entity = self.parse_entity()?;

        let operator_token = self.advance();
        let operator = match operator_token {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => *op,
            other => return Err(Self::unexpected(other, "operator")),
        };
        let operator_offset = operator_token.map_or(0, |token| token.offset);

        if operator.is_unary() {
            if let Some(key) = &entity.tag_key {
                return Err(ParseError::TagKeyOnUnaryOperator {
                    offset: operator_offset,
                    key: key.clone(),
                    operator,
                });
            }
            if let Some(token) = self.peek().filter(|token| token.kind.is_literal()) {
                return Err(ParseError::UnexpectedValue {
                    offset: token.offset,
                    operator,
                });
            }
            return Ok(PrimaryExpression::UnaryOperation(UnaryOperationExpression {
                entity,
                operator,
            }));
        }

        let value = match self.advance() {
            Some(Token {
                kind: TokenKind::String(value),
                ..
            }) => Literal::String(value.clone()),
            Some(Token {
                kind: TokenKind::Number(value),
                ..
            }) => Literal::Number(value.clone()),
            Some(Token {
                kind: TokenKind::Boolean(value),
                ..
            }) => Literal::Boolean(*value),
            other => return Err(Self::unexpected(other, "string, number or boolean value")),
        };

        Ok(PrimaryExpression::Comparison(ComparisonExpression {
            entity,
            operator,
            value,
        }))
    }

    fn parse_entity(&mut self) -> Result<EntitySpec, ParseError> {
        let mut entity = match self.advance() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => EntitySpec::new(name.as_str()),
            other => return Err(Self::unexpected(other, "entity identifier")),
        };

        if self.eat(&TokenKind::Colon) {
            // keys are free-form words, so `agent.tag:or` is a key and not a connective
            match self.advance() {
                Some(token) if token.kind.is_word() => entity.tag_key = Some(token.text.clone()),
                other => return Err(Self::unexpected(other, "tag key")),
            }
        }

        if let Some(Token {
            kind: TokenKind::Origin(origin),
            ..
        }) = self.peek()
        {
            entity.origin = Some(*origin);
            self.pos += 1;
        }

        Ok(entity)
    }
}
