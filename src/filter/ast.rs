//! Syntax tree produced by the parser
//!
//! Logical chains are right-leaning: `a AND b AND c` becomes
//! `And { left: a, right: Some(And { left: b, right: Some(And { left: c }) }) }`.
//! The connective of a chain is implied by the node type.

use crate::restapi::{ExpressionOperator, TagFilterEntity};
use serde_json::Number;

/// Root of a parsed expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    pub expression: LogicalOrExpression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalOrExpression {
    pub left: LogicalAndExpression,
    pub right: Option<Box<LogicalOrExpression>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalAndExpression {
    pub left: BracketExpression,
    pub right: Option<Box<LogicalAndExpression>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketExpression {
    Primary(PrimaryExpression),
    Bracket(Box<LogicalOrExpression>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryExpression {
    Comparison(ComparisonExpression),
    UnaryOperation(UnaryOperationExpression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonExpression {
    pub entity: EntitySpec,
    pub operator: ExpressionOperator,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryOperationExpression {
    pub entity: EntitySpec,
    pub operator: ExpressionOperator,
}

/// The attribute a comparison addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpec {
    pub identifier: String,
    /// Only set for tag lookups (`agent.tag:stage`)
    pub tag_key: Option<String>,
    /// `None` when the expression omits the suffix
    pub origin: Option<TagFilterEntity>,
}

impl EntitySpec {
    pub fn new(identifier: impl Into<String>) -> Self {
        EntitySpec {
            identifier: identifier.into(),
            tag_key: None,
            origin: None,
        }
    }

    pub fn with_tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = Some(key.into());
        self
    }

    pub fn with_origin(mut self, origin: TagFilterEntity) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Origin with the destination default applied
    pub fn effective_origin(&self) -> TagFilterEntity {
        self.origin.unwrap_or_default()
    }
}

/// Literal operand of a comparison; its type follows the literal syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(String),
    Number(Number),
    Boolean(bool),
}

impl Literal {
    /// String form used where the wire model only carries strings
    pub fn to_string_form(&self) -> String {
        match self {
            Literal::String(value) => value.clone(),
            Literal::Number(value) => value.to_string(),
            Literal::Boolean(value) => value.to_string(),
        }
    }
}

impl FilterExpression {
    /// Wrap a single primary expression into a complete tree
    pub fn from_primary(primary: PrimaryExpression) -> Self {
        FilterExpression {
            expression: LogicalOrExpression::single(LogicalAndExpression::single(
                BracketExpression::Primary(primary),
            )),
        }
    }
}

impl LogicalOrExpression {
    pub fn single(left: LogicalAndExpression) -> Self {
        LogicalOrExpression { left, right: None }
    }

    /// Build a right-leaning chain from operands in source order
    pub fn chain(operands: Vec<LogicalAndExpression>) -> Option<Self> {
        operands.into_iter().rev().fold(None, |right, left| {
            Some(LogicalOrExpression {
                left,
                right: right.map(Box::new),
            })
        })
    }

    /// Operands of the chain in source order
    pub fn operands(&self) -> impl Iterator<Item = &LogicalAndExpression> {
        std::iter::successors(Some(self), |node| node.right.as_deref()).map(|node| &node.left)
    }
}

impl LogicalAndExpression {
    pub fn single(left: BracketExpression) -> Self {
        LogicalAndExpression { left, right: None }
    }

    pub fn chain(operands: Vec<BracketExpression>) -> Option<Self> {
        operands.into_iter().rev().fold(None, |right, left| {
            Some(LogicalAndExpression {
                left,
                right: right.map(Box::new),
            })
        })
    }

    pub fn operands(&self) -> impl Iterator<Item = &BracketExpression> {
        std::iter::successors(Some(self), |node| node.right.as_deref()).map(|node| &node.left)
    }
}
