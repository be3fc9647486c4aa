use serde::{Deserialize, Serialize};

use super::operators::{ExpressionOperator, LogicalOperator, TagFilterEntity};

/// Node of a legacy `matchSpecification`
///
/// Unlike [`super::TagFilter`] every logical node joins exactly two operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchExpression {
    #[serde(rename = "BINARY_OP")]
    BinaryOperator {
        left: Box<MatchExpression>,
        conjunction: LogicalOperator,
        right: Box<MatchExpression>,
    },
    #[serde(rename = "LEAF")]
    Leaf {
        key: String,
        #[serde(default)]
        entity: TagFilterEntity,
        operator: ExpressionOperator,
        /// Absent for unary operators
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl MatchExpression {
    pub fn binary(left: MatchExpression, conjunction: LogicalOperator, right: MatchExpression) -> Self {
        MatchExpression::BinaryOperator {
            left: Box::new(left),
            conjunction,
            right: Box::new(right),
        }
    }

    pub fn comparison(
        key: impl Into<String>,
        entity: TagFilterEntity,
        operator: ExpressionOperator,
        value: impl Into<String>,
    ) -> Self {
        MatchExpression::Leaf {
            key: key.into(),
            entity,
            operator,
            value: Some(value.into()),
        }
    }

    pub fn unary(key: impl Into<String>, entity: TagFilterEntity, operator: ExpressionOperator) -> Self {
        MatchExpression::Leaf {
            key: key.into(),
            entity,
            operator,
            value: None,
        }
    }

    pub fn conjunction(&self) -> Option<LogicalOperator> {
        match self {
            MatchExpression::BinaryOperator { conjunction, .. } => Some(*conjunction),
            MatchExpression::Leaf { .. } => None,
        }
    }
}
