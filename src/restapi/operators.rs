use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ModelError;

/// Operators understood by the tag filter and match specification endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpressionOperator {
    Equals,
    NotEqual,
    Contains,
    NotContain,
    StartsWith,
    EndsWith,
    NotStartsWith,
    NotEndsWith,
    GreaterOrEqualThan,
    LessOrEqualThan,
    LessThan,
    GreaterThan,
    IsEmpty,
    NotEmpty,
    IsBlank,
    NotBlank,
}

/// Operators which compare an entity against a literal value
pub const SUPPORTED_COMPARISON_OPERATORS: [ExpressionOperator; 12] = [
    ExpressionOperator::Equals,
    ExpressionOperator::NotEqual,
    ExpressionOperator::Contains,
    ExpressionOperator::NotContain,
    ExpressionOperator::StartsWith,
    ExpressionOperator::EndsWith,
    ExpressionOperator::NotStartsWith,
    ExpressionOperator::NotEndsWith,
    ExpressionOperator::GreaterOrEqualThan,
    ExpressionOperator::LessOrEqualThan,
    ExpressionOperator::LessThan,
    ExpressionOperator::GreaterThan,
];

/// Operators which take no value
pub const SUPPORTED_UNARY_OPERATORS: [ExpressionOperator; 4] = [
    ExpressionOperator::IsEmpty,
    ExpressionOperator::NotEmpty,
    ExpressionOperator::IsBlank,
    ExpressionOperator::NotBlank,
];

impl ExpressionOperator {
    /// The keyword used for this operator both in expressions and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionOperator::Equals => "EQUALS",
            ExpressionOperator::NotEqual => "NOT_EQUAL",
            ExpressionOperator::Contains => "CONTAINS",
            ExpressionOperator::NotContain => "NOT_CONTAIN",
            ExpressionOperator::StartsWith => "STARTS_WITH",
            ExpressionOperator::EndsWith => "ENDS_WITH",
            ExpressionOperator::NotStartsWith => "NOT_STARTS_WITH",
            ExpressionOperator::NotEndsWith => "NOT_ENDS_WITH",
            ExpressionOperator::GreaterOrEqualThan => "GREATER_OR_EQUAL_THAN",
            ExpressionOperator::LessOrEqualThan => "LESS_OR_EQUAL_THAN",
            ExpressionOperator::LessThan => "LESS_THAN",
            ExpressionOperator::GreaterThan => "GREATER_THAN",
            ExpressionOperator::IsEmpty => "IS_EMPTY",
            ExpressionOperator::NotEmpty => "NOT_EMPTY",
            ExpressionOperator::IsBlank => "IS_BLANK",
            ExpressionOperator::NotBlank => "NOT_BLANK",
        }
    }

    pub fn is_unary(&self) -> bool {
        SUPPORTED_UNARY_OPERATORS.contains(self)
    }

    pub fn is_comparison(&self) -> bool {
        !self.is_unary()
    }

    /// Look up an operator keyword, ignoring case
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        SUPPORTED_COMPARISON_OPERATORS
            .iter()
            .chain(SUPPORTED_UNARY_OPERATORS.iter())
            .find(|op| op.as_str().eq_ignore_ascii_case(keyword))
            .copied()
    }
}

impl fmt::Display for ExpressionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpressionOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| ModelError::UnknownOperator(s.to_string()))
    }
}

/// Connective joining the elements of a logical group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a traced call a comparison applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagFilterEntity {
    Source,
    #[default]
    Destination,
    NotApplicable,
}

impl TagFilterEntity {
    /// Suffix used after `@` in expressions
    pub fn origin_key(&self) -> &'static str {
        match self {
            TagFilterEntity::Source => "src",
            TagFilterEntity::Destination => "dest",
            TagFilterEntity::NotApplicable => "na",
        }
    }

    pub fn from_origin_key(key: &str) -> Option<Self> {
        match key {
            "src" => Some(TagFilterEntity::Source),
            "dest" => Some(TagFilterEntity::Destination),
            "na" => Some(TagFilterEntity::NotApplicable),
            _ => None,
        }
    }
}
