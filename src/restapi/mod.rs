//! Wire model of the monitoring platform's REST API
//!
//! Two generations of entity filters exist side by side:
//!
//! - [`TagFilter`]: the current `tagFilterExpression` shape where logical
//!   groups hold a flat list of elements.
//! - [`MatchExpression`]: the legacy `matchSpecification` shape, a binary
//!   tree of `BINARY_OP` and `LEAF` nodes.

pub mod match_expression;
pub mod operators;
pub mod tag_filter;

pub use match_expression::MatchExpression;
pub use operators::{
    ExpressionOperator, LogicalOperator, SUPPORTED_COMPARISON_OPERATORS,
    SUPPORTED_UNARY_OPERATORS, TagFilterEntity,
};
pub use tag_filter::TagFilter;

use thiserror::Error;

/// Errors raised while decoding wire payloads
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown expression operator: '{0}'")]
    UnknownOperator(String),

    #[error("Missing field '{field}' in {node} node")]
    MissingField {
        node: &'static str,
        field: &'static str,
    },

    #[error("Tag filter '{name}' uses comparison operator {operator} but carries no value")]
    MissingValue {
        name: String,
        operator: ExpressionOperator,
    },

    #[error("{operator} group has no elements")]
    EmptyGroup { operator: LogicalOperator },

    #[error("Tag filter '{name}' uses unary operator {operator} but carries a value")]
    UnexpectedValue {
        name: String,
        operator: ExpressionOperator,
    },
}
