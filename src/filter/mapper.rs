//! Mapping of syntax trees onto the wire models
//!
//! The parser produces right-leaning binary chains. For [`TagFilter`] each
//! chain is flattened into one logical group whose elements keep source
//! order; bracketed groups of the same connective are absorbed into the
//! enclosing group. For the legacy [`MatchExpression`] each chain is folded
//! right into nested binary operators.

use super::ast::{
    BracketExpression, ComparisonExpression, FilterExpression, Literal, LogicalAndExpression,
    LogicalOrExpression, PrimaryExpression, UnaryOperationExpression,
};
use super::error::MappingError;
use crate::restapi::{LogicalOperator, MatchExpression, TagFilter};
use std::fmt;

/// A wire model which expressions can be mapped to and rendered from
pub trait ApiModel: Sized + PartialEq + fmt::Debug {
    fn from_expression(expr: &FilterExpression) -> Result<Self, MappingError>;

    /// Canonical expression string of this model
    fn render(&self) -> String;
}

impl ApiModel for TagFilter {
    fn from_expression(expr: &FilterExpression) -> Result<Self, MappingError> {
        to_api_model(expr)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ApiModel for MatchExpression {
    fn from_expression(expr: &FilterExpression) -> Result<Self, MappingError> {
        to_match_expression(expr)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

/// Map a syntax tree onto the flat-group tag filter model
pub fn to_api_model(expr: &FilterExpression) -> Result<TagFilter, MappingError> {
    map_or(&expr.expression)
}

fn map_or(expr: &LogicalOrExpression) -> Result<TagFilter, MappingError> {
    let mut elements = Vec::new();
    for operand in expr.operands() {
        match map_and(operand)? {
            TagFilter::LogicalOr(nested) => elements.extend(nested),
            element => elements.push(element),
        }
    }
    Ok(collapse(elements, TagFilter::LogicalOr))
}

fn map_and(expr: &LogicalAndExpression) -> Result<TagFilter, MappingError> {
    let mut elements = Vec::new();
    for operand in expr.operands() {
        match map_bracket(operand)? {
            TagFilter::LogicalAnd(nested) => elements.extend(nested),
            element => elements.push(element),
        }
    }
    Ok(collapse(elements, TagFilter::LogicalAnd))
}

/// A chain of one operand is the operand itself
fn collapse(mut elements: Vec<TagFilter>, group: fn(Vec<TagFilter>) -> TagFilter) -> TagFilter {
    if elements.len() == 1 {
        elements.remove(0)
    } else {
        group(elements)
    }
}

fn map_bracket(expr: &BracketExpression) -> Result<TagFilter, MappingError> {
    match expr {
        BracketExpression::Primary(primary) => map_primary(primary),
        BracketExpression::Bracket(inner) => map_or(inner),
    }
}

fn map_primary(expr: &PrimaryExpression) -> Result<TagFilter, MappingError> {
    match expr {
        PrimaryExpression::Comparison(comparison) => map_comparison(comparison),
        PrimaryExpression::UnaryOperation(unary) => map_unary(unary),
    }
}

fn map_comparison(expr: &ComparisonExpression) -> Result<TagFilter, MappingError> {
    check_comparison_operator(expr)?;

    let entity = expr.entity.effective_origin();
    let name = expr.entity.identifier.clone();
    let operator = expr.operator;

    if let Some(key) = &expr.entity.tag_key {
        return Ok(TagFilter::tag(
            entity,
            name,
            operator,
            key.as_str(),
            expr.value.to_string_form(),
        ));
    }

    Ok(match &expr.value {
        Literal::String(value) => TagFilter::string(entity, name, operator, value.as_str()),
        Literal::Number(value) => TagFilter::number(entity, name, operator, value.clone()),
        Literal::Boolean(value) => TagFilter::boolean(entity, name, operator, *value),
    })
}

fn map_unary(expr: &UnaryOperationExpression) -> Result<TagFilter, MappingError> {
    check_unary_operator(expr)?;

    Ok(TagFilter::unary(
        expr.entity.effective_origin(),
        expr.entity.identifier.as_str(),
        expr.operator,
    ))
}

fn check_comparison_operator(expr: &ComparisonExpression) -> Result<(), MappingError> {
    if expr.operator.is_unary() {
        return Err(MappingError::NotAComparisonOperator {
            name: expr.entity.identifier.clone(),
            operator: expr.operator,
        });
    }
    Ok(())
}

fn check_unary_operator(expr: &UnaryOperationExpression) -> Result<(), MappingError> {
    if !expr.operator.is_unary() {
        return Err(MappingError::NotAUnaryOperator {
            name: expr.entity.identifier.clone(),
            operator: expr.operator,
        });
    }
    if let Some(key) = &expr.entity.tag_key {
        return Err(MappingError::TagKeyOnUnaryOperator {
            name: expr.entity.identifier.clone(),
            key: key.clone(),
            operator: expr.operator,
        });
    }
    Ok(())
}

/// Map a syntax tree onto the legacy binary match specification model
pub fn to_match_expression(expr: &FilterExpression) -> Result<MatchExpression, MappingError> {
    fold_or(&expr.expression)
}

fn fold_or(expr: &LogicalOrExpression) -> Result<MatchExpression, MappingError> {
    let first = fold_and(&expr.left)?;
    let rest = expr
        .right
        .iter()
        .flat_map(|right| right.operands())
        .map(fold_and)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fold_right(first, rest, LogicalOperator::Or))
}

fn fold_and(expr: &LogicalAndExpression) -> Result<MatchExpression, MappingError> {
    let first = fold_bracket(&expr.left)?;
    let rest = expr
        .right
        .iter()
        .flat_map(|right| right.operands())
        .map(fold_bracket)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fold_right(first, rest, LogicalOperator::And))
}

/// `a, [b, c]` becomes `a op (b op c)`
fn fold_right(
    first: MatchExpression,
    rest: Vec<MatchExpression>,
    conjunction: LogicalOperator,
) -> MatchExpression {
    let tail = rest
        .into_iter()
        .rev()
        .reduce(|right, left| MatchExpression::binary(left, conjunction, right));

    match tail {
        Some(tail) => MatchExpression::binary(first, conjunction, tail),
        None => first,
    }
}

fn fold_bracket(expr: &BracketExpression) -> Result<MatchExpression, MappingError> {
    match expr {
        BracketExpression::Primary(PrimaryExpression::Comparison(comparison)) => {
            check_comparison_operator(comparison)?;
            if let Some(key) = &comparison.entity.tag_key {
                return Err(MappingError::TagKeyNotSupported {
                    name: comparison.entity.identifier.clone(),
                    key: key.clone(),
                });
            }
            Ok(MatchExpression::comparison(
                comparison.entity.identifier.as_str(),
                comparison.entity.effective_origin(),
                comparison.operator,
                comparison.value.to_string_form(),
            ))
        }
        BracketExpression::Primary(PrimaryExpression::UnaryOperation(unary)) => {
            check_unary_operator(unary)?;
            Ok(MatchExpression::unary(
                unary.entity.identifier.as_str(),
                unary.entity.effective_origin(),
                unary.operator,
            ))
        }
        BracketExpression::Bracket(inner) => fold_or(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ast::EntitySpec;
    use crate::restapi::{ExpressionOperator, TagFilterEntity};

    fn is_empty(name: &str) -> BracketExpression {
        BracketExpression::Primary(PrimaryExpression::UnaryOperation(UnaryOperationExpression {
            entity: EntitySpec::new(name).with_origin(TagFilterEntity::Destination),
            operator: ExpressionOperator::IsEmpty,
        }))
    }

    fn expected_is_empty(name: &str) -> TagFilter {
        TagFilter::unary(TagFilterEntity::Destination, name, ExpressionOperator::IsEmpty)
    }

    fn and_chain(operands: Vec<BracketExpression>) -> LogicalAndExpression {
        LogicalAndExpression::chain(operands).unwrap()
    }

    fn or_chain(operands: Vec<LogicalAndExpression>) -> LogicalOrExpression {
        LogicalOrExpression::chain(operands).unwrap()
    }

    #[test]
    fn test_nested_and_chain_is_flattened() {
        let expr = FilterExpression {
            expression: LogicalOrExpression::single(and_chain(vec![
                is_empty("a"),
                is_empty("b"),
                is_empty("c"),
            ])),
        };

        assert_eq!(
            to_api_model(&expr).unwrap(),
            TagFilter::logical_and(vec![
                expected_is_empty("a"),
                expected_is_empty("b"),
                expected_is_empty("c"),
            ])
        );
    }

    #[test]
    fn test_bracketed_or_stays_nested_inside_and() {
        let bracket = BracketExpression::Bracket(Box::new(or_chain(vec![
            LogicalAndExpression::single(is_empty("b")),
            LogicalAndExpression::single(is_empty("c")),
        ])));
        let expr = FilterExpression {
            expression: LogicalOrExpression::single(and_chain(vec![is_empty("a"), bracket])),
        };

        assert_eq!(
            to_api_model(&expr).unwrap(),
            TagFilter::logical_and(vec![
                expected_is_empty("a"),
                TagFilter::logical_or(vec![expected_is_empty("b"), expected_is_empty("c")]),
            ])
        );
    }

    #[test]
    fn test_bracketed_group_of_same_kind_is_absorbed() {
        let bracket = BracketExpression::Bracket(Box::new(LogicalOrExpression::single(
            and_chain(vec![is_empty("b"), is_empty("c")]),
        )));
        let expr = FilterExpression {
            expression: LogicalOrExpression::single(and_chain(vec![is_empty("a"), bracket])),
        };

        assert_eq!(
            to_api_model(&expr).unwrap(),
            TagFilter::logical_and(vec![
                expected_is_empty("a"),
                expected_is_empty("b"),
                expected_is_empty("c"),
            ])
        );
    }

    #[test]
    fn test_hand_built_comparison_with_unary_operator_fails() {
        let expr = FilterExpression::from_primary(PrimaryExpression::Comparison(
            ComparisonExpression {
                entity: EntitySpec::new("a"),
                operator: ExpressionOperator::IsBlank,
                value: Literal::String("x".to_string()),
            },
        ));

        assert!(matches!(
            to_api_model(&expr),
            Err(MappingError::NotAComparisonOperator { .. })
        ));
        assert!(matches!(
            to_match_expression(&expr),
            Err(MappingError::NotAComparisonOperator { .. })
        ));
    }

    #[test]
    fn test_hand_built_unary_with_tag_key_fails() {
        let expr = FilterExpression::from_primary(PrimaryExpression::UnaryOperation(
            UnaryOperationExpression {
                entity: EntitySpec::new("agent.tag").with_tag_key("stage"),
                operator: ExpressionOperator::IsEmpty,
            },
        ));

        assert!(matches!(
            to_api_model(&expr),
            Err(MappingError::TagKeyOnUnaryOperator { .. })
        ));
    }

    #[test]
    fn test_match_expression_folds_chains_to_the_right() {
        let expr = FilterExpression {
            expression: LogicalOrExpression::single(and_chain(vec![
                is_empty("a"),
                is_empty("b"),
                is_empty("c"),
            ])),
        };
        let leaf = |name: &str| {
            MatchExpression::unary(name, TagFilterEntity::Destination, ExpressionOperator::IsEmpty)
        };

        assert_eq!(
            to_match_expression(&expr).unwrap(),
            MatchExpression::binary(
                leaf("a"),
                LogicalOperator::And,
                MatchExpression::binary(leaf("b"), LogicalOperator::And, leaf("c")),
            )
        );
    }

    #[test]
    fn test_match_expression_rejects_tag_keys() {
        let expr = FilterExpression::from_primary(PrimaryExpression::Comparison(
            ComparisonExpression {
                entity: EntitySpec::new("agent.tag").with_tag_key("stage"),
                operator: ExpressionOperator::Equals,
                value: Literal::String("prod".to_string()),
            },
        ));

        assert_eq!(
            to_match_expression(&expr),
            Err(MappingError::TagKeyNotSupported {
                name: "agent.tag".to_string(),
                key: "stage".to_string()
            })
        );
    }
}
