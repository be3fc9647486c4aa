//! Canonical text form of the wire models
//!
//! Origins are always written out, string values are single-quoted and
//! operators upper case. A nested group is bracketed when it is an OR group
//! inside an AND group. In the legacy binary tree a left operand joined by
//! the same conjunction is bracketed too, since re-parsing nests to the right.

use crate::restapi::{LogicalOperator, MatchExpression, TagFilter, TagFilterEntity};
use std::fmt;

/// Render a tag filter to its canonical expression string
pub fn render(filter: &TagFilter) -> String {
    filter.to_string()
}

/// Render a legacy match specification to its canonical expression string
pub fn render_match_expression(expr: &MatchExpression) -> String {
    expr.to_string()
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFilter::String {
                entity,
                name,
                operator,
                value,
            } => {
                write_entity(f, name, None, *entity)?;
                write!(f, " {operator} ")?;
                write_quoted(f, value)
            }
            TagFilter::Number {
                entity,
                name,
                operator,
                value,
            } => {
                write_entity(f, name, None, *entity)?;
                write!(f, " {operator} {value}")
            }
            TagFilter::Boolean {
                entity,
                name,
                operator,
                value,
            } => {
                write_entity(f, name, None, *entity)?;
                write!(f, " {operator} {value}")
            }
            TagFilter::Tag {
                entity,
                name,
                operator,
                key,
                value,
            } => {
                write_entity(f, name, Some(key.as_str()), *entity)?;
                write!(f, " {operator} ")?;
                write_quoted(f, value)
            }
            TagFilter::Unary {
                entity,
                name,
                operator,
            } => {
                write_entity(f, name, None, *entity)?;
                write!(f, " {operator}")
            }
            TagFilter::LogicalAnd(elements) => write_group(
                f,
                LogicalOperator::And,
                elements.iter(),
                TagFilter::logical_operator,
            ),
            TagFilter::LogicalOr(elements) => write_group(
                f,
                LogicalOperator::Or,
                elements.iter(),
                TagFilter::logical_operator,
            ),
        }
    }
}

impl fmt::Display for MatchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchExpression::BinaryOperator {
                left,
                conjunction,
                right,
            } => {
                let left_bracketed = needs_brackets(*conjunction, left.conjunction())
                    || left.conjunction() == Some(*conjunction);
                write_operand(f, left.as_ref(), left_bracketed)?;
                write!(f, " {conjunction} ")?;
                write_operand(f, right.as_ref(), needs_brackets(*conjunction, right.conjunction()))
            }
            MatchExpression::Leaf {
                key,
                entity,
                operator,
                value,
            } => {
                write_entity(f, key, None, *entity)?;
                write!(f, " {operator}")?;
                match value {
                    Some(value) => {
                        f.write_str(" ")?;
                        write_quoted(f, value)
                    }
                    None => Ok(()),
                }
            }
        }
    }
}

fn write_group<'a, T>(
    f: &mut fmt::Formatter<'_>,
    operator: LogicalOperator,
    elements: impl Iterator<Item = &'a T>,
    kind: fn(&T) -> Option<LogicalOperator>,
) -> fmt::Result
where
    T: fmt::Display + 'a,
{
    for (index, element) in elements.enumerate() {
        if index > 0 {
            write!(f, " {operator} ")?;
        }
        write_operand(f, element, needs_brackets(operator, kind(element)))?;
    }
    Ok(())
}

fn write_operand<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    element: &T,
    bracketed: bool,
) -> fmt::Result {
    if bracketed {
        write!(f, "({element})")
    } else {
        write!(f, "{element}")
    }
}

fn needs_brackets(parent: LogicalOperator, child: Option<LogicalOperator>) -> bool {
    parent == LogicalOperator::And && child == Some(LogicalOperator::Or)
}

fn write_entity(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    tag_key: Option<&str>,
    entity: TagFilterEntity,
) -> fmt::Result {
    f.write_str(name)?;
    if let Some(key) = tag_key {
        write!(f, ":{key}")?;
    }
    write!(f, "@{}", entity.origin_key())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("'")
}
