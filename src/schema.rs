//! Hooks used by the resource schema for filter expression attributes
//!
//! Two attributes carry the same expression grammar: `match_specification`
//! (legacy binary tree) and `tag_filter` (flat groups). Exactly one of them is
//! set on a resource. Plan-time hooks never fail: unparsable input is treated
//! as an opaque value.

use crate::filter::{self, FilterError};
use crate::restapi::{MatchExpression, TagFilter};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

pub const FIELD_MATCH_SPECIFICATION: &str = "match_specification";
pub const FIELD_TAG_FILTER: &str = "tag_filter";

/// Attributes of which exactly one must be configured
pub const EXACTLY_ONE_OF: [&str; 2] = [FIELD_MATCH_SPECIFICATION, FIELD_TAG_FILTER];

/// Error reported by [`ExpressionField::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for '{field}': {source}")]
pub struct ValidationError {
    pub field: &'static str,
    #[source]
    pub source: FilterError,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Only one of {} can be set", EXACTLY_ONE_OF.join(", "))]
    ConflictingFields,

    #[error("either match specification or tag filter is required")]
    MissingFilter,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A schema attribute holding a filter expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ExpressionField {
    MatchSpecification,
    #[default]
    TagFilter,
}

impl fmt::Display for ExpressionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ExpressionField {
    pub fn name(&self) -> &'static str {
        match self {
            ExpressionField::MatchSpecification => FIELD_MATCH_SPECIFICATION,
            ExpressionField::TagFilter => FIELD_TAG_FILTER,
        }
    }

    /// Canonical form of `value` under this attribute's wire model
    pub fn normalize(&self, value: &str) -> Result<String, FilterError> {
        match self {
            ExpressionField::MatchSpecification => filter::normalize_as::<MatchExpression>(value),
            ExpressionField::TagFilter => filter::normalize_as::<TagFilter>(value),
        }
    }

    /// Diff suppression: `true` when the change from `old` to `new` is not material
    pub fn diff_suppress(&self, old: &str, new: &str) -> bool {
        match self {
            ExpressionField::MatchSpecification => {
                filter::equivalent_as::<MatchExpression>(old, new)
            }
            ExpressionField::TagFilter => filter::equivalent_as::<TagFilter>(old, new),
        }
    }

    /// State function: the normalized value, or `value` itself when it cannot be parsed
    pub fn state_func(&self, value: &str) -> String {
        self.normalize(value).unwrap_or_else(|err| {
            debug!(field = self.name(), error = %err, "keeping unparsable value in state");
            value.to_string()
        })
    }

    /// Validation: no warnings, and exactly one error when `value` is invalid
    pub fn validate(&self, value: &str) -> (Vec<String>, Vec<ValidationError>) {
        match self.normalize(value) {
            Ok(_) => (Vec::new(), Vec::new()),
            Err(source) => (
                Vec::new(),
                vec![ValidationError {
                    field: self.name(),
                    source,
                }],
            ),
        }
    }
}

/// The entity filter of a resource in whichever generation is configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityFilter {
    MatchSpecification(MatchExpression),
    TagFilter(TagFilter),
}

/// Wire fields carrying the entity filter of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilterPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_specification: Option<MatchExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilter>,
}

impl EntityFilter {
    /// Build the wire model from the configured attributes; empty strings count as unset
    pub fn from_state(
        match_specification: Option<&str>,
        tag_filter: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let match_specification = match_specification.filter(|value| !value.is_empty());
        let tag_filter = tag_filter.filter(|value| !value.is_empty());

        match (match_specification, tag_filter) {
            (Some(_), Some(_)) => Err(SchemaError::ConflictingFields),
            (None, None) => Err(SchemaError::MissingFilter),
            (Some(value), None) => filter::to_model::<MatchExpression>(value)
                .map(EntityFilter::MatchSpecification)
                .map_err(|source| invalid(ExpressionField::MatchSpecification, source)),
            (None, Some(value)) => filter::to_model::<TagFilter>(value)
                .map(EntityFilter::TagFilter)
                .map_err(|source| invalid(ExpressionField::TagFilter, source)),
        }
    }

    /// Take the entity filter from an API payload, preferring the legacy field
    pub fn from_payload(payload: EntityFilterPayload) -> Result<Self, SchemaError> {
        match (payload.match_specification, payload.tag_filter_expression) {
            (Some(expr), _) => Ok(EntityFilter::MatchSpecification(expr)),
            (None, Some(tag_filter)) => Ok(EntityFilter::TagFilter(tag_filter)),
            (None, None) => Err(SchemaError::MissingFilter),
        }
    }

    pub fn field(&self) -> ExpressionField {
        match self {
            EntityFilter::MatchSpecification(_) => ExpressionField::MatchSpecification,
            EntityFilter::TagFilter(_) => ExpressionField::TagFilter,
        }
    }

    pub fn render(&self) -> String {
        match self {
            EntityFilter::MatchSpecification(expr) => filter::render_match_expression(expr),
            EntityFilter::TagFilter(tag_filter) => filter::render(tag_filter),
        }
    }

    /// Attribute name and normalized value to store in state
    pub fn to_state(&self) -> (ExpressionField, String) {
        (self.field(), self.render())
    }

    pub fn to_payload(&self) -> EntityFilterPayload {
        match self {
            EntityFilter::MatchSpecification(expr) => EntityFilterPayload {
                match_specification: Some(expr.clone()),
                tag_filter_expression: None,
            },
            EntityFilter::TagFilter(tag_filter) => EntityFilterPayload {
                match_specification: None,
                tag_filter_expression: Some(tag_filter.clone()),
            },
        }
    }
}

fn invalid(field: ExpressionField, source: FilterError) -> SchemaError {
    SchemaError::Invalid(ValidationError {
        field: field.name(),
        source,
    })
}
