use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::ModelError;
use super::operators::{ExpressionOperator, LogicalOperator, TagFilterEntity};

/// Node of a `tagFilterExpression`
///
/// Leaves compare one entity attribute; logical groups hold their elements
/// as an ordered flat list. Element order is significant for equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTagFilter", into = "RawTagFilter")]
pub enum TagFilter {
    String {
        entity: TagFilterEntity,
        name: String,
        operator: ExpressionOperator,
        value: String,
    },
    Number {
        entity: TagFilterEntity,
        name: String,
        operator: ExpressionOperator,
        value: Number,
    },
    Boolean {
        entity: TagFilterEntity,
        name: String,
        operator: ExpressionOperator,
        value: bool,
    },
    /// Comparison against the value of a dynamic tag `name:key`
    Tag {
        entity: TagFilterEntity,
        name: String,
        operator: ExpressionOperator,
        key: String,
        value: String,
    },
    Unary {
        entity: TagFilterEntity,
        name: String,
        operator: ExpressionOperator,
    },
    LogicalAnd(Vec<TagFilter>),
    LogicalOr(Vec<TagFilter>),
}

impl TagFilter {
    pub fn string(
        entity: TagFilterEntity,
        name: impl Into<String>,
        operator: ExpressionOperator,
        value: impl Into<String>,
    ) -> Self {
        TagFilter::String {
            entity,
            name: name.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn number(
        entity: TagFilterEntity,
        name: impl Into<String>,
        operator: ExpressionOperator,
        value: impl Into<Number>,
    ) -> Self {
        TagFilter::Number {
            entity,
            name: name.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn boolean(
        entity: TagFilterEntity,
        name: impl Into<String>,
        operator: ExpressionOperator,
        value: bool,
    ) -> Self {
        TagFilter::Boolean {
            entity,
            name: name.into(),
            operator,
            value,
        }
    }

    pub fn tag(
        entity: TagFilterEntity,
        name: impl Into<String>,
        operator: ExpressionOperator,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        TagFilter::Tag {
            entity,
            name: name.into(),
            operator,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn unary(
        entity: TagFilterEntity,
        name: impl Into<String>,
        operator: ExpressionOperator,
    ) -> Self {
        TagFilter::Unary {
            entity,
            name: name.into(),
            operator,
        }
    }

    pub fn logical_and(elements: Vec<TagFilter>) -> Self {
        TagFilter::LogicalAnd(elements)
    }

    pub fn logical_or(elements: Vec<TagFilter>) -> Self {
        TagFilter::LogicalOr(elements)
    }

    /// Connective of a logical group, `None` for leaves
    pub fn logical_operator(&self) -> Option<LogicalOperator> {
        match self {
            TagFilter::LogicalAnd(_) => Some(LogicalOperator::And),
            TagFilter::LogicalOr(_) => Some(LogicalOperator::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum RawKind {
    #[serde(rename = "EXPRESSION")]
    Expression,
    #[serde(rename = "TAG_FILTER")]
    TagFilter,
}

/// Flat JSON representation shared by every node kind
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTagFilter {
    #[serde(rename = "type")]
    kind: RawKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logical_operator: Option<LogicalOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elements: Option<Vec<TagFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity: Option<TagFilterEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operator: Option<ExpressionOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number_value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl RawTagFilter {
    fn group(operator: LogicalOperator, elements: Vec<TagFilter>) -> Self {
        RawTagFilter {
            logical_operator: Some(operator),
            elements: Some(elements),
            ..Self::leaf(RawKind::Expression, None, None, None)
        }
    }

    fn leaf(
        kind: RawKind,
        entity: Option<TagFilterEntity>,
        name: Option<String>,
        operator: Option<ExpressionOperator>,
    ) -> Self {
        RawTagFilter {
            kind,
            logical_operator: None,
            elements: None,
            name,
            entity,
            operator,
            key: None,
            string_value: None,
            number_value: None,
            boolean_value: None,
            value: None,
        }
    }

    fn has_value(&self) -> bool {
        self.key.is_some()
            || self.string_value.is_some()
            || self.number_value.is_some()
            || self.boolean_value.is_some()
            || self.value.is_some()
    }
}

impl From<TagFilter> for RawTagFilter {
    fn from(filter: TagFilter) -> Self {
        match filter {
            TagFilter::LogicalAnd(elements) => RawTagFilter::group(LogicalOperator::And, elements),
            TagFilter::LogicalOr(elements) => RawTagFilter::group(LogicalOperator::Or, elements),
            TagFilter::String {
                entity,
                name,
                operator,
                value,
            } => RawTagFilter {
                string_value: Some(value.clone()),
                value: Some(value),
                ..RawTagFilter::leaf(RawKind::TagFilter, Some(entity), Some(name), Some(operator))
            },
            TagFilter::Number {
                entity,
                name,
                operator,
                value,
            } => RawTagFilter {
                value: Some(value.to_string()),
                number_value: Some(value),
                ..RawTagFilter::leaf(RawKind::TagFilter, Some(entity), Some(name), Some(operator))
            },
            TagFilter::Boolean {
                entity,
                name,
                operator,
                value,
            } => RawTagFilter {
                boolean_value: Some(value),
                value: Some(value.to_string()),
                ..RawTagFilter::leaf(RawKind::TagFilter, Some(entity), Some(name), Some(operator))
            },
            TagFilter::Tag {
                entity,
                name,
                operator,
                key,
                value,
            } => RawTagFilter {
                string_value: Some(format!("{key}={value}")),
                key: Some(key),
                value: Some(value),
                ..RawTagFilter::leaf(RawKind::TagFilter, Some(entity), Some(name), Some(operator))
            },
            TagFilter::Unary {
                entity,
                name,
                operator,
            } => RawTagFilter::leaf(RawKind::TagFilter, Some(entity), Some(name), Some(operator)),
        }
    }
}

impl TryFrom<RawTagFilter> for TagFilter {
    type Error = ModelError;

    fn try_from(raw: RawTagFilter) -> Result<Self, Self::Error> {
        if raw.kind == RawKind::Expression {
            let operator = raw.logical_operator.ok_or(ModelError::MissingField {
                node: "EXPRESSION",
                field: "logicalOperator",
            })?;
            let elements = raw
                .elements
                .filter(|elements| !elements.is_empty())
                .ok_or(ModelError::EmptyGroup { operator })?;
            return Ok(match operator {
                LogicalOperator::And => TagFilter::LogicalAnd(elements),
                LogicalOperator::Or => TagFilter::LogicalOr(elements),
            });
        }

        let name = raw.name.clone().ok_or(ModelError::MissingField {
            node: "TAG_FILTER",
            field: "name",
        })?;
        let operator = raw.operator.ok_or(ModelError::MissingField {
            node: "TAG_FILTER",
            field: "operator",
        })?;
        let entity = raw.entity.unwrap_or_default();

        if operator.is_unary() {
            if raw.has_value() {
                return Err(ModelError::UnexpectedValue { name, operator });
            }
            return Ok(TagFilter::Unary {
                entity,
                name,
                operator,
            });
        }

        if let Some(key) = raw.key {
            // older payloads only carry the combined "key=value" form
            let value = raw
                .value
                .or_else(|| {
                    raw.string_value.as_deref().map(|combined| {
                        combined
                            .strip_prefix(key.as_str())
                            .and_then(|rest| rest.strip_prefix('='))
                            .unwrap_or(combined)
                            .to_string()
                    })
                })
                .ok_or_else(|| ModelError::MissingValue {
                    name: name.clone(),
                    operator,
                })?;
            return Ok(TagFilter::Tag {
                entity,
                name,
                operator,
                key,
                value,
            });
        }

        if let Some(value) = raw.string_value {
            Ok(TagFilter::String {
                entity,
                name,
                operator,
                value,
            })
        } else if let Some(value) = raw.number_value {
            Ok(TagFilter::Number {
                entity,
                name,
                operator,
                value,
            })
        } else if let Some(value) = raw.boolean_value {
            Ok(TagFilter::Boolean {
                entity,
                name,
                operator,
                value,
            })
        } else if let Some(value) = raw.value {
            Ok(TagFilter::String {
                entity,
                name,
                operator,
                value,
            })
        } else {
            Err(ModelError::MissingValue { name, operator })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_leaf_serializes_typed_and_generic_value() {
        let filter = TagFilter::string(
            TagFilterEntity::Destination,
            "entity.name",
            ExpressionOperator::Contains,
            "foo",
        );

        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "type": "TAG_FILTER",
                "name": "entity.name",
                "entity": "DESTINATION",
                "operator": "CONTAINS",
                "stringValue": "foo",
                "value": "foo"
            })
        );
    }

    #[test]
    fn test_number_and_boolean_leaves_carry_string_form() {
        let number = TagFilter::number(
            TagFilterEntity::Source,
            "call.http.status",
            ExpressionOperator::GreaterThan,
            499,
        );
        let boolean = TagFilter::boolean(
            TagFilterEntity::Destination,
            "call.erroneous",
            ExpressionOperator::Equals,
            true,
        );

        let number_json = serde_json::to_value(&number).unwrap();
        assert_eq!(number_json["numberValue"], json!(499));
        assert_eq!(number_json["value"], json!("499"));

        let boolean_json = serde_json::to_value(&boolean).unwrap();
        assert_eq!(boolean_json["booleanValue"], json!(true));
        assert_eq!(boolean_json["value"], json!("true"));
    }

    #[test]
    fn test_tag_leaf_carries_key_and_combined_string_value() {
        let filter = TagFilter::tag(
            TagFilterEntity::Destination,
            "agent.tag",
            ExpressionOperator::Equals,
            "stage",
            "prod",
        );
        let value = serde_json::to_value(&filter).unwrap();

        assert_eq!(value["key"], json!("stage"));
        assert_eq!(value["value"], json!("prod"));
        assert_eq!(value["stringValue"], json!("stage=prod"));
        assert_eq!(serde_json::from_value::<TagFilter>(value).unwrap(), filter);
    }

    #[test]
    fn test_unary_leaf_has_no_value() {
        let filter = TagFilter::unary(
            TagFilterEntity::Destination,
            "entity.name",
            ExpressionOperator::IsEmpty,
        );
        let value = serde_json::to_value(&filter).unwrap();

        assert!(value.get("value").is_none());
        assert!(value.get("stringValue").is_none());
    }

    #[test]
    fn test_group_serializes_elements_in_order() {
        let first = TagFilter::unary(
            TagFilterEntity::Destination,
            "a",
            ExpressionOperator::NotBlank,
        );
        let second = TagFilter::unary(TagFilterEntity::Source, "b", ExpressionOperator::IsBlank);
        let group = TagFilter::logical_or(vec![first, second]);

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["type"], json!("EXPRESSION"));
        assert_eq!(value["logicalOperator"], json!("OR"));
        assert_eq!(value["elements"][0]["name"], json!("a"));
        assert_eq!(value["elements"][1]["name"], json!("b"));
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_decoding_rejects_unknown_operator() {
        let payload = json!({
            "type": "TAG_FILTER",
            "name": "entity.name",
            "entity": "DESTINATION",
            "operator": "INVALID",
            "stringValue": "foo",
            "value": "foo"
        });

        assert!(serde_json::from_value::<TagFilter>(payload).is_err());
    }

    #[test]
    fn test_decoding_rejects_comparison_without_value() {
        let payload = json!({
            "type": "TAG_FILTER",
            "name": "entity.name",
            "entity": "DESTINATION",
            "operator": "EQUALS"
        });

        let err = serde_json::from_value::<TagFilter>(payload).unwrap_err();
        assert!(err.to_string().contains("carries no value"), "{err}");
    }

    #[test]
    fn test_decoding_unary_operator_yields_unary_leaf() {
        let payload = json!({
            "type": "TAG_FILTER",
            "name": "entity.name",
            "entity": "SOURCE",
            "operator": "NOT_EMPTY"
        });

        assert_eq!(
            serde_json::from_value::<TagFilter>(payload).unwrap(),
            TagFilter::unary(
                TagFilterEntity::Source,
                "entity.name",
                ExpressionOperator::NotEmpty
            )
        );
    }

    #[test]
    fn test_decoding_rejects_groups_without_elements() {
        for payload in [
            json!({ "type": "EXPRESSION", "logicalOperator": "AND", "elements": [] }),
            json!({ "type": "EXPRESSION", "logicalOperator": "OR" }),
        ] {
            let err = serde_json::from_value::<TagFilter>(payload).unwrap_err();
            assert!(err.to_string().contains("group has no elements"), "{err}");
        }
    }

    #[test]
    fn test_decoding_rejects_nested_empty_group() {
        let payload = json!({
            "type": "EXPRESSION",
            "logicalOperator": "AND",
            "elements": [
                { "type": "TAG_FILTER", "name": "a", "entity": "DESTINATION", "operator": "IS_EMPTY" },
                { "type": "EXPRESSION", "logicalOperator": "OR", "elements": [] }
            ]
        });

        assert!(serde_json::from_value::<TagFilter>(payload).is_err());
    }

    #[test]
    fn test_decoding_group_requires_logical_operator() {
        let payload = json!({ "type": "EXPRESSION", "elements": [] });

        assert!(serde_json::from_value::<TagFilter>(payload).is_err());
    }
}
