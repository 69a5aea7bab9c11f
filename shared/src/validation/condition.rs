//! Precondition tree validation.
//!
//! Validation resolves a [`ConditionConfig`] into a typed [`Condition`] by
//! structural recursion. The first failing node aborts the walk.

use crate::models::condition::{
    Comparison, Condition, ConditionConfig, ConditionValue, RangeCondition, OPERATION_AND,
    OPERATION_EQ, OPERATION_NOT_EQ, OPERATION_OR, OPERATION_RANGE, VALID_PRECONDITION_OPERATIONS,
    VALID_PRECONDITION_VALUE_FROM, VALUE_FROM_CONST, VALUE_FROM_FIELD,
};
use thiserror::Error;

/// Errors raised while validating a precondition tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    /// A leaf has no field name.
    #[error("name is empty")]
    EmptyName,

    /// A range leaf is not constant-sourced.
    #[error("invalid value_from, valid value_from is {VALUE_FROM_CONST}")]
    RangeValueFrom,

    /// A comparison leaf has an unknown value source.
    #[error("invalid value_from, valid value_from is in {VALID_PRECONDITION_VALUE_FROM:?}")]
    InvalidValueFrom,

    /// A field-sourced comparison has no field name as its value.
    #[error("value_from is field, but value is invalid")]
    InvalidFieldValue,

    /// The operation is not supported.
    #[error("invalid operation, valid operation is in {VALID_PRECONDITION_OPERATIONS:?}")]
    InvalidOperation(String),
}

/// Resolves a condition node into a typed tree.
///
/// Composite nodes with no children are accepted.
///
/// # Errors
///
/// Returns the first [`ConditionError`] found in depth-first order.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use shared::models::{Condition, ConditionConfig};
/// use shared::validation::condition::parse_condition;
///
/// let cfg = ConditionConfig::leaf("==", "kind", "const", json!("server"));
/// assert!(matches!(parse_condition(&cfg), Ok(Condition::Eq(_))));
/// ```
pub fn parse_condition(cfg: &ConditionConfig) -> Result<Condition, ConditionError> {
    match cfg.operation.as_str() {
        OPERATION_AND => parse_children(&cfg.sub_conditions).map(Condition::And),
        OPERATION_OR => parse_children(&cfg.sub_conditions).map(Condition::Or),
        OPERATION_RANGE => {
            if cfg.name.is_empty() {
                return Err(ConditionError::EmptyName);
            }
            if cfg.value_from != VALUE_FROM_CONST {
                return Err(ConditionError::RangeValueFrom);
            }
            Ok(Condition::Range(RangeCondition {
                field: cfg.name.clone(),
                value: cfg.value.clone(),
            }))
        }
        OPERATION_EQ | OPERATION_NOT_EQ => {
            let comparison = parse_comparison(cfg)?;
            if cfg.operation == OPERATION_EQ {
                Ok(Condition::Eq(comparison))
            } else {
                Ok(Condition::NotEq(comparison))
            }
        }
        other => Err(ConditionError::InvalidOperation(other.to_string())),
    }
}

/// Validates an optional precondition. An absent precondition is valid.
///
/// # Errors
///
/// Returns a [`ConditionError`] if the tree is present and invalid.
pub fn validate_precondition(
    cfg: Option<&ConditionConfig>,
) -> Result<Option<Condition>, ConditionError> {
    cfg.map(parse_condition).transpose()
}

fn parse_children(children: &[ConditionConfig]) -> Result<Vec<Condition>, ConditionError> {
    children.iter().map(parse_condition).collect()
}

fn parse_comparison(cfg: &ConditionConfig) -> Result<Comparison, ConditionError> {
    if cfg.name.is_empty() {
        return Err(ConditionError::EmptyName);
    }

    let value = match cfg.value_from.as_str() {
        VALUE_FROM_CONST => ConditionValue::Const(cfg.value.clone()),
        VALUE_FROM_FIELD => match cfg.value.as_str() {
            Some(field) if !field.is_empty() => ConditionValue::Field(field.to_string()),
            _ => return Err(ConditionError::InvalidFieldValue),
        },
        _ => return Err(ConditionError::InvalidValueFrom),
    };

    Ok(Comparison {
        field: cfg.name.clone(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eq(name: &str, value_from: &str, value: serde_json::Value) -> ConditionConfig {
        ConditionConfig::leaf(OPERATION_EQ, name, value_from, value)
    }

    #[test]
    fn test_absent_precondition_is_valid() {
        assert_eq!(validate_precondition(None), Ok(None));
    }

    #[test]
    fn test_empty_composite_is_accepted() {
        // Pins the permissive behaviour: an `and`/`or` with no children passes.
        let and = ConditionConfig::composite(OPERATION_AND, vec![]);
        assert_eq!(parse_condition(&and), Ok(Condition::And(vec![])));

        let or = ConditionConfig::composite(OPERATION_OR, vec![]);
        assert_eq!(parse_condition(&or), Ok(Condition::Or(vec![])));
    }

    #[test]
    fn test_nested_tree_resolves() {
        let cfg = ConditionConfig::composite(
            OPERATION_OR,
            vec![
                eq("kind", VALUE_FROM_CONST, json!("server")),
                ConditionConfig::composite(
                    OPERATION_AND,
                    vec![
                        ConditionConfig::leaf(OPERATION_NOT_EQ, "a", VALUE_FROM_FIELD, json!("b")),
                        ConditionConfig::leaf(
                            OPERATION_RANGE,
                            "latency",
                            VALUE_FROM_CONST,
                            json!([0, 100]),
                        ),
                    ],
                ),
            ],
        );

        let tree = parse_condition(&cfg).unwrap();
        assert_eq!(tree.leaf_count(), 3);
        let Condition::Or(children) = tree else {
            panic!("expected an or node");
        };
        let Condition::And(inner) = &children[1] else {
            panic!("expected an and node");
        };
        assert_eq!(
            inner[0],
            Condition::NotEq(Comparison {
                field: "a".to_string(),
                value: ConditionValue::Field("b".to_string()),
            })
        );
    }

    #[test]
    fn test_first_failing_child_short_circuits() {
        let cfg = ConditionConfig::composite(
            OPERATION_AND,
            vec![
                eq("", VALUE_FROM_CONST, json!(1)),
                ConditionConfig::leaf("like", "x", VALUE_FROM_CONST, json!(1)),
            ],
        );
        assert_eq!(parse_condition(&cfg), Err(ConditionError::EmptyName));
    }

    #[test]
    fn test_range_requires_name_and_const() {
        let no_name = ConditionConfig::leaf(OPERATION_RANGE, "", VALUE_FROM_CONST, json!([1, 2]));
        assert_eq!(parse_condition(&no_name), Err(ConditionError::EmptyName));

        let field = ConditionConfig::leaf(OPERATION_RANGE, "x", VALUE_FROM_FIELD, json!("y"));
        assert_eq!(parse_condition(&field), Err(ConditionError::RangeValueFrom));
    }

    #[test]
    fn test_comparison_value_from_must_be_supported() {
        let cfg = eq("x", "user", json!(1));
        assert_eq!(parse_condition(&cfg), Err(ConditionError::InvalidValueFrom));

        let cfg = eq("x", "", json!(1));
        assert_eq!(parse_condition(&cfg), Err(ConditionError::InvalidValueFrom));
    }

    #[test]
    fn test_field_sourced_value_must_be_non_empty_string() {
        for bad in [json!(""), json!(1), json!(null), json!(["a"]), json!({"a": 1}), json!(true)] {
            let cfg = eq("x", VALUE_FROM_FIELD, bad.clone());
            assert_eq!(
                parse_condition(&cfg),
                Err(ConditionError::InvalidFieldValue),
                "value {bad} should be rejected"
            );
        }

        let ok = eq("x", VALUE_FROM_FIELD, json!("y"));
        assert!(parse_condition(&ok).is_ok());
    }

    #[test]
    fn test_const_sourced_value_accepts_any_scalar() {
        for value in [json!(""), json!(0), json!(null), json!(false)] {
            assert!(parse_condition(&eq("x", VALUE_FROM_CONST, value)).is_ok());
        }
    }

    #[test]
    fn test_unknown_operation_lists_supported_set() {
        let cfg = ConditionConfig::leaf("in", "x", VALUE_FROM_CONST, json!([1]));
        let err = parse_condition(&cfg).unwrap_err();
        assert_eq!(err, ConditionError::InvalidOperation("in".to_string()));
        assert!(err.to_string().contains("range"));
    }
}
