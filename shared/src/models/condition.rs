//! Precondition trees.
//!
//! [`ConditionConfig`] is the wire shape of a condition node as it arrives in
//! a request. [`Condition`] is the typed tree it resolves to once validated:
//! composite nodes hold only children and leaves hold only a field and value.

use serde::{Deserialize, Serialize};

/// Operation literal for logical AND.
pub const OPERATION_AND: &str = "and";
/// Operation literal for logical OR.
pub const OPERATION_OR: &str = "or";
/// Operation literal for equality.
pub const OPERATION_EQ: &str = "==";
/// Operation literal for inequality.
pub const OPERATION_NOT_EQ: &str = "!=";
/// Operation literal for range membership.
pub const OPERATION_RANGE: &str = "range";

/// Operations accepted in a precondition tree.
pub const VALID_PRECONDITION_OPERATIONS: [&str; 5] = [
    OPERATION_AND,
    OPERATION_OR,
    OPERATION_EQ,
    OPERATION_NOT_EQ,
    OPERATION_RANGE,
];

/// Value source literal for a constant value.
pub const VALUE_FROM_CONST: &str = "const";
/// Value source literal for a reference to another field.
pub const VALUE_FROM_FIELD: &str = "field";

/// Value sources accepted by comparison leaves.
pub const VALID_PRECONDITION_VALUE_FROM: [&str; 2] = [VALUE_FROM_CONST, VALUE_FROM_FIELD];

/// Wire shape of a condition node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// The operation of this node.
    #[serde(default)]
    pub operation: String,

    /// The field a leaf compares.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Children of an `and` / `or` node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_conditions: Vec<ConditionConfig>,

    /// Where the leaf value comes from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_from: String,

    /// The leaf value.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub value: serde_json::Value,
}

impl ConditionConfig {
    /// Creates a composite node.
    #[must_use]
    pub fn composite(operation: impl Into<String>, sub_conditions: Vec<Self>) -> Self {
        Self {
            operation: operation.into(),
            sub_conditions,
            ..Self::default()
        }
    }

    /// Creates a leaf node.
    #[must_use]
    pub fn leaf(
        operation: impl Into<String>,
        name: impl Into<String>,
        value_from: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            operation: operation.into(),
            name: name.into(),
            value_from: value_from.into(),
            value,
            ..Self::default()
        }
    }
}

/// The right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// A literal value.
    Const(serde_json::Value),
    /// The name of another field whose value is compared.
    Field(String),
}

/// An equality or inequality leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The field being compared.
    pub field: String,
    /// What it is compared against.
    pub value: ConditionValue,
}

/// A range leaf. Ranges only take constant bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCondition {
    /// The field being tested.
    pub field: String,
    /// The constant range value as provided.
    pub value: serde_json::Value,
}

/// A validated precondition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// All children must hold.
    And(Vec<Condition>),
    /// At least one child must hold.
    Or(Vec<Condition>),
    /// Field equals value.
    Eq(Comparison),
    /// Field does not equal value.
    NotEq(Comparison),
    /// Field lies in a constant range.
    Range(RangeCondition),
}

impl Condition {
    /// Returns the number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => children.iter().map(Self::leaf_count).sum(),
            Self::Eq(_) | Self::NotEq(_) | Self::Range(_) => 1,
        }
    }
}
