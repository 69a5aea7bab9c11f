//! Audit events for mutating model operations.

use shared::error::{ModelError, ObjectKind};
use tracing::{info, warn};

/// Operation recorded in an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Model creation.
    Create,
    /// Model update.
    Update,
    /// Model deletion.
    Delete,
}

impl Operation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Emits one audit event per object.
pub fn record(
    operation: Operation,
    object: ObjectKind,
    object_id: &str,
    object_name: &str,
    outcome: Result<(), &ModelError>,
) {
    match outcome {
        Ok(()) => info!(
            target: "audit",
            operation = operation.as_str(),
            object_type = object.label(),
            object_id,
            object_name,
            outcome = "success",
            "Model operation audit"
        ),
        Err(err) => warn!(
            target: "audit",
            operation = operation.as_str(),
            object_type = object.label(),
            object_id,
            object_name,
            outcome = "failure",
            error_code = %err.code,
            "Model operation audit"
        ),
    }
}
