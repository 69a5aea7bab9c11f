//! Error taxonomy shared by every validator, store and handler.
//!
//! A [`ModelError`] carries an [`ErrorKind`], a dotted error code of the form
//! `DataModel.<Object>.<Kind>[.<Qualifier>]`, and free-form details. The kind
//! decides the HTTP status the API layer replies with.

use serde::Serialize;
use thiserror::Error;

/// Classification of a model error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A required parameter is missing or empty.
    NullParameter,
    /// A parameter is present but does not satisfy its rule.
    InvalidParameter,
    /// A string parameter is too long.
    LengthExceeded,
    /// A list parameter has too many entries.
    CountExceeded,
    /// A list contains the same entry twice.
    Duplicated,
    /// Two objects in the same batch share a unique attribute.
    NotUniqueInBatch,
    /// The objective type is not one of the supported types.
    UnsupportObjectiveType,
    /// The referenced object does not exist.
    NotFound,
    /// An object with the same unique attribute already exists.
    Existed,
    /// A marshal/unmarshal round trip failed.
    InternalError,
}

impl ErrorKind {
    /// Returns the code segment used for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NullParameter => "NullParameter",
            Self::InvalidParameter => "InvalidParameter",
            Self::LengthExceeded => "LengthExceeded",
            Self::CountExceeded => "CountExceeded",
            Self::Duplicated => "Duplicated",
            Self::NotUniqueInBatch => "NotUniqueInBatch",
            Self::UnsupportObjectiveType => "UnsupportObjectiveType",
            Self::NotFound => "NotFound",
            Self::Existed => "Existed",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the HTTP status code this kind maps to.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Existed => 403,
            Self::NotFound => 404,
            Self::InternalError => 500,
            _ => 400,
        }
    }

    /// Returns a short human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NullParameter => "A required parameter is empty",
            Self::InvalidParameter => "A parameter is invalid",
            Self::LengthExceeded => "A parameter exceeds its maximum length",
            Self::CountExceeded => "A list exceeds its maximum number of entries",
            Self::Duplicated => "A list contains duplicated entries",
            Self::NotUniqueInBatch => "An attribute is not unique within the batch",
            Self::UnsupportObjectiveType => "The objective type is not supported",
            Self::NotFound => "The object does not exist",
            Self::Existed => "The object already exists",
            Self::InternalError => "Internal error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of object an error code is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectKind {
    /// Trace models.
    TraceModel,
    /// Objective models.
    ObjectiveModel,
    /// Event models (schedule validation only).
    EventModel,
    /// Metric models (schedule validation only).
    MetricModel,
    /// Data views referenced by span and related-log configs.
    DataView,
    /// Data connections referenced by span configs.
    DataConnection,
}

impl ObjectKind {
    /// Returns the code segment used for this object kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TraceModel => "TraceModel",
            Self::ObjectiveModel => "ObjectiveModel",
            Self::EventModel => "EventModel",
            Self::MetricModel => "MetricModel",
            Self::DataView => "DataView",
            Self::DataConnection => "DataConnection",
        }
    }

    /// Returns the lowercase label used in messages and audit events.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TraceModel => "trace model",
            Self::ObjectiveModel => "objective model",
            Self::EventModel => "event model",
            Self::MetricModel => "metric model",
            Self::DataView => "data view",
            Self::DataConnection => "data connection",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Code used when re-serializing a payload fails.
pub const MARSHAL_DATA_FAILED: &str = "DataModel.InternalError.MarshalDataFailed";

/// Code used when a payload cannot be decoded into its target shape.
pub const UNMARSHAL_DATA_FAILED: &str = "DataModel.InternalError.UnmarshalDataFailed";

/// Code used when the request body cannot be bound.
pub const INVALID_REQUEST_BODY: &str = "DataModel.InvalidParameter.RequestBody";

/// A typed, non-retryable validation or lookup failure.
///
/// # Example
///
/// ```
/// use shared::error::{ErrorKind, ModelError, ObjectKind};
///
/// let err = ModelError::new(ErrorKind::InvalidParameter, ObjectKind::ObjectiveModel, "Period")
///     .with_details("period must be greater than zero");
///
/// assert_eq!(err.code, "DataModel.ObjectiveModel.InvalidParameter.Period");
/// assert_eq!(err.http_status(), 400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {details}")]
pub struct ModelError {
    /// The error classification.
    pub kind: ErrorKind,
    /// Dotted error code.
    pub code: String,
    /// Human-readable details; defaults to the kind description.
    pub details: String,
}

impl ModelError {
    /// Creates an error whose code is derived from the object kind, the error
    /// kind and an optional qualifier (pass `""` for none).
    #[must_use]
    pub fn new(kind: ErrorKind, object: ObjectKind, qualifier: &str) -> Self {
        let code = if qualifier.is_empty() {
            format!("DataModel.{object}.{kind}")
        } else {
            format!("DataModel.{object}.{kind}.{qualifier}")
        };
        Self::with_code(kind, code)
    }

    /// Creates an error with an explicit code.
    #[must_use]
    pub fn with_code(kind: ErrorKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            details: kind.description().to_string(),
        }
    }

    /// Replaces the details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    /// Shorthand for a marshal failure.
    #[must_use]
    pub fn marshal(details: impl Into<String>) -> Self {
        Self::with_code(ErrorKind::InternalError, MARSHAL_DATA_FAILED).with_details(details)
    }

    /// Shorthand for an unmarshal failure.
    #[must_use]
    pub fn unmarshal(details: impl Into<String>) -> Self {
        Self::with_code(ErrorKind::InternalError, UNMARSHAL_DATA_FAILED).with_details(details)
    }
}

/// Result alias used across the engine.
pub type ModelResult<T> = Result<T, ModelError>;
