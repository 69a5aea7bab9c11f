//! Discriminated configuration resolution.
//!
//! Polymorphic blocks arrive as untyped JSON next to a discriminator field.
//! Resolution re-encodes the untyped value and decodes it into the variant
//! the discriminator selects. The untyped value is not kept.

use crate::error::{ErrorKind, ModelError, ModelResult, ObjectKind};
use crate::models::trace_model::{
    RelatedLogConfig, RelatedLogConfigWithDataView, SpanConfig, SpanConfigWithDataConnection,
    SpanConfigWithDataView, SOURCE_TYPE_DATA_CONNECTION, SOURCE_TYPE_DATA_VIEW,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Failure of a re-encode round trip.
#[derive(Debug, Error)]
pub enum ReencodeError {
    /// The source value could not be serialized.
    #[error("marshal failed: {0}")]
    Marshal(#[source] serde_json::Error),

    /// The bytes do not have the target shape.
    #[error("unmarshal failed: {0}")]
    Unmarshal(#[source] serde_json::Error),
}

impl From<ReencodeError> for ModelError {
    fn from(err: ReencodeError) -> Self {
        match err {
            ReencodeError::Marshal(e) => Self::marshal(e.to_string()),
            ReencodeError::Unmarshal(e) => Self::unmarshal(e.to_string()),
        }
    }
}

/// Serializes `raw` and decodes the bytes as `T`.
///
/// A JSON `null` decodes like an empty object, so a missing block yields a
/// variant with default fields and the field validators report what is
/// missing.
///
/// # Errors
///
/// Returns [`ReencodeError::Marshal`] if `raw` cannot be serialized and
/// [`ReencodeError::Unmarshal`] if the bytes do not match `T`.
pub fn reencode<S, T>(raw: &S) -> Result<T, ReencodeError>
where
    S: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let mut bytes = serde_json::to_vec(raw).map_err(ReencodeError::Marshal)?;
    if bytes == b"null" {
        bytes = b"{}".to_vec();
    }
    serde_json::from_slice(&bytes).map_err(ReencodeError::Unmarshal)
}

/// Resolves a span configuration by `span_source_type`.
///
/// # Errors
///
/// `InvalidParameter.SpanSourceType` for an unknown discriminator, otherwise
/// an internal marshal/unmarshal error.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use shared::models::SpanConfig;
/// use shared::validation::resolver::resolve_span_config;
///
/// let raw = json!({"data_connection": {"id": "dc-1", "name": "apm"}});
/// let config = resolve_span_config(&raw, "data_connection").unwrap();
/// assert!(matches!(config, SpanConfig::DataConnection(_)));
/// assert!(config.basic_attributes().is_none());
/// ```
pub fn resolve_span_config(raw: &serde_json::Value, source_type: &str) -> ModelResult<SpanConfig> {
    match source_type {
        SOURCE_TYPE_DATA_VIEW => Ok(SpanConfig::DataView(
            reencode::<_, SpanConfigWithDataView>(raw)?,
        )),
        SOURCE_TYPE_DATA_CONNECTION => Ok(SpanConfig::DataConnection(reencode::<
            _,
            SpanConfigWithDataConnection,
        >(raw)?)),
        other => Err(ModelError::new(
            ErrorKind::InvalidParameter,
            ObjectKind::TraceModel,
            "SpanSourceType",
        )
        .with_details(format!(
            "Span source type must be {SOURCE_TYPE_DATA_VIEW} or {SOURCE_TYPE_DATA_CONNECTION}, actual is {other:?}"
        ))),
    }
}

/// Resolves a related-log configuration by `related_log_source_type`.
///
/// # Errors
///
/// `InvalidParameter.RelatedLogSourceType` for an unknown discriminator,
/// otherwise an internal marshal/unmarshal error.
pub fn resolve_related_log_config(
    raw: &serde_json::Value,
    source_type: &str,
) -> ModelResult<RelatedLogConfig> {
    match source_type {
        SOURCE_TYPE_DATA_VIEW => Ok(RelatedLogConfig::DataView(reencode::<
            _,
            RelatedLogConfigWithDataView,
        >(raw)?)),
        other => Err(ModelError::new(
            ErrorKind::InvalidParameter,
            ObjectKind::TraceModel,
            "RelatedLogSourceType",
        )
        .with_details(format!(
            "Related log source type must be {SOURCE_TYPE_DATA_VIEW}, actual is {other:?}"
        ))),
    }
}
