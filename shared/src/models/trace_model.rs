//! Trace model definitions.
//!
//! A trace model describes where spans come from and how raw records map onto
//! span attributes. Requests carry the span and related-log configurations as
//! untyped JSON next to a discriminator; [`TraceModel`] holds the typed
//! variants they resolve to.

use super::condition::ConditionConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// Source type literal for data views.
pub const SOURCE_TYPE_DATA_VIEW: &str = "data_view";
/// Source type literal for data connections.
pub const SOURCE_TYPE_DATA_CONNECTION: &str = "data_connection";

/// `enabled_related_log` value meaning the related log is off.
pub const RELATED_LOG_CLOSE: i64 = 0;
/// `enabled_related_log` value meaning the related log is on.
pub const RELATED_LOG_OPEN: i64 = 1;

/// Timestamp encodings accepted for start and end time fields.
pub const VALID_TIME_FORMATS: [&str; 3] = ["unix_millis", "unix_micros", "unix_nanos"];

/// Units accepted for duration fields.
pub const VALID_DURATION_UNITS: [&str; 3] = ["ms", "us", "ns"];

/// Reference to a data view or data connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Identifier of the source.
    #[serde(default)]
    pub id: String,
    /// Name of the source.
    #[serde(default)]
    pub name: String,
}

/// Maps an attribute to a single record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// The record field.
    #[serde(default)]
    pub field_name: String,
}

/// Maps an attribute to the concatenation of several record fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNamesMapping {
    /// The record fields, in order.
    #[serde(default)]
    pub field_names: Vec<String>,
}

/// Maps a timestamp attribute to a record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFieldMapping {
    /// The record field.
    #[serde(default)]
    pub field_name: String,
    /// One of [`VALID_TIME_FORMATS`].
    #[serde(default)]
    pub field_format: String,
}

/// Maps the span duration to a record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationFieldMapping {
    /// The record field.
    #[serde(default)]
    pub field_name: String,
    /// One of [`VALID_DURATION_UNITS`].
    #[serde(default)]
    pub field_unit: String,
}

/// One way of deriving the parent span id, applied when its precondition holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentSpanRule {
    /// Optional precondition gating this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precond: Option<ConditionConfig>,
    /// The record fields forming the parent span id.
    #[serde(default)]
    pub field_names: Vec<String>,
}

/// Field mappings for the span attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicAttributes {
    /// Trace id mapping (required).
    #[serde(default)]
    pub trace_id: FieldMapping,
    /// Span id mapping (required).
    #[serde(default)]
    pub span_id: FieldNamesMapping,
    /// Parent span id rules (required, non-empty).
    #[serde(default)]
    pub parent_span_id: Vec<ParentSpanRule>,
    /// Span name mapping (required).
    #[serde(default)]
    pub name: FieldMapping,
    /// Start time mapping (required).
    #[serde(default)]
    pub start_time: TimeFieldMapping,
    /// End time mapping; exclusive with `duration`.
    #[serde(default)]
    pub end_time: TimeFieldMapping,
    /// Duration mapping; exclusive with `end_time`.
    #[serde(default)]
    pub duration: DurationFieldMapping,
    /// Service name mapping (required).
    #[serde(default)]
    pub service_name: FieldMapping,
    /// Span kind mapping (optional).
    #[serde(default)]
    pub kind: FieldMapping,
    /// Span status mapping (optional).
    #[serde(default)]
    pub status: FieldMapping,
}

/// Span configuration for spans stored in a data view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanConfigWithDataView {
    /// The data view holding the span records.
    #[serde(default)]
    pub data_view: SourceRef,
    /// How record fields map onto span attributes.
    #[serde(default)]
    pub basic_attributes: BasicAttributes,
}

/// Span configuration for spans served by a data connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanConfigWithDataConnection {
    /// The data connection serving the spans.
    #[serde(default)]
    pub data_connection: SourceRef,
}

/// The resolved span configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpanConfig {
    /// `span_source_type = data_view`.
    DataView(SpanConfigWithDataView),
    /// `span_source_type = data_connection`.
    DataConnection(SpanConfigWithDataConnection),
}

impl SpanConfig {
    /// Returns the discriminator value for this variant.
    #[must_use]
    pub const fn source_type(&self) -> &'static str {
        match self {
            Self::DataView(_) => SOURCE_TYPE_DATA_VIEW,
            Self::DataConnection(_) => SOURCE_TYPE_DATA_CONNECTION,
        }
    }

    /// Returns the basic attributes, present only for the data view variant.
    #[must_use]
    pub fn basic_attributes(&self) -> Option<&BasicAttributes> {
        match self {
            Self::DataView(conf) => Some(&conf.basic_attributes),
            Self::DataConnection(_) => None,
        }
    }
}

/// Related-log configuration for logs stored in a data view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLogConfigWithDataView {
    /// The data view holding the logs.
    #[serde(default)]
    pub data_view: SourceRef,
    /// Trace id mapping.
    #[serde(default)]
    pub trace_id: FieldMapping,
    /// Span id mapping.
    #[serde(default)]
    pub span_id: FieldNamesMapping,
}

/// The resolved related-log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelatedLogConfig {
    /// `related_log_source_type = data_view`.
    DataView(RelatedLogConfigWithDataView),
}

/// A trace model as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceModelRequest {
    /// Model id; assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form comment.
    #[serde(default)]
    pub comment: String,
    /// Discriminator for `span_config`.
    #[serde(default)]
    pub span_source_type: String,
    /// Untyped span configuration.
    #[serde(default)]
    pub span_config: serde_json::Value,
    /// `0` (off) or `1` (on).
    #[serde(default)]
    pub enabled_related_log: i64,
    /// Discriminator for `related_log_config`.
    #[serde(default)]
    pub related_log_source_type: String,
    /// Untyped related-log configuration.
    #[serde(default)]
    pub related_log_config: serde_json::Value,
}

/// A resolved trace model.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct TraceModel {
    /// Model id.
    #[validate(length(max = 40, message = "Model id cannot exceed 40 characters"))]
    pub id: String,
    /// Model name.
    #[validate(length(min = 1, max = 128, message = "Model name must be 1 to 128 characters"))]
    pub name: String,
    /// Normalized tags.
    #[validate(length(max = 20, message = "A model cannot carry more than 20 tags"))]
    pub tags: Vec<String>,
    /// Comment.
    #[validate(length(max = 1024, message = "Comment cannot exceed 1024 characters"))]
    pub comment: String,
    /// Discriminator of `span_config`.
    pub span_source_type: String,
    /// Typed span configuration.
    pub span_config: SpanConfig,
    /// `0` (off) or `1` (on).
    pub enabled_related_log: i64,
    /// Discriminator of `related_log_config`; empty when related log is off.
    pub related_log_source_type: String,
    /// Typed related-log configuration; absent when related log is off.
    #[serde(serialize_with = "serialize_related_log_config")]
    pub related_log_config: Option<RelatedLogConfig>,
    /// Creation timestamp.
    pub create_time: DateTime<Utc>,
    /// Last update timestamp.
    pub update_time: DateTime<Utc>,
}

impl TraceModel {
    /// Returns true if the related log is enabled.
    #[must_use]
    pub fn related_log_enabled(&self) -> bool {
        self.enabled_related_log == RELATED_LOG_OPEN
    }

    /// Drops any related-log data so nothing stale is persisted.
    pub fn clear_related_log(&mut self) {
        self.related_log_source_type = String::new();
        self.related_log_config = None;
    }
}

/// Writes an absent related-log config as an empty object.
fn serialize_related_log_config<S>(
    config: &Option<RelatedLogConfig>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match config {
        Some(config) => config.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}
