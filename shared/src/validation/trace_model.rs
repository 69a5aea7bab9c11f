//! Whole-model validation for trace models.
//!
//! A request is first resolved into a typed [`TraceModel`], then validated
//! field by field. Batch name uniqueness is checked separately because it
//! needs the names already persisted.

use super::common::{validate_comment, validate_model_id, validate_object_name, validate_tags};
use super::resolver::{resolve_related_log_config, resolve_span_config};
use super::span::{validate_related_log_config, validate_span_config};
use crate::error::{ErrorKind, ModelError, ModelResult, ObjectKind};
use crate::models::trace_model::{
    TraceModel, TraceModelRequest, RELATED_LOG_CLOSE, RELATED_LOG_OPEN,
};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, warn};
use validator::Validate;

const OBJECT: ObjectKind = ObjectKind::TraceModel;

/// Resolves the polymorphic blocks of a request into a typed model.
///
/// The span configuration is always resolved. The related-log configuration
/// is resolved only when `enabled_related_log` is on; when it is off the
/// related-log source type and configuration are reset.
///
/// # Errors
///
/// - `InvalidParameter.ID` for a malformed id
/// - `NullParameter.SpanSourceType` / `InvalidParameter.SpanSourceType`
/// - `InvalidParameter.EnabledRelatedLog` for a flag other than 0 or 1
/// - `InvalidParameter.RelatedLogSourceType`
/// - internal marshal/unmarshal errors
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use shared::models::TraceModelRequest;
/// use shared::validation::trace_model::resolve_trace_model;
///
/// let request: TraceModelRequest = serde_json::from_value(json!({
///     "name": "apm",
///     "span_source_type": "data_connection",
///     "span_config": {"data_connection": {"id": "dc-1", "name": "apm"}},
///     "enabled_related_log": 0,
///     "related_log_source_type": "data_view",
///     "related_log_config": {"data_view": {"id": "dv-1"}}
/// })).unwrap();
///
/// let model = resolve_trace_model(request).unwrap();
/// assert!(model.related_log_config.is_none());
/// assert!(model.related_log_source_type.is_empty());
/// ```
pub fn resolve_trace_model(request: TraceModelRequest) -> ModelResult<TraceModel> {
    validate_model_id(&request.id, false, OBJECT)?;

    if request.span_source_type.is_empty() {
        return Err(ModelError::new(
            ErrorKind::NullParameter,
            OBJECT,
            "SpanSourceType",
        ));
    }
    let span_config = resolve_span_config(&request.span_config, &request.span_source_type)?;

    let (related_log_source_type, related_log_config) = match request.enabled_related_log {
        RELATED_LOG_CLOSE => (String::new(), None),
        RELATED_LOG_OPEN => {
            let config = resolve_related_log_config(
                &request.related_log_config,
                &request.related_log_source_type,
            )?;
            (request.related_log_source_type, Some(config))
        }
        other => {
            return Err(
                ModelError::new(ErrorKind::InvalidParameter, OBJECT, "EnabledRelatedLog")
                    .with_details(format!(
                        "enabled_related_log must be {RELATED_LOG_CLOSE} or {RELATED_LOG_OPEN}, actual is {other}"
                    )),
            )
        }
    };

    let now = Utc::now();
    Ok(TraceModel {
        id: request.id,
        name: request.name,
        tags: request.tags,
        comment: request.comment,
        span_source_type: request.span_source_type,
        span_config,
        enabled_related_log: request.enabled_related_log,
        related_log_source_type,
        related_log_config,
        create_time: now,
        update_time: now,
    })
}

/// Validates a resolved trace model in place.
///
/// The name is trimmed and tags are normalized. If the related log is off,
/// any related-log data still present is dropped.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_trace_model(model: &mut TraceModel) -> ModelResult<()> {
    debug!(id = %model.id, name = %model.name, "Validating trace model");

    let result = validate_fields(model);
    if let Err(err) = &result {
        warn!(code = %err.code, details = %err.details, "Trace model rejected");
    }
    result
}

fn validate_fields(model: &mut TraceModel) -> ModelResult<()> {
    model.name = validate_object_name(&model.name, OBJECT)?;
    model.tags = validate_tags(&model.tags, OBJECT)?;
    validate_comment(&model.comment, OBJECT)?;
    validate_span_config(&model.span_config)?;

    if model.related_log_enabled() {
        match &model.related_log_config {
            Some(config) => validate_related_log_config(config)?,
            None => {
                return Err(ModelError::new(
                    ErrorKind::NullParameter,
                    OBJECT,
                    "RelatedLogConfig",
                ))
            }
        }
    } else {
        model.clear_related_log();
    }

    model.validate().map_err(|e| {
        ModelError::new(ErrorKind::InvalidParameter, OBJECT, "").with_details(e.to_string())
    })
}

/// Checks that the names of a batch are unique among themselves and do not
/// collide with persisted models.
///
/// `existing_names` receives the batch names and returns those already
/// taken.
///
/// # Errors
///
/// `NotUniqueInBatch.ModelName` (400) for a name repeated in the batch,
/// `Existed.ModelName` (403) for a name already persisted, or whatever the
/// lookup returns.
pub fn validate_trace_model_names<F>(models: &[TraceModel], existing_names: F) -> ModelResult<()>
where
    F: FnOnce(&[String]) -> ModelResult<Vec<String>>,
{
    let mut seen = HashSet::with_capacity(models.len());
    for model in models {
        if !seen.insert(model.name.as_str()) {
            return Err(
                ModelError::new(ErrorKind::NotUniqueInBatch, OBJECT, "ModelName").with_details(
                    format!("Trace model name {:?} appears more than once in the batch", model.name),
                ),
            );
        }
    }

    let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
    let taken = existing_names(&names)?;
    if let Some(name) = taken.first() {
        return Err(
            ModelError::new(ErrorKind::Existed, OBJECT, "ModelName")
                .with_details(format!("Trace model name {name:?} already exists")),
        );
    }

    Ok(())
}
