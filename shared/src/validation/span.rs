//! Span and related-log configuration validation.

use super::common::validate_object_name;
use super::condition::validate_precondition;
use crate::error::{ErrorKind, ModelError, ModelResult, ObjectKind};
use crate::models::trace_model::{
    BasicAttributes, RelatedLogConfig, SpanConfig, VALID_DURATION_UNITS, VALID_TIME_FORMATS,
};
use std::collections::HashSet;

const BASIC_ATTRIBUTE_CODE: &str = "DataModel.TraceModel.InvalidBasicAttributeConfig";
const RELATED_LOG_CODE: &str = "DataModel.TraceModel.InvalidRelatedLogConfig";

fn basic_attribute_error(field: &str, details: impl Into<String>) -> ModelError {
    let code = if field.is_empty() {
        BASIC_ATTRIBUTE_CODE.to_string()
    } else {
        format!("{BASIC_ATTRIBUTE_CODE}.{field}")
    };
    ModelError::with_code(ErrorKind::InvalidParameter, code).with_details(details)
}

fn related_log_error(field: &str, details: impl Into<String>) -> ModelError {
    ModelError::with_code(ErrorKind::InvalidParameter, format!("{RELATED_LOG_CODE}.{field}"))
        .with_details(details)
}

/// Checks a field-name list: non-empty, no empty entry, no duplicates.
fn check_field_names(names: &[String], attribute: &str) -> Result<(), String> {
    if names.is_empty() {
        return Err(format!("The field_names of {attribute} is empty"));
    }

    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            return Err(format!("The field_names of {attribute} contains an empty field"));
        }
        if !seen.insert(name.as_str()) {
            return Err(format!(
                "The field_names of {attribute} contains duplicated field {name:?}"
            ));
        }
    }
    Ok(())
}

/// Validates a resolved span configuration.
///
/// The data view variant checks the view name and every basic attribute; the
/// data connection variant only checks the connection name.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_span_config(config: &SpanConfig) -> ModelResult<()> {
    match config {
        SpanConfig::DataView(conf) => {
            validate_object_name(&conf.data_view.name, ObjectKind::DataView)?;
            validate_span_basic_attributes(&conf.basic_attributes)
        }
        SpanConfig::DataConnection(conf) => {
            validate_object_name(&conf.data_connection.name, ObjectKind::DataConnection)?;
            Ok(())
        }
    }
}

/// Validates the field mappings of a data view span configuration.
///
/// Required: trace id, span id, parent span id rules, name, start time and
/// service name. Exactly one of end time and duration must be configured.
///
/// # Errors
///
/// Returns an `InvalidBasicAttributeConfig` error naming the first attribute
/// that fails.
pub fn validate_span_basic_attributes(attrs: &BasicAttributes) -> ModelResult<()> {
    if attrs.trace_id.field_name.is_empty() {
        return Err(basic_attribute_error(
            "TraceID",
            "The field_name of trace_id is empty",
        ));
    }

    check_field_names(&attrs.span_id.field_names, "span_id")
        .map_err(|details| basic_attribute_error("SpanID", details))?;

    if attrs.parent_span_id.is_empty() {
        return Err(basic_attribute_error(
            "ParentSpanID",
            "The parent_span_id rules are empty",
        ));
    }
    for (index, rule) in attrs.parent_span_id.iter().enumerate() {
        validate_precondition(rule.precond.as_ref()).map_err(|e| {
            basic_attribute_error(
                "ParentSpanID",
                format!("The precond of parent_span_id rule {index} is invalid: {e}"),
            )
        })?;
        check_field_names(&rule.field_names, &format!("parent_span_id rule {index}"))
            .map_err(|details| basic_attribute_error("ParentSpanID", details))?;
    }

    if attrs.name.field_name.is_empty() {
        return Err(basic_attribute_error(
            "Name",
            "The field_name of name is empty",
        ));
    }

    if attrs.start_time.field_name.is_empty() {
        return Err(basic_attribute_error(
            "StartTime",
            "The field_name of start_time is empty",
        ));
    }
    if !VALID_TIME_FORMATS.contains(&attrs.start_time.field_format.as_str()) {
        return Err(basic_attribute_error(
            "StartTime",
            format!(
                "The field_format of start_time must be one of {VALID_TIME_FORMATS:?}, actual is {:?}",
                attrs.start_time.field_format
            ),
        ));
    }

    if attrs.service_name.field_name.is_empty() {
        return Err(basic_attribute_error(
            "ServiceName",
            "The field_name of service_name is empty",
        ));
    }

    let has_end_time = !attrs.end_time.field_name.is_empty();
    if has_end_time && !VALID_TIME_FORMATS.contains(&attrs.end_time.field_format.as_str()) {
        return Err(basic_attribute_error(
            "EndTime",
            format!(
                "The field_format of end_time must be one of {VALID_TIME_FORMATS:?}, actual is {:?}",
                attrs.end_time.field_format
            ),
        ));
    }

    let has_duration = !attrs.duration.field_name.is_empty();
    if has_duration && !VALID_DURATION_UNITS.contains(&attrs.duration.field_unit.as_str()) {
        return Err(basic_attribute_error(
            "Duration",
            format!(
                "The field_unit of duration must be one of {VALID_DURATION_UNITS:?}, actual is {:?}",
                attrs.duration.field_unit
            ),
        ));
    }

    match (has_end_time, has_duration) {
        (true, true) => Err(basic_attribute_error(
            "",
            "Both end_time and duration are configured",
        )),
        (false, false) => Err(basic_attribute_error(
            "",
            "Both end_time and duration are not configured",
        )),
        _ => Ok(()),
    }
}

/// Validates a resolved related-log configuration.
///
/// # Errors
///
/// Returns the data view name error, or an `InvalidRelatedLogConfig` error
/// for the trace id or span id mapping.
pub fn validate_related_log_config(config: &RelatedLogConfig) -> ModelResult<()> {
    match config {
        RelatedLogConfig::DataView(conf) => {
            validate_object_name(&conf.data_view.name, ObjectKind::DataView)?;

            if conf.trace_id.field_name.is_empty() {
                return Err(related_log_error(
                    "TraceID",
                    "The field_name of trace_id is empty",
                ));
            }

            check_field_names(&conf.span_id.field_names, "span_id")
                .map_err(|details| related_log_error("SpanID", details))
        }
    }
}
