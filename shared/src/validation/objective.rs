//! Objective model validation.
//!
//! Rules run in a fixed order and the first violation aborts:
//! 1. id, name and objective type
//! 2. the objective configuration, resolved by objective type
//! 3. SLO or KPI rules, then status ranges
//! 4. tags and comment
//! 5. the persistence task

use super::common::{
    validate_comment, validate_model_id, validate_object_name, validate_tags, COMMENT_MAX_LENGTH,
};
use super::duration::{parse_duration, DurationUnits};
use super::resolver::{reencode, ReencodeError};
use super::schedule::validate_schedule;
use crate::error::{ErrorKind, ModelError, ModelResult, ObjectKind};
use crate::models::objective_model::{
    KpiObjective, ObjectiveConfig, ObjectiveModel, ObjectiveModelRequest, ObjectiveTask,
    SloObjective, StatusConfig, StatusRange, OBJECTIVE_TYPE_KPI, OBJECTIVE_TYPE_SLO,
    VALID_KPI_UNITS, VALID_OBJECTIVE_TYPES,
};
use chrono::Utc;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use validator::Validate;

const OBJECT: ObjectKind = ObjectKind::ObjectiveModel;

/// Maximum number of comprehensive metric models in a KPI.
pub const COMPREHENSIVE_METRIC_MODELS_MAX_NUMBER: usize = 10;
/// Maximum number of additional metric models in a KPI.
pub const ADDITIONAL_METRIC_MODELS_MAX_NUMBER: usize = 10;
/// Maximum number of status ranges.
pub const STATUS_RANGES_MAX_NUMBER: usize = 10;
/// Required sum of comprehensive metric weights.
pub const COMPREHENSIVE_WEIGHT_SUM: i64 = 100;
/// Upper bound of an SLO objective, in percent.
pub const SLO_OBJECTIVE_MAX: f64 = 100.0;
/// Longest retrace window, in hours.
pub const MAX_RETRACE_HOURS: u64 = 10_000;
/// Most data points a retrace may produce per step.
pub const MAX_RETRACE_POINTS: u128 = 10_000;

fn null(qualifier: &str) -> ModelError {
    ModelError::new(ErrorKind::NullParameter, OBJECT, qualifier)
}

fn invalid(qualifier: &str, details: impl Into<String>) -> ModelError {
    ModelError::new(ErrorKind::InvalidParameter, OBJECT, qualifier).with_details(details)
}

fn count_exceeded(qualifier: &str, max: usize, actual: usize) -> ModelError {
    ModelError::new(ErrorKind::CountExceeded, OBJECT, qualifier)
        .with_details(format!("The number of {qualifier} cannot exceed {max}, actual is {actual}"))
}

/// Validates an objective model request and returns the typed model.
///
/// # Errors
///
/// Returns the first violated rule as a [`ModelError`].
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use shared::validation::objective::validate_objective_model;
///
/// let request = serde_json::from_value(json!({
///     "name": "availability",
///     "objective_type": "slo",
///     "objective_config": {
///         "objective": 99.0,
///         "period": 90,
///         "good_metric_model": {"id": "1"},
///         "total_metric_model": {"id": "2"}
///     },
///     "task": {
///         "schedule": {"type": "FIX_RATE", "expression": "5m"},
///         "steps": ["5m"],
///         "index_base": "objective"
///     }
/// })).unwrap();
///
/// let model = validate_objective_model(request).unwrap();
/// assert_eq!(model.objective_type, "slo");
/// ```
pub fn validate_objective_model(request: ObjectiveModelRequest) -> ModelResult<ObjectiveModel> {
    debug!(id = %request.id, name = %request.name, "Validating objective model");

    let result = build_objective_model(request);
    if let Err(err) = &result {
        warn!(code = %err.code, details = %err.details, "Objective model rejected");
    }
    result
}

fn build_objective_model(request: ObjectiveModelRequest) -> ModelResult<ObjectiveModel> {
    validate_model_id(&request.id, request.builtin, OBJECT)?;
    let name = validate_object_name(&request.name, OBJECT)?;

    if request.objective_type.is_empty() {
        return Err(null("ObjectiveType"));
    }
    if !VALID_OBJECTIVE_TYPES.contains(&request.objective_type.as_str()) {
        return Err(
            ModelError::new(ErrorKind::UnsupportObjectiveType, OBJECT, "").with_details(format!(
                "Objective type must be one of {VALID_OBJECTIVE_TYPES:?}, actual is {:?}",
                request.objective_type
            )),
        );
    }

    let objective_config =
        resolve_objective_config(request.objective_config.as_ref(), &request.objective_type)?;
    match &objective_config {
        ObjectiveConfig::Slo(slo) => validate_slo(slo)?,
        ObjectiveConfig::Kpi(kpi) => validate_kpi(kpi)?,
    }

    let tags = validate_tags(&request.tags, OBJECT)?;
    validate_comment(&request.comment, OBJECT)?;

    let task = request.task.ok_or_else(|| null("Task"))?;
    validate_task(&task)?;

    let now = Utc::now();
    let model = ObjectiveModel {
        id: request.id,
        name,
        builtin: request.builtin,
        objective_type: request.objective_type,
        objective_config,
        tags,
        comment: request.comment,
        task,
        create_time: now,
        update_time: now,
    };

    model
        .validate()
        .map_err(|e| ModelError::new(ErrorKind::InvalidParameter, OBJECT, "").with_details(e.to_string()))?;
    Ok(model)
}

/// Checks that a batch of objective models repeats no id or name, and that no
/// name is already taken by a persisted model.
///
/// Empty ids are assigned by the store and never count as repeats.
///
/// # Errors
///
/// `Duplicated.ModelID` or `Duplicated.ModelName` for a repeat within the
/// batch, `Existed.ModelName` (403) for a taken name, or whatever the lookup
/// returns.
pub fn validate_objective_model_names<F>(
    models: &[ObjectiveModel],
    existing_names: F,
) -> ModelResult<()>
where
    F: FnOnce(&[String]) -> ModelResult<Vec<String>>,
{
    let mut ids = HashSet::with_capacity(models.len());
    let mut names = HashSet::with_capacity(models.len());
    for model in models {
        if !model.id.is_empty() && !ids.insert(model.id.as_str()) {
            return Err(ModelError::new(ErrorKind::Duplicated, OBJECT, "ModelID")
                .with_details(format!(
                    "Objective model id {:?} appears more than once in the batch",
                    model.id
                )));
        }
        if !names.insert(model.name.as_str()) {
            return Err(ModelError::new(ErrorKind::Duplicated, OBJECT, "ModelName")
                .with_details(format!(
                    "Objective model name {:?} appears more than once in the batch",
                    model.name
                )));
        }
    }

    let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
    if let Some(name) = existing_names(&names)?.first() {
        return Err(ModelError::new(ErrorKind::Existed, OBJECT, "ModelName")
            .with_details(format!("Objective model name {name:?} already exists")));
    }

    Ok(())
}

/// Resolves the objective configuration selected by `objective_type`.
///
/// # Errors
///
/// `NullParameter.ObjectiveConfig` if absent, `InvalidParameter.ObjectiveConfig`
/// if the shape does not match the type, `UnsupportObjectiveType` for an
/// unknown type.
pub fn resolve_objective_config(
    raw: Option<&serde_json::Value>,
    objective_type: &str,
) -> ModelResult<ObjectiveConfig> {
    let raw = match raw {
        Some(value) if !value.is_null() => value,
        _ => return Err(null("ObjectiveConfig")),
    };

    let mismatch = |err: ReencodeError| match err {
        ReencodeError::Unmarshal(e) => invalid("ObjectiveConfig", e.to_string()),
        marshal @ ReencodeError::Marshal(_) => marshal.into(),
    };

    match objective_type {
        OBJECTIVE_TYPE_SLO => reencode::<_, SloObjective>(raw)
            .map(ObjectiveConfig::Slo)
            .map_err(mismatch),
        OBJECTIVE_TYPE_KPI => reencode::<_, KpiObjective>(raw)
            .map(ObjectiveConfig::Kpi)
            .map_err(mismatch),
        other => Err(ModelError::new(ErrorKind::UnsupportObjectiveType, OBJECT, "")
            .with_details(format!("Unsupported objective type {other:?}"))),
    }
}

fn validate_slo(slo: &SloObjective) -> ModelResult<()> {
    let objective = slo.objective.ok_or_else(|| null("Objective"))?;
    if objective <= 0.0 || objective > SLO_OBJECTIVE_MAX {
        return Err(invalid(
            "Objective",
            format!("The SLO objective must be in (0, {SLO_OBJECTIVE_MAX}], actual is {objective}"),
        ));
    }

    let period = slo.period.ok_or_else(|| null("Period"))?;
    if period <= 0 {
        return Err(invalid(
            "Period",
            format!("The period must be greater than 0, actual is {period}"),
        ));
    }

    if slo.good_metric_model.as_ref().is_none_or(|m| m.id.is_empty()) {
        return Err(null("GoodMetricModel"));
    }
    if slo.total_metric_model.as_ref().is_none_or(|m| m.id.is_empty()) {
        return Err(null("TotalMetricModel"));
    }

    validate_status_config(slo.status_config.as_ref())
}

fn validate_kpi(kpi: &KpiObjective) -> ModelResult<()> {
    let objective = kpi.objective.ok_or_else(|| null("Objective"))?;
    if objective == 0.0 {
        return Err(invalid("Objective", "The KPI objective cannot be 0"));
    }

    if kpi.unit.is_empty() {
        return Err(null("Unit"));
    }
    if !VALID_KPI_UNITS.contains(&kpi.unit.as_str()) {
        return Err(invalid(
            "Unit",
            format!("The unit must be one of {VALID_KPI_UNITS:?}, actual is {:?}", kpi.unit),
        ));
    }

    let comprehensive = match kpi.comprehensive_metric_models.as_deref() {
        Some(models) if !models.is_empty() => models,
        _ => return Err(null("ComprehensiveMetricModels")),
    };
    if comprehensive.len() > COMPREHENSIVE_METRIC_MODELS_MAX_NUMBER {
        return Err(count_exceeded(
            "ComprehensiveMetricModels",
            COMPREHENSIVE_METRIC_MODELS_MAX_NUMBER,
            comprehensive.len(),
        ));
    }

    let mut weight_sum: i64 = 0;
    for model in comprehensive {
        if model.id.is_empty() {
            return Err(null("ComprehensiveMetricModelID"));
        }
        let weight = model.weight.ok_or_else(|| null("ComprehensiveWeight"))?;
        if weight < 0 {
            return Err(invalid(
                "ComprehensiveWeight",
                format!("The weight of metric model {:?} cannot be negative", model.id),
            ));
        }
        weight_sum = weight_sum.saturating_add(weight);
    }
    if weight_sum != COMPREHENSIVE_WEIGHT_SUM {
        return Err(invalid(
            "ComprehensiveWeight",
            format!(
                "The sum of comprehensive weights must be {COMPREHENSIVE_WEIGHT_SUM}, actual is {weight_sum}"
            ),
        ));
    }

    if kpi.additional_metric_models.len() > ADDITIONAL_METRIC_MODELS_MAX_NUMBER {
        return Err(count_exceeded(
            "AdditionalMetricModels",
            ADDITIONAL_METRIC_MODELS_MAX_NUMBER,
            kpi.additional_metric_models.len(),
        ));
    }
    if kpi.additional_metric_models.iter().any(|m| m.id.is_empty()) {
        return Err(null("AdditionalMetricModelID"));
    }

    validate_status_config(kpi.status_config.as_ref())
}

/// Validates status ranges: labels present, bounds well-formed, and no two
/// ranges overlapping.
///
/// Ranges are half-open `[from, to)`; a missing `from` is unbounded below and
/// a missing `to` unbounded above, so touching ranges do not overlap.
///
/// # Errors
///
/// `CountExceeded.StatusRanges` or `InvalidParameter.StatusRanges`.
pub fn validate_status_config(config: Option<&StatusConfig>) -> ModelResult<()> {
    let Some(config) = config else {
        return Ok(());
    };

    if config.ranges.len() > STATUS_RANGES_MAX_NUMBER {
        return Err(count_exceeded(
            "StatusRanges",
            STATUS_RANGES_MAX_NUMBER,
            config.ranges.len(),
        ));
    }

    for range in &config.ranges {
        if range.status.is_empty() {
            return Err(invalid("StatusRanges", "The status of a range is empty"));
        }
        if range.from.is_none() && range.to.is_none() {
            return Err(invalid(
                "StatusRanges",
                format!("The range of status {:?} has neither from nor to", range.status),
            ));
        }
        if range.lower() >= range.upper() {
            return Err(invalid(
                "StatusRanges",
                format!(
                    "The range of status {:?} must have from less than to",
                    range.status
                ),
            ));
        }
    }

    let mut sorted: Vec<&StatusRange> = config.ranges.iter().collect();
    sorted.sort_by(|a, b| a.lower().total_cmp(&b.lower()));
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if prev.upper() > next.lower() {
            return Err(invalid(
                "StatusRanges",
                format!(
                    "The range of status {:?} overlaps the range of status {:?}",
                    prev.status, next.status
                ),
            ));
        }
    }

    Ok(())
}

/// Validates the persistence task of an objective model.
///
/// # Errors
///
/// Schedule errors, then `InvalidParameter.RetraceDuration`,
/// `NullParameter.Step`, `Duplicated.TaskStep`, `InvalidParameter.Step`,
/// `NullParameter.IndexBase` or `LengthExceeded.TaskComment`.
pub fn validate_task(task: &ObjectiveTask) -> ModelResult<()> {
    validate_schedule(&task.schedule, OBJECT)?;

    let retrace = if task.retrace_duration.is_empty() {
        None
    } else {
        Some(validate_retrace_duration(&task.retrace_duration)?)
    };

    if task.steps.is_empty() {
        return Err(null("Step"));
    }
    let mut seen = HashSet::with_capacity(task.steps.len());
    for step in &task.steps {
        if !seen.insert(step.as_str()) {
            return Err(ModelError::new(ErrorKind::Duplicated, OBJECT, "TaskStep")
                .with_details(format!("Step {step:?} is duplicated")));
        }

        let step_duration = parse_duration(step, DurationUnits::DayHourMinute)
            .map_err(|e| invalid("Step", e.to_string()))?;
        if step_duration.is_zero() {
            return Err(invalid(
                "Step",
                "zero or negative step is not accepted. Try a positive integer",
            ));
        }

        if let Some(retrace) = retrace {
            if retrace.as_millis() > MAX_RETRACE_POINTS * step_duration.as_millis() {
                let points = retrace.as_secs_f64() / step_duration.as_secs_f64();
                return Err(invalid(
                    "RetraceDuration",
                    format!(
                        "The task of retrace data point can not exceed {MAX_RETRACE_POINTS}, actual is [{points}]"
                    ),
                ));
            }
        }
    }

    if task.index_base.is_empty() {
        return Err(null("IndexBase"));
    }

    if task.comment.chars().count() > COMMENT_MAX_LENGTH {
        return Err(ModelError::new(ErrorKind::LengthExceeded, OBJECT, "TaskComment")
            .with_details(format!(
                "The length of the task comment exceeds {COMMENT_MAX_LENGTH}"
            )));
    }

    Ok(())
}

fn validate_retrace_duration(text: &str) -> ModelResult<Duration> {
    let retrace = parse_duration(text, DurationUnits::DayHour)
        .map_err(|e| invalid("RetraceDuration", e.to_string()))?;

    if retrace.is_zero() {
        return Err(invalid(
            "RetraceDuration",
            "zero or negative retrace duration is not accepted. Try a positive integer",
        ));
    }

    if retrace > Duration::from_secs(MAX_RETRACE_HOURS * 3600) {
        return Err(invalid(
            "RetraceDuration",
            format!("The retrace duration cannot exceed {MAX_RETRACE_HOURS}h"),
        ));
    }

    Ok(retrace)
}
