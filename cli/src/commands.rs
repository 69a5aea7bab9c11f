//! Offline validation commands.

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use shared::error::ObjectKind;
use shared::models::schedule::SCHEDULE_TYPE_CRON;
use shared::models::{ObjectiveModel, ObjectiveModelRequest, Schedule, TraceModel, TraceModelRequest};
use shared::validation::{
    parse_cron, resolve_trace_model, validate_objective_model, validate_schedule,
    validate_trace_model, validate_trace_model_names,
};
use std::path::Path;

/// A model file holds either one model or an array of models.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ModelFile<T> {
    /// A batch of models. Must stay first so `[]` never decodes as one model.
    Batch(Vec<T>),
    /// A single model.
    Single(T),
}

impl<T> ModelFile<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Batch(models) => models,
            Self::Single(model) => vec![model],
        }
    }
}

fn read_models<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_models(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_models<T: for<'de> Deserialize<'de>>(text: &str) -> Result<Vec<T>> {
    let models = serde_json::from_str::<ModelFile<T>>(text)?.into_vec();
    if models.is_empty() {
        bail!("the file contains no models");
    }
    Ok(models)
}

/// Resolves and validates a batch of trace models, including name uniqueness
/// within the batch.
///
/// # Errors
///
/// Returns the first validation error, tagged with the model's position.
pub fn validate_trace_models(requests: Vec<TraceModelRequest>) -> Result<Vec<TraceModel>> {
    let mut models = Vec::with_capacity(requests.len());
    for (index, request) in requests.into_iter().enumerate() {
        let name = request.name.clone();
        let mut model = resolve_trace_model(request)
            .with_context(|| format!("trace model #{index} ({name:?}) is invalid"))?;
        validate_trace_model(&mut model)
            .with_context(|| format!("trace model #{index} ({name:?}) is invalid"))?;
        models.push(model);
    }

    validate_trace_model_names(&models, |_| Ok(Vec::new()))?;
    tracing::info!(count = models.len(), "Trace models are valid");
    Ok(models)
}

/// Validates a batch of objective models.
///
/// # Errors
///
/// Returns the first validation error, tagged with the model's position.
pub fn validate_objective_models(
    requests: Vec<ObjectiveModelRequest>,
) -> Result<Vec<ObjectiveModel>> {
    let models = requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| {
            let name = request.name.clone();
            validate_objective_model(request)
                .with_context(|| format!("objective model #{index} ({name:?}) is invalid"))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(count = models.len(), "Objective models are valid");
    Ok(models)
}

/// `validate-trace`: prints the normalized models as JSON.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or a model is invalid.
pub fn run_validate_trace(path: &Path) -> Result<String> {
    let models = validate_trace_models(read_models(path)?)?;
    Ok(serde_json::to_string_pretty(&models)?)
}

/// `validate-objective`: prints the normalized models as JSON.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or a model is invalid.
pub fn run_validate_objective(path: &Path) -> Result<String> {
    let models = validate_objective_models(read_models(path)?)?;
    Ok(serde_json::to_string_pretty(&models)?)
}

/// `check-schedule`: validates a schedule and, for cron schedules, lists the
/// next `count` fire times after `from`.
///
/// # Errors
///
/// Fails if the schedule is invalid.
pub fn run_check_schedule(
    schedule: &Schedule,
    count: usize,
    from: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>> {
    validate_schedule(schedule, ObjectKind::MetricModel)?;

    if schedule.schedule_type != SCHEDULE_TYPE_CRON {
        return Ok(Vec::new());
    }

    let cron = parse_cron(&schedule.expression)?;
    Ok(cron.fire_times_after(from, count))
}
