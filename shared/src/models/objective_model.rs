//! Objective model definitions.
//!
//! An objective model is either an SLO (ratio of good to total events over a
//! period) or a KPI (a target value, optionally a weighted combination of
//! metrics). The `objective_config` block is decoded according to
//! `objective_type`.

use super::schedule::Schedule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Objective type literal for service-level objectives.
pub const OBJECTIVE_TYPE_SLO: &str = "slo";
/// Objective type literal for key performance indicators.
pub const OBJECTIVE_TYPE_KPI: &str = "kpi";

/// Supported objective types.
pub const VALID_OBJECTIVE_TYPES: [&str; 2] = [OBJECTIVE_TYPE_SLO, OBJECTIVE_TYPE_KPI];

/// KPI unit for a plain number.
pub const UNIT_NUM_NONE: &str = "none";
/// KPI unit for a percentage.
pub const UNIT_NUM_PERCENT: &str = "%";

/// Supported KPI units.
pub const VALID_KPI_UNITS: [&str; 2] = [UNIT_NUM_NONE, UNIT_NUM_PERCENT];

/// Reference to a metric model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricModelRef {
    /// Metric model id.
    #[serde(default)]
    pub id: String,
}

/// A metric model contributing to a KPI with a weight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComprehensiveMetricModel {
    /// Metric model id.
    #[serde(default)]
    pub id: String,
    /// Weight in percent; all weights of a KPI sum to 100.
    #[serde(default)]
    pub weight: Option<i64>,
}

/// A labelled interval `[from, to)`. A missing bound is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusRange {
    /// Status label, e.g. `good`.
    #[serde(default)]
    pub status: String,
    /// Inclusive lower bound.
    #[serde(default)]
    pub from: Option<f64>,
    /// Exclusive upper bound.
    #[serde(default)]
    pub to: Option<f64>,
}

impl StatusRange {
    /// Creates a range.
    #[must_use]
    pub fn new(status: impl Into<String>, from: Option<f64>, to: Option<f64>) -> Self {
        Self {
            status: status.into(),
            from,
            to,
        }
    }

    /// Lower bound with an absent bound read as negative infinity.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.from.unwrap_or(f64::NEG_INFINITY)
    }

    /// Upper bound with an absent bound read as positive infinity.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.to.unwrap_or(f64::INFINITY)
    }
}

/// Buckets the computed objective value into statuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Non-overlapping ranges.
    #[serde(default)]
    pub ranges: Vec<StatusRange>,
}

/// SLO configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SloObjective {
    /// Target percentage in `(0, 100]`.
    #[serde(default)]
    pub objective: Option<f64>,
    /// Period in days.
    #[serde(default)]
    pub period: Option<i64>,
    /// Metric counting good events.
    #[serde(default)]
    pub good_metric_model: Option<MetricModelRef>,
    /// Metric counting all events.
    #[serde(default)]
    pub total_metric_model: Option<MetricModelRef>,
    /// Optional status buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_config: Option<StatusConfig>,
}

/// KPI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiObjective {
    /// Non-zero target value.
    #[serde(default)]
    pub objective: Option<f64>,
    /// One of [`VALID_KPI_UNITS`].
    #[serde(default)]
    pub unit: String,
    /// Weighted metrics composing the KPI.
    #[serde(default)]
    pub comprehensive_metric_models: Option<Vec<ComprehensiveMetricModel>>,
    /// Extra metrics shown alongside the KPI.
    #[serde(default)]
    pub additional_metric_models: Vec<MetricModelRef>,
    /// Optional status buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_config: Option<StatusConfig>,
}

/// The resolved objective configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectiveConfig {
    /// `objective_type = slo`.
    Slo(SloObjective),
    /// `objective_type = kpi`.
    Kpi(KpiObjective),
}

impl ObjectiveConfig {
    /// Returns the discriminator value for this variant.
    #[must_use]
    pub const fn objective_type(&self) -> &'static str {
        match self {
            Self::Slo(_) => OBJECTIVE_TYPE_SLO,
            Self::Kpi(_) => OBJECTIVE_TYPE_KPI,
        }
    }
}

/// Persistence task of an objective model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ObjectiveTask {
    /// When the task runs.
    #[serde(default)]
    pub schedule: Schedule,
    /// Persistence steps such as `5m`.
    #[serde(default)]
    pub steps: Vec<String>,
    /// Index base the results are written to.
    #[validate(length(min = 1, message = "Index base cannot be empty"))]
    #[serde(default)]
    pub index_base: String,
    /// How far back the first run recomputes, using `d`/`h` units.
    #[serde(default)]
    pub retrace_duration: String,
    /// Task comment.
    #[validate(length(max = 1024, message = "Task comment cannot exceed 1024 characters"))]
    #[serde(default)]
    pub comment: String,
}

/// An objective model as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveModelRequest {
    /// Model id; assigned by the store when empty.
    #[serde(default)]
    pub id: String,
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Whether this is a builtin model.
    #[serde(default)]
    pub builtin: bool,
    /// `slo` or `kpi`.
    #[serde(default)]
    pub objective_type: String,
    /// Untyped objective configuration.
    #[serde(default)]
    pub objective_config: Option<serde_json::Value>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form comment.
    #[serde(default)]
    pub comment: String,
    /// Persistence task.
    #[serde(default)]
    pub task: Option<ObjectiveTask>,
}

/// A resolved objective model.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ObjectiveModel {
    /// Model id.
    #[validate(length(max = 40, message = "Model id cannot exceed 40 characters"))]
    pub id: String,
    /// Model name.
    #[validate(length(min = 1, max = 128, message = "Model name must be 1 to 128 characters"))]
    pub name: String,
    /// Whether this is a builtin model.
    pub builtin: bool,
    /// `slo` or `kpi`.
    pub objective_type: String,
    /// Typed objective configuration.
    pub objective_config: ObjectiveConfig,
    /// Normalized tags.
    #[validate(length(max = 20, message = "A model cannot carry more than 20 tags"))]
    pub tags: Vec<String>,
    /// Comment.
    #[validate(length(max = 1024, message = "Comment cannot exceed 1024 characters"))]
    pub comment: String,
    /// Persistence task.
    #[validate(nested)]
    pub task: ObjectiveTask,
    /// Creation timestamp.
    pub create_time: DateTime<Utc>,
    /// Last update timestamp.
    pub update_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_range_unbounded_sides() {
        let below = StatusRange::new("bad", None, Some(10.0));
        assert_eq!(below.lower(), f64::NEG_INFINITY);
        assert_eq!(below.upper(), 10.0);

        let above = StatusRange::new("good", Some(90.0), None);
        assert_eq!(above.upper(), f64::INFINITY);
    }

    #[test]
    fn test_request_null_config_is_none() {
        let req: ObjectiveModelRequest = serde_json::from_value(json!({
            "name": "availability",
            "objective_type": "slo",
            "objective_config": null
        }))
        .unwrap();
        assert!(req.objective_config.is_none());
        assert!(!req.builtin);
        assert!(req.task.is_none());
    }

    #[test]
    fn test_kpi_objective_deserialize() {
        let kpi: KpiObjective = serde_json::from_value(json!({
            "objective": 1.5,
            "unit": "%",
            "comprehensive_metric_models": [{"id": "a", "weight": 60}, {"id": "b", "weight": 40}]
        }))
        .unwrap();
        let models = kpi.comprehensive_metric_models.unwrap();
        assert_eq!(models[0].weight, Some(60));
        assert!(kpi.additional_metric_models.is_empty());
    }

    #[test]
    fn test_objective_config_type() {
        assert_eq!(
            ObjectiveConfig::Slo(SloObjective::default()).objective_type(),
            OBJECTIVE_TYPE_SLO
        );
        assert_eq!(
            ObjectiveConfig::Kpi(KpiObjective::default()).objective_type(),
            OBJECTIVE_TYPE_KPI
        );
    }
}
