//! Data models for trace models, objective models and their building blocks.

pub mod condition;
pub mod objective_model;
pub mod schedule;
pub mod trace_model;

pub use condition::{Comparison, Condition, ConditionConfig, ConditionValue, RangeCondition};
pub use objective_model::{
    ComprehensiveMetricModel, KpiObjective, MetricModelRef, ObjectiveConfig, ObjectiveModel,
    ObjectiveModelRequest, ObjectiveTask, SloObjective, StatusConfig, StatusRange,
};
pub use schedule::Schedule;
pub use trace_model::{
    BasicAttributes, DurationFieldMapping, FieldMapping, FieldNamesMapping, ParentSpanRule,
    RelatedLogConfig, RelatedLogConfigWithDataView, SourceRef, SpanConfig,
    SpanConfigWithDataConnection, SpanConfigWithDataView, TimeFieldMapping, TraceModel,
    TraceModelRequest,
};
