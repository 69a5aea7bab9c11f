//! Configuration validation engine.
//!
//! Validators are pure functions over decoded request structures. The only
//! mutations they perform are trimming names, normalizing tags and dropping
//! related-log data that a disabled flag makes stale.
//!
//! Leaf parsers ([`condition`], [`duration`], [`cron`]) have their own error
//! types; everything above them reports a [`crate::error::ModelError`].

pub mod common;
pub mod condition;
pub mod cron;
pub mod duration;
pub mod objective;
pub mod resolver;
pub mod schedule;
pub mod span;
pub mod trace_model;

pub use condition::{parse_condition, validate_precondition, ConditionError};
pub use self::cron::{parse_cron, CronError, CronSchedule};
pub use duration::{parse_duration, DurationError, DurationUnits};
pub use objective::{validate_objective_model, validate_objective_model_names};
pub use resolver::{resolve_related_log_config, resolve_span_config};
pub use schedule::validate_schedule;
pub use span::{validate_related_log_config, validate_span_basic_attributes, validate_span_config};
pub use trace_model::{resolve_trace_model, validate_trace_model, validate_trace_model_names};
