//! Schedule definitions shared by persistence tasks.

use serde::{Deserialize, Serialize};

/// Schedule type literal for a fixed-period schedule.
pub const SCHEDULE_TYPE_FIX_RATE: &str = "FIX_RATE";
/// Schedule type literal for a cron schedule.
pub const SCHEDULE_TYPE_CRON: &str = "CRON";

/// How often a persistence task runs.
///
/// # Example
///
/// ```
/// use shared::models::Schedule;
///
/// let schedule = Schedule::fix_rate("5m");
/// assert_eq!(schedule.schedule_type, "FIX_RATE");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// `FIX_RATE` or `CRON`.
    #[serde(rename = "type", default)]
    pub schedule_type: String,

    /// A duration such as `5m` for `FIX_RATE`, or a 6-field cron expression.
    #[serde(default)]
    pub expression: String,
}

impl Schedule {
    /// Creates a schedule with the given type and expression.
    #[must_use]
    pub fn new(schedule_type: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            schedule_type: schedule_type.into(),
            expression: expression.into(),
        }
    }

    /// Creates a fixed-period schedule.
    #[must_use]
    pub fn fix_rate(expression: impl Into<String>) -> Self {
        Self::new(SCHEDULE_TYPE_FIX_RATE, expression)
    }

    /// Creates a cron schedule.
    #[must_use]
    pub fn cron(expression: impl Into<String>) -> Self {
        Self::new(SCHEDULE_TYPE_CRON, expression)
    }
}
