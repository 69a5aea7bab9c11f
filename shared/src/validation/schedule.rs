//! Schedule validation for persistence tasks.

use super::cron::parse_cron;
use super::duration::{parse_duration, DurationUnits};
use crate::error::{ErrorKind, ModelError, ModelResult, ObjectKind};
use crate::models::schedule::{Schedule, SCHEDULE_TYPE_CRON, SCHEDULE_TYPE_FIX_RATE};
use tracing::debug;

/// Longest accepted FIX_RATE period, in seconds (24 days). The period in
/// milliseconds must fit a signed 32-bit integer.
pub const MAX_FIX_RATE_SECONDS: u64 = 24 * 24 * 60 * 60;

/// Validates a task schedule. Error codes are scoped to `object`, so the same
/// routine serves objective, event and metric model tasks.
///
/// # Errors
///
/// - `NullParameter.ScheduleType` / `InvalidParameter.ScheduleType`
/// - `NullParameter.ScheduleExpression`
/// - `InvalidParameter.ScheduleExpression` when a FIX_RATE period is malformed,
///   zero or longer than 24 days, or a CRON expression does not parse
///
/// # Example
///
/// ```
/// use shared::error::ObjectKind;
/// use shared::models::Schedule;
/// use shared::validation::schedule::validate_schedule;
///
/// assert!(validate_schedule(&Schedule::fix_rate("24d"), ObjectKind::ObjectiveModel).is_ok());
/// assert!(validate_schedule(&Schedule::fix_rate("25d"), ObjectKind::ObjectiveModel).is_err());
/// ```
pub fn validate_schedule(schedule: &Schedule, object: ObjectKind) -> ModelResult<()> {
    debug!(
        object = %object,
        schedule_type = %schedule.schedule_type,
        expression = %schedule.expression,
        "Validating schedule"
    );

    if schedule.schedule_type.is_empty() {
        return Err(ModelError::new(
            ErrorKind::NullParameter,
            object,
            "ScheduleType",
        ));
    }

    if schedule.schedule_type != SCHEDULE_TYPE_FIX_RATE
        && schedule.schedule_type != SCHEDULE_TYPE_CRON
    {
        return Err(
            ModelError::new(ErrorKind::InvalidParameter, object, "ScheduleType").with_details(
                format!(
                    "Schedule type must be {SCHEDULE_TYPE_FIX_RATE} or {SCHEDULE_TYPE_CRON}, actual is {:?}",
                    schedule.schedule_type
                ),
            ),
        );
    }

    if schedule.expression.is_empty() {
        return Err(ModelError::new(
            ErrorKind::NullParameter,
            object,
            "ScheduleExpression",
        ));
    }

    let invalid_expression =
        |details: String| ModelError::new(ErrorKind::InvalidParameter, object, "ScheduleExpression")
            .with_details(details);

    if schedule.schedule_type == SCHEDULE_TYPE_FIX_RATE {
        let period = parse_duration(&schedule.expression, DurationUnits::DayHourMinute)
            .map_err(|e| invalid_expression(e.to_string()))?;

        if period.is_zero() {
            return Err(invalid_expression(
                "zero or negative schedule expression is not accepted. Try a positive integer"
                    .to_string(),
            ));
        }

        // Compare at millisecond precision first, then in seconds.
        let seconds = period.as_millis() / 1000;
        if seconds > u128::from(MAX_FIX_RATE_SECONDS) {
            return Err(invalid_expression(
                "should be less than 24 days".to_string(),
            ));
        }
    } else {
        parse_cron(&schedule.expression).map_err(|e| invalid_expression(e.to_string()))?;
    }

    Ok(())
}
