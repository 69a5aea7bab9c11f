//! Cron expressions, parsed with the `cron` crate.
//!
//! Expressions have six fields, `second minute hour day-of-month month
//! day-of-week`. The optional seventh year field that `cron` accepts is
//! rejected. Numeric weekdays run from `0` (Sunday) to `6` (Saturday) and are
//! shifted onto the `1`-based numbering `cron` uses. `?` is accepted in the
//! day fields as a synonym for `*`.
//!
//! Predefined descriptors such as `@daily` are expanded before parsing.
//! When both day fields are restricted, a fire time must match both.

use chrono::{NaiveDateTime, TimeZone, Utc};
use std::str::FromStr;
use thiserror::Error;

/// Number of fields a cron expression must have.
pub const CRON_FIELD_COUNT: usize = 6;

const FIELD_NAMES: [&str; CRON_FIELD_COUNT] = [
    "second",
    "minute",
    "hour",
    "day-of-month",
    "month",
    "day-of-week",
];
const DAY_OF_MONTH: usize = 3;
const DAY_OF_WEEK: usize = 5;

/// Errors that can occur while parsing a cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    /// The expression is empty.
    #[error("empty spec string")]
    Empty,

    /// The expression does not have exactly six fields.
    #[error("expected exactly {CRON_FIELD_COUNT} fields, found {found}: {expression}")]
    FieldCount {
        /// Number of fields found.
        found: usize,
        /// The rejected expression.
        expression: String,
    },

    /// An `@` descriptor is not recognized.
    #[error("unrecognized descriptor: {0}")]
    UnrecognizedDescriptor(String),

    /// A step is zero.
    #[error("step of range should be a positive number in {field} field")]
    ZeroStep {
        /// Field name.
        field: &'static str,
    },

    /// `?` was used outside the day fields.
    #[error("'?' is only allowed in day-of-month and day-of-week, found in {field} field")]
    UnexpectedAny {
        /// Field name.
        field: &'static str,
    },

    /// The `cron` crate rejected the expression.
    #[error("invalid cron expression {expression:?}: {reason}")]
    Invalid {
        /// The rejected expression.
        expression: String,
        /// Parser message.
        reason: String,
    },
}

/// A parsed cron schedule.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: ::cron::Schedule,
}

impl CronSchedule {
    /// The six-field expression the schedule was built from, with
    /// descriptors expanded.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the first activation strictly after `after`, or `None` for
    /// schedules that never fire, such as `0 0 0 30 2 *`.
    #[must_use]
    pub fn next_after(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        self.fire_times_after(after, 1).into_iter().next()
    }

    /// Returns up to `count` activations strictly after `after`.
    #[must_use]
    pub fn fire_times_after(&self, after: NaiveDateTime, count: usize) -> Vec<NaiveDateTime> {
        self.schedule
            .after(&Utc.from_utc_datetime(&after))
            .take(count)
            .map(|time| time.naive_utc())
            .collect()
    }
}

/// Parses a six-field cron expression.
///
/// # Errors
///
/// Returns a [`CronError`] describing the first problem found, e.g.
/// `expected exactly 6 fields, found 7` for an expression with a year.
///
/// # Examples
///
/// ```
/// use shared::validation::cron::parse_cron;
///
/// assert!(parse_cron("0 30 9 * * MON-FRI").is_ok());
/// assert!(parse_cron("@hourly").is_ok());
/// assert!(parse_cron("* * * * * * 2024").is_err());
/// ```
pub fn parse_cron(expression: &str) -> Result<CronSchedule, CronError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(CronError::Empty);
    }

    if trimmed.starts_with('@') {
        let expanded = match trimmed {
            "@yearly" | "@annually" => "0 0 0 1 1 *",
            "@monthly" => "0 0 0 1 * *",
            "@weekly" => "0 0 0 * * 0",
            "@daily" | "@midnight" => "0 0 0 * * *",
            "@hourly" => "0 0 * * * *",
            other => return Err(CronError::UnrecognizedDescriptor(other.to_string())),
        };
        return parse_cron(expanded);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() != CRON_FIELD_COUNT {
        return Err(CronError::FieldCount {
            found: fields.len(),
            expression: trimmed.to_string(),
        });
    }

    let mut normalized = Vec::with_capacity(CRON_FIELD_COUNT);
    for (index, field) in fields.iter().enumerate() {
        normalized.push(normalize_field(index, field)?);
    }
    let normalized = normalized.join(" ");

    let schedule = ::cron::Schedule::from_str(&normalized).map_err(|e| CronError::Invalid {
        expression: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    Ok(CronSchedule {
        expression: fields.join(" "),
        schedule,
    })
}

fn normalize_field(index: usize, field: &str) -> Result<String, CronError> {
    let name = FIELD_NAMES[index];
    let day_field = index == DAY_OF_MONTH || index == DAY_OF_WEEK;

    let items = field
        .split(',')
        .map(|item| {
            let (span, step) = match item.split_once('/') {
                Some((span, step)) => (span, Some(step)),
                None => (item, None),
            };

            if step.is_some_and(|step| step.parse::<u32>() == Ok(0)) {
                return Err(CronError::ZeroStep { field: name });
            }

            let span = match span {
                "?" if day_field => "*".to_string(),
                "?" => return Err(CronError::UnexpectedAny { field: name }),
                _ if index == DAY_OF_WEEK => shift_weekdays(span),
                _ => span.to_string(),
            };

            Ok(match step {
                Some(step) => format!("{span}/{step}"),
                None => span,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(items.join(","))
}

/// Maps `0..=6` (Sunday first) onto the `1..=7` numbering of `cron`; names
/// pass through unchanged.
fn shift_weekdays(span: &str) -> String {
    span.split('-')
        .map(|part| match part.parse::<u32>() {
            Ok(day) => day.saturating_add(1).to_string(),
            Err(_) => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("-")
}
