//! Compact duration parser using nom.
//!
//! Durations are written as decimal components with a unit suffix, largest
//! unit first, each unit at most once:
//! - `5m`, `2h`, `1d`
//! - `1d12h`, `2h30m`, `1d2h3m`
//!
//! Which units are allowed depends on the caller: schedules and persistence
//! steps accept days, hours and minutes; retrace windows accept only days and
//! hours.

use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt},
    sequence::terminated,
    IResult, Parser,
};
use std::time::Duration;
use thiserror::Error;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// The unit set a duration may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnits {
    /// `d`, `h` and `m`.
    DayHourMinute,
    /// `d` and `h`.
    DayHour,
}

impl DurationUnits {
    const fn describe(self) -> &'static str {
        match self {
            Self::DayHourMinute => "d, h, m",
            Self::DayHour => "d, h",
        }
    }
}

/// Errors that can occur while parsing a duration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The input is empty.
    #[error("empty duration string")]
    Empty,

    /// The input does not match the duration grammar.
    #[error("not a valid duration string: {input:?}, supported units are {units}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// The unit set that was allowed.
        units: &'static str,
    },

    /// The value does not fit in a duration.
    #[error("duration out of range: {0:?}")]
    Overflow(String),
}

/// Parses a duration using the given unit set.
///
/// A zero duration such as `0m` parses successfully; callers decide whether
/// zero is acceptable.
///
/// # Errors
///
/// Returns a [`DurationError`] if the input is empty, malformed, uses a unit
/// outside `units`, or overflows.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use shared::validation::duration::{parse_duration, DurationUnits};
///
/// let d = parse_duration("1d12h", DurationUnits::DayHour).unwrap();
/// assert_eq!(d, Duration::from_secs(36 * 3600));
/// assert!(parse_duration("5m", DurationUnits::DayHour).is_err());
/// ```
pub fn parse_duration(input: &str, units: DurationUnits) -> Result<Duration, DurationError> {
    if input.is_empty() {
        return Err(DurationError::Empty);
    }

    let invalid = || DurationError::Invalid {
        input: input.to_string(),
        units: units.describe(),
    };

    let parsed = match units {
        DurationUnits::DayHourMinute => all_consuming(day_hour_minute).parse(input),
        DurationUnits::DayHour => all_consuming(day_hour).parse(input),
    };
    let (_, (days, hours, minutes)) = parsed.map_err(|_| invalid())?;

    if days.is_none() && hours.is_none() && minutes.is_none() {
        return Err(invalid());
    }

    let overflow = || DurationError::Overflow(input.to_string());
    let mut seconds: u64 = 0;
    for (count, scale) in [
        (days, SECONDS_PER_DAY),
        (hours, SECONDS_PER_HOUR),
        (minutes, SECONDS_PER_MINUTE),
    ] {
        if let Some(count) = count {
            let part = count.checked_mul(scale).ok_or_else(overflow)?;
            seconds = seconds.checked_add(part).ok_or_else(overflow)?;
        }
    }

    Ok(Duration::from_secs(seconds))
}

type Components = (Option<u64>, Option<u64>, Option<u64>);

fn day_hour_minute(input: &str) -> IResult<&str, Components> {
    (
        opt(component('d')),
        opt(component('h')),
        opt(component('m')),
    )
        .parse(input)
}

fn day_hour(input: &str) -> IResult<&str, Components> {
    let (input, (days, hours)) = (opt(component('d')), opt(component('h'))).parse(input)?;
    Ok((input, (days, hours, None)))
}

fn component(unit: char) -> impl FnMut(&str) -> IResult<&str, u64> {
    move |input| terminated(map_res(digit1, |s: &str| s.parse::<u64>()), char(unit)).parse(input)
}
