//! Module for Flux standard durations (FSD).
//!
//! A Flux standard duration is a floating point number followed by an
//! optional unit suffix: `s` (seconds, the default), `m` (minutes), `h`
//! (hours), or `d` (days). Units are fixed multiples of a second; there is no
//! calendar arithmetic.

use std::str::FromStr;

use crate::JobSpecError;
use crate::Result;

/// The number of seconds in a minute.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// The number of seconds in an hour.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// The number of seconds in a day.
const SECONDS_PER_DAY: f64 = 86400.0;

/// Represents a duration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DurationUnit {
    /// The unit is in seconds.
    #[default]
    Seconds,
    /// The unit is in minutes.
    Minutes,
    /// The unit is in hours.
    Hours,
    /// The unit is in days.
    Days,
}

impl DurationUnit {
    /// Converts the given number of units into seconds.
    pub fn seconds(&self, n: f64) -> f64 {
        match self {
            Self::Seconds => n,
            Self::Minutes => n * SECONDS_PER_MINUTE,
            Self::Hours => n * SECONDS_PER_HOUR,
            Self::Days => n * SECONDS_PER_DAY,
        }
    }
}

impl FromStr for DurationUnit {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "s" => Ok(Self::Seconds),
            "m" => Ok(Self::Minutes),
            "h" => Ok(Self::Hours),
            "d" => Ok(Self::Days),
            _ => Err(()),
        }
    }
}

/// Represents a duration as given by a caller: either a number of seconds or
/// a Flux standard duration string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationValue<'a> {
    /// A number of seconds.
    Seconds(f64),
    /// A Flux standard duration string (e.g. `1.5h`).
    Standard(&'a str),
}

impl DurationValue<'_> {
    /// Resolves the duration into a validated number of seconds.
    pub fn seconds(&self) -> Result<f64> {
        match self {
            Self::Seconds(n) => validate_seconds(*n),
            Self::Standard(s) => parse_fsd(s),
        }
    }
}

impl From<f64> for DurationValue<'_> {
    fn from(value: f64) -> Self {
        Self::Seconds(value)
    }
}

impl From<u32> for DurationValue<'_> {
    fn from(value: u32) -> Self {
        Self::Seconds(value.into())
    }
}

impl<'a> From<&'a str> for DurationValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Standard(value)
    }
}

/// Ensures a number of seconds is non-negative and finite.
pub fn validate_seconds(seconds: f64) -> Result<f64> {
    if seconds < 0.0 || !seconds.is_finite() {
        return Err(JobSpecError::InvalidDuration(seconds.to_string()));
    }

    Ok(seconds)
}

/// Parses a Flux standard duration string into seconds.
///
/// Returns an error if the string is not a number with an optional `s`, `m`,
/// `h`, or `d` suffix, or if the result is negative, NaN, or infinite.
pub fn parse_fsd(s: &str) -> Result<f64> {
    let invalid = || JobSpecError::InvalidDuration(s.to_string());

    let (n, unit) = match s.char_indices().next_back() {
        Some((index, c)) if c.is_ascii_alphabetic() => match s[index..].parse::<DurationUnit>() {
            Ok(unit) => (&s[..index], unit),
            Err(_) => return Err(invalid()),
        },
        Some(_) => (s, DurationUnit::Seconds),
        None => return Err(invalid()),
    };

    let n = n.parse::<f64>().map_err(|_| invalid())?;
    let seconds = unit.seconds(n);
    if seconds < 0.0 || !seconds.is_finite() {
        return Err(invalid());
    }

    Ok(seconds)
}
