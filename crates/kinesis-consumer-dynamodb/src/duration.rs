//! Duration literals in configuration files.
//!
//! A duration is an optional sign, an integer magnitude, and an optional unit
//! suffix (`ns`, `us`, `ms`, `s`, `m`, `h`, `d`). A literal without a suffix,
//! or a bare TOML integer, uses the unit of the field it is read into.
//!
//! Negative literals parse successfully. Rejecting them is the job of the
//! owning value so the error names the setting.

use chrono::TimeDelta;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::ValidationError;

/// Unit applied to a duration magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    /// Nanoseconds (`ns`).
    Nanos,
    /// Microseconds (`us`).
    Micros,
    /// Milliseconds (`ms`).
    Millis,
    /// Seconds (`s`).
    Seconds,
    /// Minutes (`m`).
    Minutes,
    /// Hours (`h`).
    Hours,
    /// Days (`d`).
    Days,
}

impl DurationUnit {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "ns" => Some(Self::Nanos),
            "us" => Some(Self::Micros),
            "ms" => Some(Self::Millis),
            "s" => Some(Self::Seconds),
            "m" => Some(Self::Minutes),
            "h" => Some(Self::Hours),
            "d" => Some(Self::Days),
            _ => None,
        }
    }

    fn to_delta(self, magnitude: i64) -> Option<TimeDelta> {
        match self {
            Self::Nanos => Some(TimeDelta::nanoseconds(magnitude)),
            Self::Micros => Some(TimeDelta::microseconds(magnitude)),
            Self::Millis => TimeDelta::try_milliseconds(magnitude),
            Self::Seconds => TimeDelta::try_seconds(magnitude),
            Self::Minutes => TimeDelta::try_minutes(magnitude),
            Self::Hours => TimeDelta::try_hours(magnitude),
            Self::Days => TimeDelta::try_days(magnitude),
        }
    }
}

/// Parse a duration literal, using `default_unit` when no suffix is given.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use kinesis_consumer_dynamodb::duration::{DurationUnit, parse_duration};
///
/// assert_eq!(parse_duration("10", DurationUnit::Seconds).unwrap(), TimeDelta::seconds(10));
/// assert_eq!(parse_duration("-250ms", DurationUnit::Seconds).unwrap(), TimeDelta::milliseconds(-250));
/// assert!(parse_duration("ten seconds", DurationUnit::Seconds).is_err());
/// ```
pub fn parse_duration(input: &str, default_unit: DurationUnit) -> Result<TimeDelta, ValidationError> {
    let invalid = |reason| ValidationError::InvalidDuration {
        input: input.to_owned(),
        reason,
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty duration"));
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let (digits, suffix) = unsigned.split_at(digits_end);
    if digits.is_empty() {
        return Err(invalid("missing magnitude"));
    }

    let unit = if suffix.is_empty() {
        default_unit
    } else {
        DurationUnit::from_suffix(suffix).ok_or_else(|| invalid("unknown unit"))?
    };

    let magnitude: i64 = digits
        .parse()
        .map_err(|_| invalid("magnitude out of range"))?;
    let magnitude = if negative { -magnitude } else { magnitude };

    unit.to_delta(magnitude)
        .ok_or_else(|| invalid("magnitude out of range"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Integer(i64),
    Text(String),
}

fn deserialize_in<'de, D>(
    deserializer: D,
    default_unit: DurationUnit,
) -> Result<Option<TimeDelta>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<RawDuration>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = match raw {
        RawDuration::Integer(n) => default_unit.to_delta(n).ok_or_else(|| {
            ValidationError::InvalidDuration {
                input: n.to_string(),
                reason: "magnitude out of range",
            }
        }),
        RawDuration::Text(text) => parse_duration(&text, default_unit),
    };
    parsed.map(Some).map_err(D::Error::custom)
}

/// Deserialize an optional duration whose bare integers are seconds.
pub(crate) fn seconds<'de, D>(deserializer: D) -> Result<Option<TimeDelta>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_in(deserializer, DurationUnit::Seconds)
}

/// Deserialize an optional duration whose bare integers are milliseconds.
pub(crate) fn millis<'de, D>(deserializer: D) -> Result<Option<TimeDelta>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_in(deserializer, DurationUnit::Millis)
}
