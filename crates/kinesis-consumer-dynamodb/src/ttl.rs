//! Item time-to-live values with min/max bounds.
//!
//! DynamoDB deletes an item some time after its TTL attribute expires,
//! generally within 48 hours. Letting DynamoDB expire data is cheaper than
//! deleting it with explicit writes. A zero TTL means the feature is disabled
//! for that key.

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::duration;
use crate::error::ValidationError;

/// Raw `time-to-live.<key>` settings as read from configuration.
///
/// Bare integers are milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeToLiveSettings {
    /// Time-to-live value. Absent or zero disables it.
    #[serde(default, deserialize_with = "duration::millis")]
    pub value: Option<TimeDelta>,
    /// Lowest accepted value. Absent means zero.
    #[serde(default, deserialize_with = "duration::millis")]
    pub min: Option<TimeDelta>,
    /// Highest accepted value. Absent means unbounded.
    #[serde(default, deserialize_with = "duration::millis")]
    pub max: Option<TimeDelta>,
}

/// A validated time-to-live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimeToLive {
    value: Duration,
}

impl TimeToLive {
    /// A disabled time-to-live.
    pub const DISABLED: Self = Self {
        value: Duration::ZERO,
    };

    /// Validate a time-to-live against optional inclusive bounds.
    ///
    /// An absent `value` defaults to zero before the bounds are checked, so
    /// an absent value with a positive `min` is rejected. Checks run in this
    /// order and the first failure is returned:
    ///
    /// 1. `value`, `min`, `max` are each non-negative
    /// 2. `min <= max`
    /// 3. `value >= min`
    /// 4. `value <= max`
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use kinesis_consumer_dynamodb::TimeToLive;
    ///
    /// let ttl = TimeToLive::new(
    ///     Some(TimeDelta::seconds(10)),
    ///     Some(TimeDelta::seconds(5)),
    ///     Some(TimeDelta::seconds(15)),
    /// )
    /// .unwrap();
    /// assert!(ttl.is_enabled());
    ///
    /// assert!(!TimeToLive::new(None, None, None).unwrap().is_enabled());
    /// assert!(TimeToLive::new(None, Some(TimeDelta::seconds(10)), None).is_err());
    /// ```
    pub fn new(
        value: Option<TimeDelta>,
        min: Option<TimeDelta>,
        max: Option<TimeDelta>,
    ) -> Result<Self, ValidationError> {
        reject_negative("value", value)?;
        reject_negative("min", min)?;
        reject_negative("max", max)?;

        let value = value.unwrap_or_else(TimeDelta::zero);
        let min = min.unwrap_or_else(TimeDelta::zero);
        check_bounds(value, min, max)?;

        let value = value
            .to_std()
            .map_err(|_| ValidationError::Negative {
                field: "value",
                value,
            })?;
        Ok(Self { value })
    }

    /// Validate raw settings.
    pub fn from_settings(settings: &TimeToLiveSettings) -> Result<Self, ValidationError> {
        Self::new(settings.value, settings.min, settings.max)
    }

    /// The time-to-live. Zero when disabled.
    #[must_use]
    pub fn value(&self) -> Duration {
        self.value
    }

    /// Whether the time-to-live is positive.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.value.is_zero()
    }
}

fn reject_negative(field: &'static str, value: Option<TimeDelta>) -> Result<(), ValidationError> {
    match value {
        Some(value) if value < TimeDelta::zero() => {
            Err(ValidationError::Negative { field, value })
        }
        _ => Ok(()),
    }
}

fn check_bounds(
    value: TimeDelta,
    min: TimeDelta,
    max: Option<TimeDelta>,
) -> Result<(), ValidationError> {
    if let Some(max) = max {
        if min > max {
            return Err(ValidationError::MinGreaterThanMax { min, max });
        }
    }
    if value < min {
        return Err(ValidationError::BelowMin { value, min });
    }
    if let Some(max) = max {
        if value > max {
            return Err(ValidationError::AboveMax { value, max });
        }
    }
    Ok(())
}
