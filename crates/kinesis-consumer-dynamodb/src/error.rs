//! Error types for DynamoDB properties.
//!
//! [`ValidationError`] is raised while building the properties tree and
//! aborts startup. [`DynamoDbConfigError`] adds the lookup failures raised
//! by callers reading the validated tree, plus file loading failures.

use std::path::PathBuf;

use chrono::TimeDelta;

/// A configured value violates a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A duration is negative.
    #[error("{field} must be greater than or equal to 0 (was {value})")]
    Negative {
        /// Name of the offending setting.
        field: &'static str,
        /// Configured value.
        value: TimeDelta,
    },

    /// A timeout does not fit in a 32-bit millisecond count.
    #[error("{field} must be less than or equal to {max_millis} milliseconds (was {value})", max_millis = i32::MAX)]
    ExceedsMillisCeiling {
        /// Name of the offending setting.
        field: &'static str,
        /// Configured value.
        value: TimeDelta,
    },

    /// The retry count is outside `1..=i32::MAX`.
    #[error("max-error-retries must be between 1 and {max} (was {0})", max = i32::MAX)]
    MaxErrorRetries(i64),

    /// A time-to-live `min` is greater than its `max`.
    #[error("'min' value must be less than or equal to 'max' [min={min}, max={max}]")]
    MinGreaterThanMax {
        /// Configured minimum.
        min: TimeDelta,
        /// Configured maximum.
        max: TimeDelta,
    },

    /// A time-to-live value is below its `min`.
    #[error("'value' must be greater than or equal to the 'min' (value={value}, min={min})")]
    BelowMin {
        /// Effective value after defaulting.
        value: TimeDelta,
        /// Configured minimum.
        min: TimeDelta,
    },

    /// A time-to-live value is above its `max`.
    #[error("'value' must be less than or equal to the 'max' (value={value}, max={max})")]
    AboveMax {
        /// Effective value after defaulting.
        value: TimeDelta,
        /// Configured maximum.
        max: TimeDelta,
    },

    /// A required string is missing or whitespace only.
    #[error("{0} must not be blank")]
    Blank(&'static str),

    /// A required collection is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A duration literal cannot be parsed.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// Raw input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A nested value failed validation.
    #[error("{path}: {source}")]
    Context {
        /// Dotted path of the nested value, e.g. `tables.orders.time-to-live.item`.
        path: String,
        /// Underlying failure.
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Attach the dotted path of the value that failed.
    #[must_use]
    pub fn at(self, path: impl Into<String>) -> Self {
        let path = path.into();
        match self {
            Self::Context {
                path: inner,
                source,
            } => Self::Context {
                path: format!("{path}.{inner}"),
                source,
            },
            other => Self::Context {
                path,
                source: Box::new(other),
            },
        }
    }

    /// The innermost failure, with all path context removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors raised while loading or reading DynamoDB properties.
#[derive(Debug, thiserror::Error)]
pub enum DynamoDbConfigError {
    /// The configuration failed validation.
    #[error("invalid DynamoDB configuration: {0}")]
    Invalid(#[from] ValidationError),

    /// No table is configured under the key.
    #[error("table with the key {0} not found, verify the configuration is correct")]
    TableNotFound(String),

    /// No time-to-live is configured under the key.
    #[error("time to live with the key {key} not found on table {table}")]
    TimeToLiveNotFound {
        /// Physical table name.
        table: String,
        /// Missing time-to-live key.
        key: String,
    },

    /// The time-to-live exists but is disabled; callers must check
    /// `is_time_to_live_enabled` first.
    #[error("time to live for [{key}] is not enabled on table {table}")]
    TimeToLiveDisabled {
        /// Physical table name.
        table: String,
        /// Disabled time-to-live key.
        key: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("failed to parse DynamoDB configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl DynamoDbConfigError {
    /// Whether this is a missing table or time-to-live key.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TableNotFound(_) | Self::TimeToLiveNotFound { .. }
        )
    }
}

/// Convenience result type for DynamoDB property operations.
pub type DynamoDbConfigResult<T> = Result<T, DynamoDbConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_nest_context_paths() {
        let err = ValidationError::Blank("name").at("orders").at("tables");
        assert_eq!(err.to_string(), "tables.orders: name must not be blank");
        assert_eq!(err.root_cause(), &ValidationError::Blank("name"));
    }

    #[test]
    fn test_should_name_offending_values() {
        let err = ValidationError::BelowMin {
            value: TimeDelta::seconds(5),
            min: TimeDelta::seconds(10),
        };
        let message = err.to_string();
        assert!(message.contains("value=PT5S"), "{message}");
        assert!(message.contains("min=PT10S"), "{message}");
    }

    #[test]
    fn test_should_classify_not_found_errors() {
        assert!(DynamoDbConfigError::TableNotFound("orders".into()).is_not_found());
        assert!(
            DynamoDbConfigError::TimeToLiveNotFound {
                table: "orders-dev".into(),
                key: "item".into(),
            }
            .is_not_found()
        );
        assert!(
            !DynamoDbConfigError::TimeToLiveDisabled {
                table: "orders-dev".into(),
                key: "item".into(),
            }
            .is_not_found()
        );
    }
}
