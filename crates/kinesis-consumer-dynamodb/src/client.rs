//! DynamoDB client timeout and retry policy.
//!
//! The timeout values are related:
//!
//! ```text
//! execution time = retries * (connection timeout + socket timeout)
//! request time   = connection timeout + socket timeout
//! ```
//!
//! Every timeout is truncated to whole milliseconds, and values above
//! `i32::MAX` milliseconds are rejected.

use std::fmt;
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::duration;
use crate::error::ValidationError;

/// Largest timeout accepted, `i32::MAX` milliseconds (about 24.8 days).
pub const MAX_TIMEOUT: Duration = Duration::from_millis(2_147_483_647);

/// Time to establish a connection before giving up. Zero waits forever.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Total time across all attempts. Zero disables the limit.
pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::ZERO;

/// Time for a single attempt. Zero disables the limit.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::ZERO;

/// Time to wait for data on an open connection. Zero waits forever.
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(50);

/// Retry count of the DynamoDB default retry policy.
pub const DEFAULT_MAX_ERROR_RETRIES: u32 = 10;

/// Raw `client` settings as read from configuration.
///
/// Bare integer timeouts are seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClientSettings {
    /// See [`DEFAULT_CONNECTION_TIMEOUT`].
    #[serde(default, deserialize_with = "duration::seconds")]
    pub connection_timeout: Option<TimeDelta>,
    /// See [`DEFAULT_EXECUTION_TIMEOUT`].
    #[serde(default, deserialize_with = "duration::seconds")]
    pub execution_timeout: Option<TimeDelta>,
    /// See [`DEFAULT_REQUEST_TIMEOUT`].
    #[serde(default, deserialize_with = "duration::seconds")]
    pub request_timeout: Option<TimeDelta>,
    /// See [`DEFAULT_SOCKET_TIMEOUT`].
    #[serde(default, deserialize_with = "duration::seconds")]
    pub socket_timeout: Option<TimeDelta>,
    /// Retry attempts for failed requests. Absent keeps the default policy.
    #[serde(default)]
    pub max_error_retries: Option<i64>,
}

/// Validated timeout and retry settings for the DynamoDB client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeoutPolicy {
    connection_timeout: Duration,
    execution_timeout: Duration,
    request_timeout: Duration,
    socket_timeout: Duration,
    max_error_retries: Option<u32>,
}

impl Default for ClientTimeoutPolicy {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            execution_timeout: DEFAULT_EXECUTION_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            socket_timeout: DEFAULT_SOCKET_TIMEOUT,
            max_error_retries: None,
        }
    }
}

impl ClientTimeoutPolicy {
    /// Validate raw settings, filling in defaults for absent values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a timeout is negative or above
    /// [`MAX_TIMEOUT`], or if `max-error-retries` is present and below 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::TimeDelta;
    /// use kinesis_consumer_dynamodb::{ClientSettings, ClientTimeoutPolicy};
    ///
    /// let policy = ClientTimeoutPolicy::build(&ClientSettings {
    ///     max_error_retries: Some(3),
    ///     ..ClientSettings::default()
    /// })
    /// .unwrap();
    /// assert!(policy.uses_custom_retry_policy());
    /// assert_eq!(policy.effective_max_error_retries(), 3);
    ///
    /// assert!(ClientTimeoutPolicy::build(&ClientSettings {
    ///     socket_timeout: Some(TimeDelta::seconds(-1)),
    ///     ..ClientSettings::default()
    /// })
    /// .is_err());
    /// ```
    pub fn build(settings: &ClientSettings) -> Result<Self, ValidationError> {
        let max_error_retries = settings
            .max_error_retries
            .map(|n| {
                if n < 1 || n > i64::from(i32::MAX) {
                    return Err(ValidationError::MaxErrorRetries(n));
                }
                u32::try_from(n).map_err(|_| ValidationError::MaxErrorRetries(n))
            })
            .transpose()?;

        Ok(Self {
            connection_timeout: timeout(
                "connection-timeout",
                settings.connection_timeout,
                DEFAULT_CONNECTION_TIMEOUT,
            )?,
            execution_timeout: timeout(
                "execution-timeout",
                settings.execution_timeout,
                DEFAULT_EXECUTION_TIMEOUT,
            )?,
            request_timeout: timeout(
                "request-timeout",
                settings.request_timeout,
                DEFAULT_REQUEST_TIMEOUT,
            )?,
            socket_timeout: timeout(
                "socket-timeout",
                settings.socket_timeout,
                DEFAULT_SOCKET_TIMEOUT,
            )?,
            max_error_retries,
        })
    }

    /// Connection establishment timeout. Zero means no timeout.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Total execution timeout across retries. Zero means no timeout.
    #[must_use]
    pub fn execution_timeout(&self) -> Duration {
        self.execution_timeout
    }

    /// Per-attempt request timeout. Zero means no timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Socket read timeout. Zero means no timeout.
    #[must_use]
    pub fn socket_timeout(&self) -> Duration {
        self.socket_timeout
    }

    /// The configured retry count, if any.
    #[must_use]
    pub fn max_error_retries(&self) -> Option<u32> {
        self.max_error_retries
    }

    /// Whether a retry policy with a custom retry count must be installed.
    #[must_use]
    pub fn uses_custom_retry_policy(&self) -> bool {
        self.max_error_retries.is_some()
    }

    /// The retry count actually in effect.
    ///
    /// Returns the configured value, or [`DEFAULT_MAX_ERROR_RETRIES`] when
    /// none is configured, so logs always show a concrete number.
    #[must_use]
    pub fn effective_max_error_retries(&self) -> u32 {
        self.max_error_retries.unwrap_or(DEFAULT_MAX_ERROR_RETRIES)
    }
}

/// Truncate a validated timeout to the SDK's 32-bit millisecond count.
#[must_use]
pub fn to_millis_i32(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX)
}

fn timeout(
    field: &'static str,
    raw: Option<TimeDelta>,
    default: Duration,
) -> Result<Duration, ValidationError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    let timeout = value
        .to_std()
        .map_err(|_| ValidationError::Negative { field, value })?;
    if timeout > MAX_TIMEOUT {
        return Err(ValidationError::ExceedsMillisCeiling { field, value });
    }
    // Whole milliseconds only; a sub-millisecond value becomes zero (disabled).
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    Ok(Duration::from_millis(millis))
}

impl fmt::Display for ClientTimeoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "connection_timeout={}ms execution_timeout={}ms request_timeout={}ms \
             socket_timeout={}ms max_error_retries={}",
            to_millis_i32(self.connection_timeout),
            to_millis_i32(self.execution_timeout),
            to_millis_i32(self.request_timeout),
            to_millis_i32(self.socket_timeout),
            self.effective_max_error_retries(),
        )?;
        if !self.uses_custom_retry_policy() {
            f.write_str(" (default)")?;
        }
        Ok(())
    }
}
