//! Process configuration for the Kinesis consumer.
//!
//! Provides [`ConsumerConfig`], loaded from environment variables. The
//! structured DynamoDB properties live in a separate file whose path is
//! carried here as [`ConsumerConfig::config_file`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{ConsumerError, ConsumerResult};

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one line per event.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Process-level configuration.
///
/// All fields have defaults suitable for running against a local endpoint.
/// Configuration can be loaded from environment variables via
/// [`ConsumerConfig::from_env`].
///
/// # Examples
///
/// ```
/// use kinesis_consumer_core::ConsumerConfig;
///
/// let config = ConsumerConfig::default();
/// assert_eq!(config.config_file, "application.toml");
/// assert!(!config.localstack_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerConfig {
    /// Path of the TOML file holding the DynamoDB properties.
    #[builder(default = String::from("application.toml"))]
    pub config_file: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Log output format.
    #[builder(default)]
    pub log_format: LogFormat,

    /// Whether to target a LocalStack-compatible endpoint instead of the cloud.
    #[builder(default = false)]
    pub localstack_enabled: bool,

    /// Host of the local endpoint.
    #[builder(default = String::from("localhost"))]
    pub localstack_host: String,

    /// Port of the local endpoint.
    #[builder(default = 4566)]
    pub localstack_port: u16,

    /// Region reported to the local endpoint.
    #[builder(default = String::from("us-east-1"))]
    pub localstack_region: String,

    /// Cross-account role assumed in the cloud.
    #[builder(default, setter(strip_option))]
    pub assume_role_arn: Option<String>,

    /// Host name used as the STS session name prefix.
    #[builder(default, setter(strip_option))]
    pub hostname: Option<String>,

    /// Kinesis stream to consume.
    #[builder(default = String::from("events"))]
    pub stream_name: String,

    /// Sleep between polls that return no records, in milliseconds.
    #[builder(default = 1_000)]
    pub poll_interval_ms: u64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConsumerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CONFIG_FILE` | `application.toml` |
    /// | `LOG_LEVEL` | `info` |
    /// | `LOG_FORMAT` | `text` |
    /// | `LOCALSTACK_ENABLED` | `false` |
    /// | `LOCALSTACK_HOST` | `localhost` |
    /// | `LOCALSTACK_PORT` | `4566` |
    /// | `LOCALSTACK_REGION` | `us-east-1` |
    /// | `AWS_ASSUME_ROLE_ARN` | *(unset)* |
    /// | `HOSTNAME` | *(unset)* |
    /// | `KINESIS_STREAM_NAME` | `events` |
    /// | `KINESIS_POLL_INTERVAL_MS` | `1000` |
    pub fn from_env() -> ConsumerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConsumerResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("CONFIG_FILE") {
            config.config_file = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            config.log_format = match v.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConsumerError::InvalidSetting {
                        name: "LOG_FORMAT",
                        value: v,
                    });
                }
            };
        }
        if let Some(v) = lookup("LOCALSTACK_ENABLED") {
            config.localstack_enabled = parse_bool(&v);
        }
        if let Some(v) = lookup("LOCALSTACK_HOST") {
            config.localstack_host = v;
        }
        if let Some(v) = lookup("LOCALSTACK_PORT") {
            config.localstack_port = v.parse().map_err(|_| ConsumerError::InvalidSetting {
                name: "LOCALSTACK_PORT",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("LOCALSTACK_REGION") {
            config.localstack_region = v;
        }
        config.assume_role_arn = lookup("AWS_ASSUME_ROLE_ARN").filter(|v| !v.trim().is_empty());
        config.hostname = lookup("HOSTNAME").filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup("KINESIS_STREAM_NAME") {
            config.stream_name = v;
        }
        if let Some(v) = lookup("KINESIS_POLL_INTERVAL_MS") {
            config.poll_interval_ms = v.parse().map_err(|_| ConsumerError::InvalidSetting {
                name: "KINESIS_POLL_INTERVAL_MS",
                value: v.clone(),
            })?;
        }

        Ok(config)
    }

    /// Sleep between empty polls.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
