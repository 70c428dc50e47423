//! Translation of validated properties into an `aws-sdk-dynamodb` client.
//!
//! Timeout mapping:
//!
//! | Property | SDK setting |
//! |----------|-------------|
//! | `connection-timeout` | connect timeout |
//! | `execution-timeout` | operation timeout |
//! | `request-timeout` | operation attempt timeout |
//! | `socket-timeout` | read timeout |
//!
//! A zero timeout disables that setting. The retry configuration is only
//! replaced when a custom retry count is configured; otherwise the SDK
//! default retry policy stays in place.

use std::time::Duration;

use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::config::timeout::{TimeoutConfig, TimeoutConfigBuilder};
use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use tracing::{info, warn};

use kinesis_consumer_auth::{CredentialSource, CredentialSummary};

use crate::client::ClientTimeoutPolicy;
use crate::properties::DynamoDbProperties;

/// SDK timeout configuration for a policy.
#[must_use]
pub fn timeout_config(policy: &ClientTimeoutPolicy) -> TimeoutConfig {
    let builder = TimeoutConfig::builder();
    let builder = apply(
        builder,
        policy.connection_timeout(),
        TimeoutConfigBuilder::connect_timeout,
        TimeoutConfigBuilder::disable_connect_timeout,
    );
    let builder = apply(
        builder,
        policy.execution_timeout(),
        TimeoutConfigBuilder::operation_timeout,
        TimeoutConfigBuilder::disable_operation_timeout,
    );
    let builder = apply(
        builder,
        policy.request_timeout(),
        TimeoutConfigBuilder::operation_attempt_timeout,
        TimeoutConfigBuilder::disable_operation_attempt_timeout,
    );
    let builder = apply(
        builder,
        policy.socket_timeout(),
        TimeoutConfigBuilder::read_timeout,
        TimeoutConfigBuilder::disable_read_timeout,
    );
    builder.build()
}

fn apply(
    builder: TimeoutConfigBuilder,
    timeout: Duration,
    set: fn(TimeoutConfigBuilder, Duration) -> TimeoutConfigBuilder,
    disable: fn(TimeoutConfigBuilder) -> TimeoutConfigBuilder,
) -> TimeoutConfigBuilder {
    if timeout.is_zero() {
        disable(builder)
    } else {
        set(builder, timeout)
    }
}

/// SDK retry configuration, present only for a custom retry count.
///
/// The SDK counts attempts, so `max_attempts` is the retry count plus the
/// initial attempt.
#[must_use]
pub fn retry_config(policy: &ClientTimeoutPolicy) -> Option<RetryConfig> {
    policy
        .max_error_retries()
        .map(|retries| RetryConfig::standard().with_max_attempts(retries.saturating_add(1)))
}

/// Full SDK client configuration for the properties.
#[must_use]
pub fn dynamodb_sdk_config(
    properties: &DynamoDbProperties,
    credentials: &CredentialSource,
) -> aws_sdk_dynamodb::Config {
    let policy = properties.client();
    let mut builder = aws_sdk_dynamodb::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(properties.endpoint())
        .region(Region::new(properties.region().to_owned()))
        .credentials_provider(credentials.provider())
        .timeout_config(timeout_config(policy));
    if let Some(retry) = retry_config(policy) {
        builder = builder.retry_config(retry);
    }
    builder.build()
}

/// Build the DynamoDB client and log the configuration in effect.
pub async fn connect_dynamodb(
    properties: &DynamoDbProperties,
    credentials: &CredentialSource,
) -> aws_sdk_dynamodb::Client {
    let client = aws_sdk_dynamodb::Client::from_conf(dynamodb_sdk_config(properties, credentials));

    let summary = CredentialSummary::resolve(credentials).await;
    info!(
        provider = summary.provider,
        access_key = %summary.access_key,
        role = %summary.role_arn,
        "AWS credentials"
    );
    info!(properties = %properties, "connecting to DynamoDB");
    client
}

/// Describe every configured table and report the ones that cannot be
/// described.
///
/// Failures are logged at `warn` and never abort startup; the returned list
/// holds the physical names of the failing tables in key order.
pub async fn verify_tables(
    client: &aws_sdk_dynamodb::Client,
    properties: &DynamoDbProperties,
) -> Vec<String> {
    let mut failing = Vec::new();
    for (key, table) in properties.tables() {
        match client.describe_table().table_name(table.name()).send().await {
            Ok(_) => info!(table_key = key, table = table.name(), "table reachable"),
            Err(e) => {
                warn!(
                    table_key = key,
                    table = table.name(),
                    error = %DisplayErrorContext(&e),
                    "failed to describe table"
                );
                failing.push(table.name().to_owned());
            }
        }
    }
    failing
}
