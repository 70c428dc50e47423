//! Kinesis consumer.
//!
//! Reads every shard of a Kinesis stream from its latest position and logs
//! each record payload. DynamoDB client properties are loaded from a TOML
//! file and validated before anything else is started; an invalid file
//! aborts startup.
//!
//! # Usage
//!
//! ```text
//! LOCALSTACK_ENABLED=true CONFIG_FILE=application.toml kinesis-consumer
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CONFIG_FILE` | `application.toml` | DynamoDB properties file |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//! | `LOCALSTACK_ENABLED` | `false` | Use the local endpoint and profile credentials |
//! | `LOCALSTACK_HOST` | `localhost` | Local endpoint host |
//! | `LOCALSTACK_PORT` | `4566` | Local endpoint port |
//! | `LOCALSTACK_REGION` | `us-east-1` | Local region |
//! | `AWS_ASSUME_ROLE_ARN` | *(unset)* | Role assumed in the cloud |
//! | `HOSTNAME` | *(unset)* | Session name prefix in the cloud |
//! | `KINESIS_STREAM_NAME` | `events` | Stream to consume |
//! | `KINESIS_POLL_INTERVAL_MS` | `1000` | Sleep between empty polls |

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kinesis_consumer_auth::{caller_identity, credential_source};
use kinesis_consumer_core::{ConsumerConfig, Deployment, LogFormat};
use kinesis_consumer_dynamodb::{DynamoDbProperties, connect_dynamodb, verify_tables};
use kinesis_consumer_stream::{KinesisRecordSource, LoggingConsumer, ShardPoller, kinesis_client};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }

    Ok(())
}

/// Time-to-live state of one configured table key.
#[derive(Debug, PartialEq, Eq)]
struct TimeToLiveState<'a> {
    table_key: &'a str,
    table: &'a str,
    ttl_key: &'a str,
    /// `None` when the key is disabled.
    value: Option<Duration>,
}

/// Every configured TTL, in table and key order.
fn time_to_live_states(properties: &DynamoDbProperties) -> Vec<TimeToLiveState<'_>> {
    let mut states = Vec::new();
    for (table_key, table) in properties.tables() {
        for ttl_key in table.time_to_live_keys() {
            let value = if table.is_time_to_live_enabled(ttl_key) {
                table.time_to_live(ttl_key).ok()
            } else {
                None
            };
            states.push(TimeToLiveState {
                table_key,
                table: table.name(),
                ttl_key,
                value,
            });
        }
    }
    states
}

/// Log the configured tables and the state of each TTL.
fn log_tables(properties: &DynamoDbProperties) {
    for state in time_to_live_states(properties) {
        match state.value {
            Some(value) => info!(
                table_key = state.table_key,
                table = state.table,
                ttl_key = state.ttl_key,
                ttl = ?value,
                "time to live enabled"
            ),
            None => info!(
                table_key = state.table_key,
                table = state.table,
                ttl_key = state.ttl_key,
                "time to live disabled"
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConsumerConfig::from_env().context("invalid process configuration")?;
    init_tracing(&config.log_level, config.log_format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = %config.config_file,
        "starting Kinesis consumer"
    );

    let properties = DynamoDbProperties::load(&config.config_file)
        .with_context(|| format!("invalid DynamoDB properties in {}", config.config_file))?;
    log_tables(&properties);

    let deployment = Deployment::from_config(&config).context("invalid deployment settings")?;
    info!(
        deployment = deployment.name(),
        region = %deployment.region(),
        "resolved deployment"
    );

    let credentials = credential_source(&deployment).await;
    match caller_identity(
        &credentials,
        deployment.region().as_str(),
        deployment.endpoint_url(),
    )
    .await
    {
        Ok(identity) => info!(account = %identity.account, arn = %identity.arn, "caller identity"),
        Err(e) => warn!(error = %e, "failed to resolve caller identity"),
    }

    let dynamodb = connect_dynamodb(&properties, &credentials).await;
    let failing = verify_tables(&dynamodb, &properties).await;
    if !failing.is_empty() {
        warn!(tables = ?failing, "some configured tables could not be described");
    }

    let source = KinesisRecordSource::new(
        kinesis_client(&deployment, &credentials),
        KinesisRecordSource::MAX_BATCH_LIMIT,
    );
    let poller = ShardPoller::new(
        source,
        Arc::new(LoggingConsumer),
        config.stream_name.clone(),
        config.poll_interval(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal");
        // The poller may already have stopped on its own.
        let _ = shutdown_tx.send(true);
    });

    let summary = poller
        .run(shutdown_rx)
        .await
        .with_context(|| format!("failed to consume stream {}", config.stream_name))?;

    info!(
        shards = summary.shards,
        records = summary.records,
        "Kinesis consumer stopped"
    );
    Ok(())
}
