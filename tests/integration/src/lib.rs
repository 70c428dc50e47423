//! Integration tests for the Kinesis consumer.
//!
//! These tests require a LocalStack-compatible endpoint at
//! `LOCALSTACK_ENDPOINT` (default `localhost:4566`). They are marked
//! `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p kinesis-consumer-integration -- --ignored
//! ```

use std::sync::Once;

use aws_credential_types::Credentials;
use aws_credential_types::provider::SharedCredentialsProvider;
use kinesis_consumer_auth::CredentialSource;
use kinesis_consumer_core::{AwsRegion, Deployment};
use kinesis_consumer_dynamodb::DynamoDbProperties;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL of the local server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("LOCALSTACK_ENDPOINT").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Static test credentials accepted by the local server.
#[must_use]
pub fn test_credentials() -> CredentialSource {
    init_tracing();
    CredentialSource::new(
        "static",
        SharedCredentialsProvider::new(Credentials::new(
            "test",
            "test",
            None,
            None,
            "integration-test",
        )),
    )
}

/// Local deployment pointing at the server.
#[must_use]
pub fn local_deployment() -> Deployment {
    Deployment::Local {
        endpoint: endpoint_url(),
        region: AwsRegion::default(),
    }
}

/// Validated properties for the server with a single `orders` table.
#[must_use]
pub fn local_properties(table_name: &str) -> DynamoDbProperties {
    let document = format!(
        r#"
[amazon.dynamodb]
endpoint = "{endpoint}"
region = "{region}"

[amazon.dynamodb.client]
connection-timeout = "2s"
socket-timeout = "5s"
max-error-retries = 1

[amazon.dynamodb.tables.orders]
name = "{table_name}"

[amazon.dynamodb.tables.orders.time-to-live.retention]
value = "1d"
min = "1h"
max = "7d"
"#,
        endpoint = endpoint_url(),
        region = AwsRegion::DEFAULT,
    );
    DynamoDbProperties::from_toml_str(&document)
        .unwrap_or_else(|e| panic!("invalid test properties: {e}"))
}

/// Generate a unique resource name for a test.
#[must_use]
pub fn test_resource_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

mod test_dynamodb;
mod test_kinesis;
