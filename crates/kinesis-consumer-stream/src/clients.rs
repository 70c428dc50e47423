//! Kinesis and CloudWatch clients per deployment.
//!
//! Local deployments point both clients at the LocalStack endpoint; cloud
//! deployments use the regional AWS endpoints with role-chained credentials.

use aws_sdk_cloudwatch::config::{BehaviorVersion, Region};

use kinesis_consumer_auth::CredentialSource;
use kinesis_consumer_core::Deployment;

/// SDK configuration for the Kinesis client.
#[must_use]
pub fn kinesis_sdk_config(
    deployment: &Deployment,
    credentials: &CredentialSource,
) -> aws_sdk_kinesis::Config {
    let mut builder = aws_sdk_kinesis::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(deployment.region().as_str().to_owned()))
        .credentials_provider(credentials.provider());
    if let Some(endpoint) = deployment.endpoint_url() {
        builder = builder.endpoint_url(endpoint);
    }
    builder.build()
}

/// Kinesis client for the deployment.
#[must_use]
pub fn kinesis_client(
    deployment: &Deployment,
    credentials: &CredentialSource,
) -> aws_sdk_kinesis::Client {
    aws_sdk_kinesis::Client::from_conf(kinesis_sdk_config(deployment, credentials))
}

/// SDK configuration for the CloudWatch client.
#[must_use]
pub fn cloudwatch_sdk_config(
    deployment: &Deployment,
    credentials: &CredentialSource,
) -> aws_sdk_cloudwatch::Config {
    let mut builder = aws_sdk_cloudwatch::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(deployment.region().as_str().to_owned()))
        .credentials_provider(credentials.provider());
    if let Some(endpoint) = deployment.endpoint_url() {
        builder = builder.endpoint_url(endpoint);
    }
    builder.build()
}

/// CloudWatch client for the deployment.
#[must_use]
pub fn cloudwatch_client(
    deployment: &Deployment,
    credentials: &CredentialSource,
) -> aws_sdk_cloudwatch::Client {
    aws_sdk_cloudwatch::Client::from_conf(cloudwatch_sdk_config(deployment, credentials))
}
