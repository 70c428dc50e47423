//! Local vs. cloud deployment selection.
//!
//! The choice is made once at startup from [`ConsumerConfig`]; every client
//! builder downstream matches on the resulting [`Deployment`] instead of
//! reading the raw flags again.

use tracing::debug;

use crate::config::ConsumerConfig;
use crate::error::{ConsumerError, ConsumerResult};
use crate::types::{AwsRegion, RoleArn};

/// Where the consumer runs and how it reaches AWS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    /// A LocalStack-compatible endpoint with profile credentials.
    Local {
        /// Endpoint URL, e.g. `http://localhost:4566`.
        endpoint: String,
        /// Region reported to the endpoint.
        region: AwsRegion,
    },
    /// The real cloud, reached through IAM role chaining.
    Cloud {
        /// Cross-account role assumed on top of the web identity role.
        role_arn: RoleArn,
        /// Host name used as the STS session name prefix.
        hostname: String,
        /// Region of the stream and the STS client.
        region: AwsRegion,
    },
}

impl Deployment {
    /// Resolve the deployment from process configuration.
    ///
    /// # Errors
    /// Returns an error for a cloud deployment without a valid role ARN or
    /// host name.
    pub fn from_config(config: &ConsumerConfig) -> ConsumerResult<Self> {
        if config.localstack_enabled {
            let endpoint = format!(
                "http://{}:{}",
                config.localstack_host, config.localstack_port
            );
            debug!(%endpoint, region = %config.localstack_region, "local deployment");
            return Ok(Self::Local {
                endpoint,
                region: AwsRegion::new(config.localstack_region.clone()),
            });
        }

        let role_arn = config
            .assume_role_arn
            .clone()
            .ok_or(ConsumerError::MissingSetting("AWS_ASSUME_ROLE_ARN"))?;
        let hostname = config
            .hostname
            .clone()
            .ok_or(ConsumerError::MissingSetting("HOSTNAME"))?;

        debug!(%role_arn, %hostname, "cloud deployment");
        Ok(Self::Cloud {
            role_arn: RoleArn::new(role_arn)?,
            hostname,
            region: AwsRegion::new(AwsRegion::CLOUD),
        })
    }

    /// Region the stream clients are built for.
    #[must_use]
    pub fn region(&self) -> &AwsRegion {
        match self {
            Self::Local { region, .. } | Self::Cloud { region, .. } => region,
        }
    }

    /// Endpoint override, present only for local deployments.
    #[must_use]
    pub fn endpoint_url(&self) -> Option<&str> {
        match self {
            Self::Local { endpoint, .. } => Some(endpoint),
            Self::Cloud { .. } => None,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Cloud { .. } => "cloud",
        }
    }
}
