//! Credential provider construction per deployment.

use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::provider_config::ProviderConfig;
use aws_config::sts::AssumeRoleProvider;
use aws_config::web_identity_token::WebIdentityTokenCredentialsProvider;
use aws_config::Region;
use aws_credential_types::provider::SharedCredentialsProvider;
use tracing::info;

use kinesis_consumer_core::Deployment;

/// STS limits role session names to 64 characters.
const MAX_SESSION_NAME_LEN: usize = 64;

/// A credential provider together with a label for logs.
#[derive(Debug, Clone)]
pub struct CredentialSource {
    name: &'static str,
    provider: SharedCredentialsProvider,
}

impl CredentialSource {
    /// Wrap an existing provider.
    pub fn new(name: &'static str, provider: SharedCredentialsProvider) -> Self {
        Self { name, provider }
    }

    /// Label of the provider chain, e.g. `profile`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The provider, cheap to clone into SDK client builders.
    #[must_use]
    pub fn provider(&self) -> SharedCredentialsProvider {
        self.provider.clone()
    }
}

/// Build the credential provider for a deployment.
///
/// Local deployments read the shared AWS profile (honouring `AWS_PROFILE`).
/// Cloud deployments load the web identity role and assume the configured
/// role on top of it, with a session name of `<hostname>-<epoch millis>`.
pub async fn credential_source(deployment: &Deployment) -> CredentialSource {
    match deployment {
        Deployment::Local { .. } => CredentialSource::new(
            "profile",
            SharedCredentialsProvider::new(ProfileFileCredentialsProvider::builder().build()),
        ),
        Deployment::Cloud {
            role_arn,
            hostname,
            region,
        } => {
            let region = Region::new(region.as_str().to_owned());
            let web_identity = WebIdentityTokenCredentialsProvider::builder()
                .configure(&ProviderConfig::default().with_region(Some(region.clone())))
                .build();

            let session = session_name(hostname, chrono::Utc::now().timestamp_millis());
            info!(hostname = %hostname, role_arn = %role_arn, session = %session, "assuming role");

            let assume_role = AssumeRoleProvider::builder(role_arn.as_str())
                .session_name(session)
                .region(region)
                .build_from_provider(web_identity)
                .await;

            CredentialSource::new(
                "web-identity+assume-role",
                SharedCredentialsProvider::new(assume_role),
            )
        }
    }
}

/// Role session name for a host at a point in time.
///
/// Characters STS rejects are replaced with `-` and the host part is
/// shortened so the timestamp suffix always survives the length limit.
#[must_use]
pub fn session_name(hostname: &str, epoch_millis: i64) -> String {
    let suffix = format!("-{epoch_millis}");
    let host: String = hostname
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "+=,.@_-".contains(c) {
                c
            } else {
                '-'
            }
        })
        .take(MAX_SESSION_NAME_LEN.saturating_sub(suffix.len()))
        .collect();
    format!("{host}{suffix}")
}

#[cfg(test)]
mod tests {
    use kinesis_consumer_core::AwsRegion;

    use super::*;

    #[test]
    fn test_should_append_epoch_millis_to_hostname() {
        assert_eq!(
            session_name("consumer-7d9f", 1_700_000_000_000),
            "consumer-7d9f-1700000000000"
        );
    }

    #[test]
    fn test_should_replace_invalid_session_characters() {
        assert_eq!(session_name("pod 1/a", 5), "pod-1-a-5");
    }

    #[test]
    fn test_should_truncate_long_hostnames() {
        let name = session_name(&"h".repeat(100), 1_700_000_000_000);
        assert_eq!(name.len(), 64);
        assert!(name.ends_with("-1700000000000"));
    }

    #[tokio::test]
    async fn test_should_use_profile_provider_locally() {
        let deployment = Deployment::Local {
            endpoint: "http://localhost:4566".into(),
            region: AwsRegion::default(),
        };
        let source = credential_source(&deployment).await;
        assert_eq!(source.name(), "profile");
    }
}
