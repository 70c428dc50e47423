//! Common AWS identifiers shared across crates.

use std::fmt;

/// IAM role ARN assumed when running in the cloud.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RoleArn(String);

impl RoleArn {
    /// Create a new role ARN from a string.
    ///
    /// # Errors
    /// Returns an error if the value is not of the form
    /// `arn:<partition>:iam::<account>:role/<name>`.
    pub fn new(arn: impl Into<String>) -> Result<Self, crate::ConsumerError> {
        let arn = arn.into();
        let mut parts = arn.splitn(6, ':');
        let valid = parts.next() == Some("arn")
            && parts.next().is_some_and(|p| !p.is_empty())
            && parts.next() == Some("iam")
            && parts.next() == Some("")
            && parts.next().is_some_and(|a| !a.is_empty())
            && parts
                .next()
                .and_then(|r| r.strip_prefix("role/"))
                .is_some_and(|name| !name.is_empty());
        if !valid {
            return Err(crate::ConsumerError::InvalidRoleArn(arn));
        }
        Ok(Self(arn))
    }

    /// Get the ARN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region for local endpoints.
    pub const DEFAULT: &str = "us-east-1";

    /// Region the cloud deployment runs in.
    pub const CLOUD: &str = "us-west-2";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
