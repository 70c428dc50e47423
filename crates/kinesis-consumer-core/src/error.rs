//! Error types for the consumer core.

/// Core error type for process configuration and deployment selection.
#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    /// Invalid IAM role ARN format.
    #[error("invalid IAM role ARN: {0} (expected arn:<partition>:iam::<account>:role/<name>)")]
    InvalidRoleArn(String),

    /// A setting required by the selected deployment is missing.
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),

    /// A setting is present but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidSetting {
        /// Environment variable name.
        name: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },
}

/// Convenience result type for consumer core operations.
pub type ConsumerResult<T> = Result<T, ConsumerError>;
