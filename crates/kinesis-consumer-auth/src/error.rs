//! Error types for credential resolution.

/// Errors that can occur while verifying credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// An STS call failed.
    #[error("STS {operation} failed: {message}")]
    Sts {
        /// STS operation name.
        operation: &'static str,
        /// Underlying error, rendered with its full source chain.
        message: String,
    },
}

/// Convenience result type for credential operations.
pub type AuthResult<T> = Result<T, AuthError>;
