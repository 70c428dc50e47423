//! AWS credential provider selection for the Kinesis consumer.
//!
//! Locally the consumer authenticates with the shared AWS profile. In the
//! cloud it chains two roles: the web identity role of the pod's service
//! account (from `AWS_ROLE_ARN` and `AWS_WEB_IDENTITY_TOKEN_FILE`), then a
//! cross-account role assumed through STS.
//!
//! # Modules
//!
//! - [`credentials`] - Provider construction per deployment
//! - [`diagnostics`] - Masked credential summaries and STS caller identity
//! - [`error`] - Authentication error types

pub mod credentials;
pub mod diagnostics;
pub mod error;

pub use credentials::{CredentialSource, credential_source, session_name};
pub use diagnostics::{CallerIdentity, CredentialSummary, caller_identity, mask_access_key};
pub use error::{AuthError, AuthResult};
