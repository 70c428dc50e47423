//! Validated DynamoDB properties for the Kinesis consumer.
//!
//! Properties are read once at startup from the `[amazon.dynamodb]` section
//! of the application TOML file and validated eagerly; an invalid value
//! aborts startup. After construction every type here is immutable and safe
//! to share across threads without locking.
//!
//! # Architecture
//!
//! ```text
//! application.toml
//!        |
//!        v
//! DynamoDbSettings (raw, serde)
//!        |  validate + default
//!        v
//! DynamoDbProperties
//!   ├── ClientTimeoutPolicy ──> sdk::dynamodb_sdk_config ──> aws_sdk_dynamodb::Client
//!   └── TableDefinition (by logical key)
//!         └── TimeToLive (by key)
//! ```

pub mod client;
pub mod duration;
pub mod error;
pub mod properties;
pub mod sdk;
pub mod table;
pub mod ttl;

pub use client::{ClientSettings, ClientTimeoutPolicy, DEFAULT_MAX_ERROR_RETRIES};
pub use error::{DynamoDbConfigError, DynamoDbConfigResult, ValidationError};
pub use properties::{DynamoDbProperties, DynamoDbSettings};
pub use sdk::{connect_dynamodb, dynamodb_sdk_config, verify_tables};
pub use table::{TableDefinition, TableSettings};
pub use ttl::{TimeToLive, TimeToLiveSettings};
