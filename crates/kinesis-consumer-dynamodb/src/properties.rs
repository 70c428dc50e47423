//! DynamoDB properties loaded once at startup.
//!
//! The properties live under `[amazon.dynamodb]` in the application TOML
//! file:
//!
//! ```toml
//! [amazon.dynamodb]
//! endpoint = "http://localhost:4566"
//! region = "us-east-1"
//!
//! [amazon.dynamodb.client]
//! connection-timeout = 2
//! max-error-retries = 3
//!
//! [amazon.dynamodb.tables.orders]
//! name = "orders-dev"
//!
//! [amazon.dynamodb.tables.orders.time-to-live.item]
//! value = "7d"
//! min = "1d"
//! max = "30d"
//! ```
//!
//! Validation is all-or-nothing: [`DynamoDbProperties::from_settings`]
//! either returns a fully validated tree or the first failure found.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{ClientSettings, ClientTimeoutPolicy};
use crate::error::{DynamoDbConfigError, DynamoDbConfigResult, ValidationError};
use crate::table::{TableDefinition, TableSettings};

/// Raw `amazon.dynamodb` settings as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DynamoDbSettings {
    /// Service endpoint URL.
    #[serde(default)]
    pub endpoint: String,
    /// Service region.
    #[serde(default)]
    pub region: String,
    /// Client timeouts and retries.
    #[serde(default)]
    pub client: ClientSettings,
    /// Tables by logical key.
    #[serde(default)]
    pub tables: BTreeMap<String, TableSettings>,
}

#[derive(Deserialize)]
struct ApplicationFile {
    amazon: AmazonSection,
}

#[derive(Deserialize)]
struct AmazonSection {
    dynamodb: DynamoDbSettings,
}

/// Validated DynamoDB properties.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbProperties {
    endpoint: String,
    region: String,
    client: ClientTimeoutPolicy,
    tables: BTreeMap<String, TableDefinition>,
}

impl DynamoDbProperties {
    /// Validate raw settings.
    ///
    /// Checks run in this order: endpoint, region, tables non-empty, client
    /// policy, then each table in key order.
    pub fn from_settings(settings: &DynamoDbSettings) -> Result<Self, ValidationError> {
        if settings.endpoint.trim().is_empty() {
            return Err(ValidationError::Blank("endpoint"));
        }
        if settings.region.trim().is_empty() {
            return Err(ValidationError::Blank("region"));
        }
        if settings.tables.is_empty() {
            return Err(ValidationError::Empty("tables"));
        }

        let client = ClientTimeoutPolicy::build(&settings.client).map_err(|e| e.at("client"))?;

        let mut tables = BTreeMap::new();
        for (key, table) in &settings.tables {
            let table =
                TableDefinition::from_settings(table).map_err(|e| e.at(format!("tables.{key}")))?;
            debug!(key = %key, name = %table.name(), "validated table definition");
            tables.insert(key.clone(), table);
        }

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            region: settings.region.clone(),
            client,
            tables,
        })
    }

    /// Parse and validate the `[amazon.dynamodb]` section of a TOML document.
    pub fn from_toml_str(document: &str) -> DynamoDbConfigResult<Self> {
        let file: ApplicationFile = toml::from_str(document)?;
        Ok(Self::from_settings(&file.amazon.dynamodb)?)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> DynamoDbConfigResult<Self> {
        let path = path.as_ref();
        let document =
            std::fs::read_to_string(path).map_err(|source| DynamoDbConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let properties = Self::from_toml_str(&document)?;
        info!(
            path = %path.display(),
            endpoint = %properties.endpoint,
            region = %properties.region,
            tables = properties.tables.len(),
            "loaded DynamoDB properties"
        );
        Ok(properties)
    }

    /// Service endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Service region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Client timeout and retry policy.
    #[must_use]
    pub fn client(&self) -> &ClientTimeoutPolicy {
        &self.client
    }

    /// The table configured under a logical key.
    ///
    /// The key is not the table name: each environment has its own physical
    /// name for the same logical table.
    ///
    /// # Errors
    ///
    /// Returns [`DynamoDbConfigError::TableNotFound`] if no table is
    /// configured under `table_key`.
    pub fn table_by_key(&self, table_key: &str) -> DynamoDbConfigResult<&TableDefinition> {
        self.tables
            .get(table_key)
            .ok_or_else(|| DynamoDbConfigError::TableNotFound(table_key.to_owned()))
    }

    /// All tables with their logical keys, in key order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableDefinition)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for DynamoDbProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "endpoint={} region={} client=[{}] tables=[",
            self.endpoint, self.region, self.client
        )?;
        for (i, (key, table)) in self.tables.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={}", table.name())?;
        }
        f.write_str("]")
    }
}
