//! Table definitions keyed by a logical name.
//!
//! Code refers to tables by a logical key; the physical table name differs
//! per environment and lives in [`TableDefinition::name`].

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DynamoDbConfigError, DynamoDbConfigResult, ValidationError};
use crate::ttl::{TimeToLive, TimeToLiveSettings};

/// Raw `tables.<key>` settings as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TableSettings {
    /// Physical table name.
    #[serde(default)]
    pub name: String,
    /// Time-to-live settings by key.
    #[serde(default)]
    pub time_to_live: BTreeMap<String, TimeToLiveSettings>,
}

/// A validated table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    name: String,
    time_to_live: BTreeMap<String, TimeToLive>,
}

impl TableDefinition {
    /// Create a table definition from already validated time-to-live values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Blank`] if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        time_to_live: impl IntoIterator<Item = (String, TimeToLive)>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Blank("name"));
        }
        Ok(Self {
            name,
            time_to_live: time_to_live.into_iter().collect(),
        })
    }

    /// Validate raw settings. Errors carry the path of the failing entry.
    pub fn from_settings(settings: &TableSettings) -> Result<Self, ValidationError> {
        let mut time_to_live = BTreeMap::new();
        for (key, ttl) in &settings.time_to_live {
            let ttl = TimeToLive::from_settings(ttl)
                .map_err(|e| e.at(format!("time-to-live.{key}")))?;
            time_to_live.insert(key.clone(), ttl);
        }
        Self::new(settings.name.clone(), time_to_live)
    }

    /// Physical table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The time-to-live configured under `key`.
    ///
    /// Callers are expected to branch on [`Self::is_time_to_live_enabled`]
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`DynamoDbConfigError::TimeToLiveNotFound`] if `key` is not
    /// configured, and [`DynamoDbConfigError::TimeToLiveDisabled`] if it is
    /// configured but disabled.
    pub fn time_to_live(&self, key: &str) -> DynamoDbConfigResult<Duration> {
        let ttl = self
            .time_to_live
            .get(key)
            .ok_or_else(|| DynamoDbConfigError::TimeToLiveNotFound {
                table: self.name.clone(),
                key: key.to_owned(),
            })?;
        if !ttl.is_enabled() {
            return Err(DynamoDbConfigError::TimeToLiveDisabled {
                table: self.name.clone(),
                key: key.to_owned(),
            });
        }
        Ok(ttl.value())
    }

    /// Whether `key` is configured with a positive time-to-live. Never fails.
    #[must_use]
    pub fn is_time_to_live_enabled(&self, key: &str) -> bool {
        self.time_to_live
            .get(key)
            .is_some_and(TimeToLive::is_enabled)
    }

    /// Configured time-to-live keys, enabled or not, in key order.
    pub fn time_to_live_keys(&self) -> impl Iterator<Item = &str> {
        self.time_to_live.keys().map(String::as_str)
    }
}
