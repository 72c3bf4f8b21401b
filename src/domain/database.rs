// Copyright (c) 2025 - Cowboy AI, Inc.
//! Database Configuration - Aurora MySQL Engine Version
//!
//! The engine version is optional at the argument boundary and materialised
//! to [`BASELINE_ENGINE_VERSION`] on construction. A change of this value on
//! an existing deployment is an engine upgrade, which causes an outage, so
//! the value is carried byte-for-byte and never normalised.

use serde::{Deserialize, Serialize};

use super::invariants::{check_present_value, fields, ConfigViolation, InvalidConfig};
use super::setting::Setting;

/// Engine version used when the caller does not choose one
pub const BASELINE_ENGINE_VERSION: &str = "5.7.mysql_aurora.2.08.3";

/// Database arguments as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseArgs {
    /// Aurora MySQL engine version; changing it on a live deployment upgrades the cluster
    #[serde(default, skip_serializing_if = "Setting::is_unset")]
    pub engine_version: Setting<String>,
}

impl DatabaseArgs {
    /// Only structural checks; whether the version exists is up to the engine
    pub fn validate(&self) -> Vec<ConfigViolation> {
        self.engine_version
            .as_option()
            .and_then(|v| check_present_value(fields::ENGINE_VERSION, v))
            .into_iter()
            .collect()
    }
}

/// Validated database configuration with a concrete engine version
///
/// # Examples
///
/// ```rust
/// use metabase_component::domain::{DatabaseConfig, Setting, BASELINE_ENGINE_VERSION};
///
/// let db = DatabaseConfig::new(Setting::Unset).unwrap();
/// assert_eq!(db.engine_version(), BASELINE_ENGINE_VERSION);
///
/// assert!(DatabaseConfig::new(Setting::Value(String::new())).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DatabaseArgs", into = "DatabaseArgs")]
pub struct DatabaseConfig {
    engine_version: String,
}

impl DatabaseConfig {
    pub fn new(engine_version: Setting<String>) -> Result<Self, InvalidConfig> {
        Self::try_from(DatabaseArgs { engine_version })
    }

    /// Configuration pinned to [`BASELINE_ENGINE_VERSION`]
    pub fn baseline() -> Self {
        Self {
            engine_version: BASELINE_ENGINE_VERSION.to_string(),
        }
    }

    pub fn engine_version(&self) -> &str {
        &self.engine_version
    }

    pub fn is_baseline(&self) -> bool {
        self.engine_version == BASELINE_ENGINE_VERSION
    }

    /// Whether applying `self` over `deployed` would upgrade the engine
    pub fn is_upgrade_from(&self, deployed: &DatabaseConfig) -> bool {
        self.engine_version != deployed.engine_version
    }

    pub fn validate(&self) -> Vec<ConfigViolation> {
        DatabaseArgs::from(self.clone()).validate()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl TryFrom<DatabaseArgs> for DatabaseConfig {
    type Error = InvalidConfig;

    fn try_from(args: DatabaseArgs) -> Result<Self, Self::Error> {
        InvalidConfig::check(args.validate())?;
        Ok(Self {
            engine_version: args
                .engine_version
                .materialize(|| BASELINE_ENGINE_VERSION.to_string()),
        })
    }
}

impl From<DatabaseConfig> for DatabaseArgs {
    fn from(config: DatabaseConfig) -> Self {
        Self {
            engine_version: Setting::Value(config.engine_version),
        }
    }
}
