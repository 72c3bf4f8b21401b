// Copyright (c) 2025 - Cowboy AI, Inc.
//! Component Configuration - Composition Root
//!
//! [`ComponentConfig`] aggregates the required VPC identifier with the
//! optional Metabase version and the three optional sub-configurations. It is
//! the single value a caller hands to the component to express deployment
//! intent.
//!
//! # Lifecycle
//!
//! ```text
//! MetabaseArgs ──try_from──> ComponentConfig ──validate()──> [] ──resolve_defaults()──> plan
//!      │                          │
//!      └── validate(): every violation at once, nothing constructed
//! ```
//!
//! Construction enforces the structural rules (non-empty values, non-empty
//! duplicate-free subnet lists, complete domain pairs). `validate()` re-checks
//! them and adds the best-effort identifier format checks. Neither performs
//! I/O; VPC membership and engine-version support are the engine's call.

use serde::{Deserialize, Serialize};

use super::custom_domain::{CustomDomainArgs, CustomDomainConfig};
use super::database::{DatabaseArgs, DatabaseConfig};
use super::identifiers::VpcId;
use super::invariants::{
    check_identifier_format, check_optional_value, check_present_value, fields,
    ConfigViolation, InvalidConfig, ViolationRule,
};
use super::networking::{NetworkingArgs, NetworkingConfig};
use super::setting::Setting;

/// Metabase image tag used when the caller does not pin one
pub const DEFAULT_METABASE_VERSION: &str = "latest";

/// Component arguments as supplied by the caller
///
/// Field names follow the component schema (`vpcId`, `metabaseVersion`,
/// `networking`, `database`, `domain`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetabaseArgs {
    /// Target VPC; required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,

    /// Metabase image tag; `latest` when unset
    #[serde(default, skip_serializing_if = "Setting::is_unset")]
    pub metabase_version: Setting<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking: Option<NetworkingArgs>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseArgs>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<CustomDomainArgs>,
}

impl MetabaseArgs {
    /// Arguments with only the VPC set
    pub fn for_vpc(vpc_id: impl Into<String>) -> Self {
        Self {
            vpc_id: Some(vpc_id.into()),
            ..Self::default()
        }
    }

    fn check_root_and_leaves(&self) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();

        match self.vpc_id.as_deref() {
            None => violations.push(ConfigViolation::new(fields::VPC_ID, ViolationRule::Missing)),
            Some(vpc_id) => violations.extend(check_present_value(fields::VPC_ID, vpc_id)),
        }

        violations.extend(check_optional_value(
            fields::METABASE_VERSION,
            self.metabase_version.as_option().map(String::as_str),
        ));

        if let Some(database) = &self.database {
            violations.extend(database.validate());
        }
        if let Some(domain) = &self.domain {
            violations.extend(domain.validate());
        }

        violations
    }

    /// Rules enforced when constructing a [`ComponentConfig`]
    pub fn check_structure(&self) -> Vec<ConfigViolation> {
        let mut violations = self.check_root_and_leaves();
        if let Some(networking) = &self.networking {
            violations.extend(networking.check_structure());
        }
        violations
    }

    /// Every locally detectable violation, including identifier formats
    ///
    /// An empty result means the arguments are acceptable to submit.
    pub fn validate(&self) -> Vec<ConfigViolation> {
        let mut violations = self.check_root_and_leaves();

        if let Some(vpc_id) = self.vpc_id.as_deref() {
            if check_present_value(fields::VPC_ID, vpc_id).is_none() {
                violations.extend(check_identifier_format(fields::VPC_ID, vpc_id, VpcId::PREFIX));
            }
        }
        if let Some(networking) = &self.networking {
            violations.extend(networking.validate());
        }

        violations
    }
}

/// Validated deployment intent
///
/// Immutable once built; there are no setters. Use [`ComponentConfig::builder`]
/// or `TryFrom<MetabaseArgs>`.
///
/// # Examples
///
/// ```rust
/// use metabase_component::domain::{ComponentConfig, CustomDomainConfig, BASELINE_ENGINE_VERSION};
///
/// let config = ComponentConfig::builder("vpc-123")
///     .domain(CustomDomainConfig::bound("metabase.example.com", "example.com").unwrap())
///     .build()
///     .unwrap();
///
/// assert!(config.validate().is_empty());
///
/// let resolved = config.resolve_defaults();
/// assert_eq!(resolved.database().unwrap().engine_version(), BASELINE_ENGINE_VERSION);
/// assert!(resolved.networking().unwrap().is_engine_selected());
/// assert_eq!(resolved.resolve_defaults(), resolved);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MetabaseArgs", into = "MetabaseArgs")]
pub struct ComponentConfig {
    vpc_id: VpcId,
    metabase_version: Option<String>,
    networking: Option<NetworkingConfig>,
    database: Option<DatabaseConfig>,
    domain: Option<CustomDomainConfig>,
}

impl ComponentConfig {
    pub fn builder(vpc_id: impl Into<String>) -> ComponentConfigBuilder {
        ComponentConfigBuilder::new(vpc_id)
    }

    pub fn vpc_id(&self) -> &VpcId {
        &self.vpc_id
    }

    pub fn metabase_version(&self) -> Option<&str> {
        self.metabase_version.as_deref()
    }

    pub fn networking(&self) -> Option<&NetworkingConfig> {
        self.networking.as_ref()
    }

    pub fn database(&self) -> Option<&DatabaseConfig> {
        self.database.as_ref()
    }

    pub fn domain(&self) -> Option<&CustomDomainConfig> {
        self.domain.as_ref()
    }

    /// Re-check every invariant, plus best-effort identifier formats
    ///
    /// Returns every violation found; an empty list means the configuration
    /// is acceptable to submit to the provisioning engine.
    pub fn validate(&self) -> Vec<ConfigViolation> {
        let mut violations = Vec::new();

        violations.extend(check_identifier_format(
            fields::VPC_ID,
            self.vpc_id.as_str(),
            VpcId::PREFIX,
        ));
        violations.extend(check_optional_value(
            fields::METABASE_VERSION,
            self.metabase_version.as_deref(),
        ));

        if let Some(networking) = &self.networking {
            violations.extend(networking.validate());
        }
        if let Some(database) = &self.database {
            violations.extend(database.validate());
        }
        if let Some(domain) = &self.domain {
            violations.extend(domain.validate());
        }

        violations
    }

    /// Fully-populated copy with every default made explicit
    ///
    /// - networking absent → engine-selected for all tiers
    /// - database absent → [`BASELINE_ENGINE_VERSION`](super::BASELINE_ENGINE_VERSION)
    /// - Metabase version absent → [`DEFAULT_METABASE_VERSION`]
    /// - domain stays absent unless a complete binding was given
    ///
    /// Deterministic and idempotent.
    pub fn resolve_defaults(&self) -> ComponentConfig {
        ComponentConfig {
            vpc_id: self.vpc_id.clone(),
            metabase_version: Some(
                self.metabase_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_METABASE_VERSION.to_string()),
            ),
            networking: Some(self.networking.clone().unwrap_or_default()),
            database: Some(self.database.clone().unwrap_or_default()),
            domain: self.domain.clone().filter(CustomDomainConfig::is_bound),
        }
    }

    /// Whether [`resolve_defaults`](Self::resolve_defaults) would change nothing
    pub fn is_resolved(&self) -> bool {
        self.metabase_version.is_some()
            && self.networking.is_some()
            && self.database.is_some()
            && self.domain.as_ref().map_or(true, CustomDomainConfig::is_bound)
    }
}

impl TryFrom<MetabaseArgs> for ComponentConfig {
    type Error = InvalidConfig;

    fn try_from(args: MetabaseArgs) -> Result<Self, Self::Error> {
        InvalidConfig::check(args.check_structure())?;

        let vpc_id = args
            .vpc_id
            .ok_or_else(|| InvalidConfig::single(fields::VPC_ID, ViolationRule::Missing))
            .and_then(|id| VpcId::new(id).map_err(|rule| InvalidConfig::single(fields::VPC_ID, rule)))?;

        Ok(Self {
            vpc_id,
            metabase_version: args.metabase_version.into_option(),
            networking: args.networking.map(NetworkingConfig::try_from).transpose()?,
            database: args.database.map(DatabaseConfig::try_from).transpose()?,
            domain: args.domain.map(CustomDomainConfig::try_from).transpose()?,
        })
    }
}

impl From<ComponentConfig> for MetabaseArgs {
    fn from(config: ComponentConfig) -> Self {
        Self {
            vpc_id: Some(config.vpc_id.into()),
            metabase_version: config.metabase_version.into(),
            networking: config.networking.map(Into::into),
            database: config.database.map(Into::into),
            domain: config.domain.map(Into::into),
        }
    }
}

/// Builder for [`ComponentConfig`]
///
/// Sub-configurations are already validated values, so `build` only checks
/// the root fields.
#[derive(Debug, Clone)]
pub struct ComponentConfigBuilder {
    vpc_id: String,
    metabase_version: Setting<String>,
    networking: Option<NetworkingConfig>,
    database: Option<DatabaseConfig>,
    domain: Option<CustomDomainConfig>,
}

impl ComponentConfigBuilder {
    pub fn new(vpc_id: impl Into<String>) -> Self {
        Self {
            vpc_id: vpc_id.into(),
            metabase_version: Setting::Unset,
            networking: None,
            database: None,
            domain: None,
        }
    }

    pub fn metabase_version(mut self, version: impl Into<String>) -> Self {
        self.metabase_version = Setting::Value(version.into());
        self
    }

    pub fn networking(mut self, networking: NetworkingConfig) -> Self {
        self.networking = Some(networking);
        self
    }

    pub fn database(mut self, database: DatabaseConfig) -> Self {
        self.database = Some(database);
        self
    }

    pub fn domain(mut self, domain: CustomDomainConfig) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn build(self) -> Result<ComponentConfig, InvalidConfig> {
        let mut violations = Vec::new();
        violations.extend(check_present_value(fields::VPC_ID, &self.vpc_id));
        violations.extend(check_optional_value(
            fields::METABASE_VERSION,
            self.metabase_version.as_option().map(String::as_str),
        ));
        InvalidConfig::check(violations)?;

        let vpc_id =
            VpcId::new(self.vpc_id).map_err(|rule| InvalidConfig::single(fields::VPC_ID, rule))?;

        Ok(ComponentConfig {
            vpc_id,
            metabase_version: self.metabase_version.into_option(),
            networking: self.networking,
            database: self.database,
            domain: self.domain,
        })
    }
}
