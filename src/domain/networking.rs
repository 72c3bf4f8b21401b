// Copyright (c) 2025 - Cowboy AI, Inc.
//! Networking Configuration - Subnet Placement per Tier
//!
//! The component places resources in three logical network tiers:
//!
//! | Tier           | Schema field   | Resources                        |
//! |----------------|----------------|----------------------------------|
//! | Compute        | `ecsSubnetIds` | Fargate service tasks            |
//! | Database       | `dbSubnetIds`  | Aurora subnet group              |
//! | Load balancer  | `lbSubnetIds`  | Application load balancer        |
//!
//! Each tier is independently optional. A tier without explicit subnets is
//! [`SubnetPlacement::EngineSelected`]: the engine picks two public subnets
//! in distinct availability zones of the VPC.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::identifiers::SubnetId;
use super::invariants::{
    check_identifier_format, check_identifier_list, fields, ConfigViolation, InvalidConfig,
};

/// Logical network tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubnetTier {
    Compute,
    Database,
    LoadBalancer,
}

impl SubnetTier {
    pub const ALL: [SubnetTier; 3] = [
        SubnetTier::Compute,
        SubnetTier::Database,
        SubnetTier::LoadBalancer,
    ];

    /// Schema path of the field that configures this tier
    pub fn field(&self) -> &'static str {
        match self {
            SubnetTier::Compute => fields::ECS_SUBNET_IDS,
            SubnetTier::Database => fields::DB_SUBNET_IDS,
            SubnetTier::LoadBalancer => fields::LB_SUBNET_IDS,
        }
    }
}

impl fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetTier::Compute => write!(f, "compute"),
            SubnetTier::Database => write!(f, "database"),
            SubnetTier::LoadBalancer => write!(f, "load-balancer"),
        }
    }
}

/// Where the engine should place one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "subnetIds", rename_all = "camelCase")]
pub enum SubnetPlacement {
    /// Engine chooses (two public subnets in distinct availability zones)
    EngineSelected,
    /// Caller-specified subnets, in caller order
    Explicit(Vec<SubnetId>),
}

impl SubnetPlacement {
    pub fn is_engine_selected(&self) -> bool {
        matches!(self, SubnetPlacement::EngineSelected)
    }
}

/// Networking arguments as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkingArgs {
    /// Subnets for the Metabase service tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecs_subnet_ids: Option<Vec<String>>,

    /// Subnets for the database subnet group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_subnet_ids: Option<Vec<String>>,

    /// Subnets for the load balancer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_subnet_ids: Option<Vec<String>>,
}

impl NetworkingArgs {
    fn tier(&self, tier: SubnetTier) -> Option<&Vec<String>> {
        match tier {
            SubnetTier::Compute => self.ecs_subnet_ids.as_ref(),
            SubnetTier::Database => self.db_subnet_ids.as_ref(),
            SubnetTier::LoadBalancer => self.lb_subnet_ids.as_ref(),
        }
    }

    /// Construction rules: present lists are non-empty and duplicate-free
    pub fn check_structure(&self) -> Vec<ConfigViolation> {
        SubnetTier::ALL
            .iter()
            .filter_map(|tier| self.tier(*tier).map(|ids| check_identifier_list(tier.field(), ids)))
            .flatten()
            .collect()
    }

    /// Construction rules plus the best-effort `subnet-…` format check
    pub fn validate(&self) -> Vec<ConfigViolation> {
        let mut violations = self.check_structure();
        if !violations.is_empty() {
            return violations;
        }
        for tier in SubnetTier::ALL {
            if let Some(ids) = self.tier(tier) {
                violations.extend(
                    ids.iter()
                        .filter_map(|id| check_identifier_format(tier.field(), id, SubnetId::PREFIX)),
                );
            }
        }
        violations
    }
}

/// Validated networking configuration
///
/// # Invariants
/// - Every present list is non-empty
/// - No list contains the same identifier twice
/// - Order of identifiers is preserved exactly as given
///
/// # Examples
///
/// ```rust
/// use metabase_component::domain::{NetworkingConfig, SubnetTier};
///
/// let networking = NetworkingConfig::builder()
///     .ecs_subnet_ids(["subnet-123", "subnet-456"])
///     .build()
///     .unwrap();
///
/// assert!(networking.placement(SubnetTier::Database).is_engine_selected());
/// assert!(NetworkingConfig::builder().lb_subnet_ids(["subnet-1", "subnet-1"]).build().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NetworkingArgs", into = "NetworkingArgs")]
pub struct NetworkingConfig {
    ecs_subnet_ids: Option<Vec<SubnetId>>,
    db_subnet_ids: Option<Vec<SubnetId>>,
    lb_subnet_ids: Option<Vec<SubnetId>>,
}

impl NetworkingConfig {
    /// Create a networking configuration from 0–3 subnet lists
    pub fn new(
        ecs_subnet_ids: Option<Vec<String>>,
        db_subnet_ids: Option<Vec<String>>,
        lb_subnet_ids: Option<Vec<String>>,
    ) -> Result<Self, InvalidConfig> {
        Self::try_from(NetworkingArgs {
            ecs_subnet_ids,
            db_subnet_ids,
            lb_subnet_ids,
        })
    }

    /// All tiers left to the engine
    pub fn engine_selected() -> Self {
        Self::default()
    }

    pub fn builder() -> NetworkingConfigBuilder {
        NetworkingConfigBuilder::default()
    }

    pub fn ecs_subnet_ids(&self) -> Option<&[SubnetId]> {
        self.ecs_subnet_ids.as_deref()
    }

    pub fn db_subnet_ids(&self) -> Option<&[SubnetId]> {
        self.db_subnet_ids.as_deref()
    }

    pub fn lb_subnet_ids(&self) -> Option<&[SubnetId]> {
        self.lb_subnet_ids.as_deref()
    }

    pub fn subnet_ids(&self, tier: SubnetTier) -> Option<&[SubnetId]> {
        match tier {
            SubnetTier::Compute => self.ecs_subnet_ids(),
            SubnetTier::Database => self.db_subnet_ids(),
            SubnetTier::LoadBalancer => self.lb_subnet_ids(),
        }
    }

    pub fn placement(&self, tier: SubnetTier) -> SubnetPlacement {
        match self.subnet_ids(tier) {
            Some(ids) => SubnetPlacement::Explicit(ids.to_vec()),
            None => SubnetPlacement::EngineSelected,
        }
    }

    /// Tiers with caller-specified subnets
    pub fn explicit_tiers(&self) -> Vec<SubnetTier> {
        SubnetTier::ALL
            .into_iter()
            .filter(|tier| self.subnet_ids(*tier).is_some())
            .collect()
    }

    pub fn is_engine_selected(&self) -> bool {
        self.explicit_tiers().is_empty()
    }

    /// Some but not all tiers are explicit
    pub fn is_partial(&self) -> bool {
        let explicit = self.explicit_tiers().len();
        explicit > 0 && explicit < SubnetTier::ALL.len()
    }

    /// Re-check construction invariants plus the `subnet-…` format check
    pub fn validate(&self) -> Vec<ConfigViolation> {
        NetworkingArgs::from(self.clone()).validate()
    }
}

impl TryFrom<NetworkingArgs> for NetworkingConfig {
    type Error = InvalidConfig;

    fn try_from(args: NetworkingArgs) -> Result<Self, Self::Error> {
        InvalidConfig::check(args.check_structure())?;

        Ok(Self {
            ecs_subnet_ids: to_subnet_ids(fields::ECS_SUBNET_IDS, args.ecs_subnet_ids)?,
            db_subnet_ids: to_subnet_ids(fields::DB_SUBNET_IDS, args.db_subnet_ids)?,
            lb_subnet_ids: to_subnet_ids(fields::LB_SUBNET_IDS, args.lb_subnet_ids)?,
        })
    }
}

impl From<NetworkingConfig> for NetworkingArgs {
    fn from(config: NetworkingConfig) -> Self {
        let to_strings = |ids: Option<Vec<SubnetId>>| -> Option<Vec<String>> {
            ids.map(|ids| ids.into_iter().map(String::from).collect())
        };

        Self {
            ecs_subnet_ids: to_strings(config.ecs_subnet_ids),
            db_subnet_ids: to_strings(config.db_subnet_ids),
            lb_subnet_ids: to_strings(config.lb_subnet_ids),
        }
    }
}

fn to_subnet_ids(
    field: &str,
    ids: Option<Vec<String>>,
) -> Result<Option<Vec<SubnetId>>, InvalidConfig> {
    ids.map(|ids| {
        ids.into_iter()
            .map(|id| SubnetId::new(id).map_err(|rule| InvalidConfig::single(field, rule)))
            .collect::<Result<Vec<_>, _>>()
    })
    .transpose()
}

/// Builder for [`NetworkingConfig`]
#[derive(Debug, Clone, Default)]
pub struct NetworkingConfigBuilder {
    args: NetworkingArgs,
}

impl NetworkingConfigBuilder {
    pub fn ecs_subnet_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.ecs_subnet_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn db_subnet_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.db_subnet_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn lb_subnet_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.lb_subnet_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<NetworkingConfig, InvalidConfig> {
        NetworkingConfig::try_from(self.args)
    }
}
