// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Plan - Resolved Intent for the Provisioning Engine
//!
//! A [`DeploymentPlan`] is derived from a [`ComponentConfig`] after
//! `resolve_defaults()`. It spells out every choice the engine needs: subnet
//! placement per tier, the Aurora cluster, the Fargate service, load
//! balancer listeners, and the optional certificate + DNS record. Building a
//! plan is pure; nothing here talks to a cloud API.
//!
//! # Resource Naming
//!
//! All resource names derive from the component name:
//!
//! ```text
//! {name}-metabase            base name (cluster, task, target group, ...)
//! {name}-metabase-sg         service + database security group
//! {name}-metabase-lb-sg      load balancer security group
//! {name}-metabase-segment    service ingress rule from the load balancer
//! {name}-metabase-self       service ingress rule from itself
//! {name}-metabase-egress     service egress rule
//! {name}-metabase-certvalidation  certificate validation record
//! {name}metabasemysql        Aurora cluster identifier
//! {name}metabasefinalsnapshot final snapshot identifier
//! ```
//!
//! # Updates
//!
//! [`DeploymentPlan::diff`] compares a previously applied plan with a new one.
//! An engine version change is flagged as disruptive: Aurora upgrades take
//! the database offline.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

use crate::domain::{
    ComponentConfig, ComponentName, CustomDomainConfig, DomainBinding, SubnetPlacement,
    SubnetTier, VpcId, BASELINE_ENGINE_VERSION, DEFAULT_METABASE_VERSION,
};

/// Port the `metabase/metabase` image serves HTTP on
pub const METABASE_PORT: u16 = 3000;

/// Container image repository
pub const METABASE_IMAGE_REPOSITORY: &str = "metabase/metabase";

/// TLS policy for the HTTPS listener
pub const TLS_POLICY: &str = "ELBSecurityPolicy-TLS-1-2-2017-01";

const DATABASE_NAME: &str = "metabase";
const DATABASE_MASTER_USERNAME: &str = "admin";
const DATABASE_PASSWORD_LENGTH: u8 = 20;
const TASK_CPU_UNITS: u32 = 2048;
const TASK_MEMORY_MIB: u32 = 8192;
const LOAD_BALANCER_IDLE_TIMEOUT_SECS: u32 = 600;
const CONTAINER_TIMEZONE: &str = "US/Pacific";
const CERTIFICATE_VALIDATION_TTL_SECS: u32 = 60;
const ANYWHERE: &str = "0.0.0.0/0";

/// Everything the engine needs to realise one component instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPlan {
    pub component: ComponentName,
    /// `{name}-metabase`
    pub base_resource_name: String,
    pub network: NetworkPlan,
    pub database: DatabasePlan,
    pub service: ServicePlan,
    pub load_balancer: LoadBalancerPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainPlan>,
}

/// Network placement and security groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPlan {
    pub vpc_id: VpcId,
    pub compute: SubnetPlacement,
    pub database: SubnetPlacement,
    pub load_balancer: SubnetPlacement,
    /// Tasks get a public IP when they land in engine-selected public subnets
    pub assign_public_ip: bool,
    pub service_security_group: String,
    pub load_balancer_security_group: String,
    /// Rules of both security groups, load balancer group first
    pub security_group_rules: Vec<SecurityGroupRulePlan>,
}

impl NetworkPlan {
    pub fn placement(&self, tier: SubnetTier) -> &SubnetPlacement {
        match tier {
            SubnetTier::Compute => &self.compute,
            SubnetTier::Database => &self.database,
            SubnetTier::LoadBalancer => &self.load_balancer,
        }
    }

    /// Rules attached to the named security group
    pub fn rules_for<'a>(
        &'a self,
        security_group: &'a str,
    ) -> impl Iterator<Item = &'a SecurityGroupRulePlan> + 'a {
        self.security_group_rules
            .iter()
            .filter(move |rule| rule.security_group == security_group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleDirection {
    Ingress,
    Egress,
}

/// Other side of a security group rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum RulePeer {
    Cidr(String),
    /// Security group by plan name; the engine resolves it to an id
    SecurityGroup(String),
}

/// One TCP rule of a security group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupRulePlan {
    /// Standalone rule resource name; `None` for rules inlined in the group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub security_group: String,
    pub direction: RuleDirection,
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
    pub peer: RulePeer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SecurityGroupRulePlan {
    fn tcp(
        security_group: &str,
        direction: RuleDirection,
        ports: (u16, u16),
        peer: RulePeer,
    ) -> Self {
        Self {
            name: None,
            security_group: security_group.to_string(),
            direction,
            protocol: "tcp".to_string(),
            from_port: ports.0,
            to_port: ports.1,
            peer,
            description: None,
        }
    }

    fn named(mut self, name: String, description: &str) -> Self {
        self.name = Some(name);
        self.description = Some(description.to_string());
        self
    }

    pub fn covers_port(&self, port: u16) -> bool {
        (self.from_port..=self.to_port).contains(&port)
    }
}

/// Aurora MySQL cluster settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePlan {
    pub engine: String,
    pub engine_mode: String,
    pub engine_version: String,
    pub database_name: String,
    pub master_username: String,
    /// Length of the generated master password (alphanumeric only)
    pub password_length: u8,
    pub cluster_identifier: String,
    pub final_snapshot_identifier: String,
    pub http_endpoint_enabled: bool,
}

/// Fargate service and task settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePlan {
    pub launch_type: String,
    pub task_family: String,
    pub execution_role: String,
    pub image: String,
    pub cpu: u32,
    pub memory: u32,
    pub container_port: u16,
    pub desired_count: u32,
    pub deployment_maximum_percent: u32,
    pub deployment_minimum_healthy_percent: u32,
}

/// Application load balancer and its listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerPlan {
    pub load_balancer_type: String,
    pub idle_timeout_secs: u32,
    pub target_port: u16,
    pub target_type: String,
    /// Single-task service: drain immediately to keep redeploys short
    pub deregistration_delay_secs: u32,
    pub listeners: Vec<ListenerPlan>,
}

impl LoadBalancerPlan {
    pub fn listener(&self, port: u16) -> Option<&ListenerPlan> {
        self.listeners.iter().find(|l| l.port == port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListenerProtocol {
    Http,
    Https,
}

impl fmt::Display for ListenerProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerProtocol::Http => write!(f, "HTTP"),
            ListenerProtocol::Https => write!(f, "HTTPS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ListenerAction {
    /// Forward to the Metabase target group
    Forward,
    /// Permanent redirect to another protocol/port
    #[serde(rename_all = "camelCase")]
    Redirect {
        protocol: ListenerProtocol,
        port: u16,
        status_code: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerPlan {
    pub port: u16,
    pub protocol: ListenerProtocol,
    pub action: ListenerAction,
    /// Uses the domain certificate; set only for HTTPS
    pub uses_certificate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_policy: Option<String>,
}

/// Certificate and alias record for a custom domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPlan {
    pub binding: DomainBinding,
    pub certificate_validation_method: String,
    pub certificate_validation_record: ValidationRecordPlan,
    pub record_type: String,
    pub endpoint_url: String,
}

/// DNS record proving domain ownership to the certificate authority
///
/// Record name, type and value come from the issued certificate at apply
/// time; the plan fixes the resource name, zone and TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecordPlan {
    pub resource_name: String,
    pub hosted_zone_name: String,
    pub ttl_secs: u32,
}

/// Connection details of the provisioned database, known only after apply
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseEndpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database_name: String,
}

impl fmt::Debug for DatabaseEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database_name", &self.database_name)
            .finish()
    }
}

/// One significant difference between an applied plan and a new one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanChange {
    /// Aurora engine upgrade/downgrade (causes an outage)
    EngineVersion { from: String, to: String },
    /// Different target VPC (replaces every resource)
    Vpc { from: VpcId, to: VpcId },
    MetabaseImage { from: String, to: String },
    SubnetPlacement {
        tier: SubnetTier,
        from: SubnetPlacement,
        to: SubnetPlacement,
    },
    DomainBinding {
        from: Option<DomainBinding>,
        to: Option<DomainBinding>,
    },
}

impl PlanChange {
    /// Whether applying this change takes the service down
    pub fn is_disruptive(&self) -> bool {
        matches!(self, PlanChange::EngineVersion { .. } | PlanChange::Vpc { .. })
    }
}

impl fmt::Display for PlanChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanChange::EngineVersion { from, to } => {
                write!(f, "database engine version {} -> {} (disruptive)", from, to)
            }
            PlanChange::Vpc { from, to } => write!(f, "vpc {} -> {} (disruptive)", from, to),
            PlanChange::MetabaseImage { from, to } => write!(f, "image {} -> {}", from, to),
            PlanChange::SubnetPlacement { tier, .. } => {
                write!(f, "{} subnet placement changed", tier)
            }
            PlanChange::DomainBinding { to, .. } => match to {
                Some(binding) => write!(f, "domain bound to {}", binding.domain_name),
                None => write!(f, "domain binding removed"),
            },
        }
    }
}

impl DeploymentPlan {
    /// Derive the plan for `name` from `config`
    ///
    /// Defaults are resolved first, so building from a raw or an already
    /// resolved configuration yields the same plan.
    pub fn build(name: &ComponentName, config: &ComponentConfig) -> Self {
        let resolved = config.resolve_defaults();
        let base = format!("{}-metabase", name);

        let networking = resolved.networking().cloned().unwrap_or_default();
        if networking.is_partial() {
            debug!(
                component = %name,
                explicit = ?networking.explicit_tiers(),
                "Mixing explicit and engine-selected subnet placement"
            );
        }

        let compute = networking.placement(SubnetTier::Compute);
        let service_security_group = format!("{}-sg", base);
        let load_balancer_security_group = format!("{}-lb-sg", base);
        let security_group_rules =
            security_group_rules(&base, &service_security_group, &load_balancer_security_group);
        let network = NetworkPlan {
            vpc_id: resolved.vpc_id().clone(),
            assign_public_ip: compute.is_engine_selected(),
            compute,
            database: networking.placement(SubnetTier::Database),
            load_balancer: networking.placement(SubnetTier::LoadBalancer),
            service_security_group,
            load_balancer_security_group,
            security_group_rules,
        };

        let engine_version = resolved
            .database()
            .map(|db| db.engine_version().to_string())
            .unwrap_or_else(|| BASELINE_ENGINE_VERSION.to_string());

        let database = DatabasePlan {
            engine: "aurora-mysql".to_string(),
            engine_mode: "serverless".to_string(),
            engine_version,
            database_name: DATABASE_NAME.to_string(),
            master_username: DATABASE_MASTER_USERNAME.to_string(),
            password_length: DATABASE_PASSWORD_LENGTH,
            cluster_identifier: format!("{}metabasemysql", name),
            final_snapshot_identifier: format!("{}metabasefinalsnapshot", name),
            http_endpoint_enabled: true,
        };

        let version = resolved.metabase_version().unwrap_or(DEFAULT_METABASE_VERSION);
        let service = ServicePlan {
            launch_type: "FARGATE".to_string(),
            task_family: "metabase".to_string(),
            execution_role: "ecsTaskExecutionRole".to_string(),
            image: format!("{}:{}", METABASE_IMAGE_REPOSITORY, version),
            cpu: TASK_CPU_UNITS,
            memory: TASK_MEMORY_MIB,
            container_port: METABASE_PORT,
            desired_count: 1,
            deployment_maximum_percent: 100,
            deployment_minimum_healthy_percent: 0,
        };

        let binding = resolved.domain().and_then(CustomDomainConfig::binding).cloned();
        let load_balancer = LoadBalancerPlan {
            load_balancer_type: "application".to_string(),
            idle_timeout_secs: LOAD_BALANCER_IDLE_TIMEOUT_SECS,
            target_port: METABASE_PORT,
            target_type: "ip".to_string(),
            deregistration_delay_secs: 0,
            listeners: listeners_for(binding.is_some()),
        };

        let domain = binding.map(|binding| DomainPlan {
            endpoint_url: binding.endpoint_url(),
            certificate_validation_record: ValidationRecordPlan {
                resource_name: format!("{}-certvalidation", base),
                hosted_zone_name: binding.hosted_zone_name.clone(),
                ttl_secs: CERTIFICATE_VALIDATION_TTL_SECS,
            },
            binding,
            certificate_validation_method: "DNS".to_string(),
            record_type: "A".to_string(),
        });

        Self {
            component: name.clone(),
            base_resource_name: base,
            network,
            database,
            service,
            load_balancer,
            domain,
        }
    }

    /// Public endpoint: the custom domain URL when bound
    pub fn endpoint_url(&self) -> Option<&str> {
        self.domain.as_ref().map(|d| d.endpoint_url.as_str())
    }

    /// Significant changes from `previous` to `self`
    pub fn diff(&self, previous: &DeploymentPlan) -> Vec<PlanChange> {
        let mut changes = Vec::new();

        if self.network.vpc_id != previous.network.vpc_id {
            changes.push(PlanChange::Vpc {
                from: previous.network.vpc_id.clone(),
                to: self.network.vpc_id.clone(),
            });
        }

        if self.database.engine_version != previous.database.engine_version {
            changes.push(PlanChange::EngineVersion {
                from: previous.database.engine_version.clone(),
                to: self.database.engine_version.clone(),
            });
        }

        if self.service.image != previous.service.image {
            changes.push(PlanChange::MetabaseImage {
                from: previous.service.image.clone(),
                to: self.service.image.clone(),
            });
        }

        for tier in SubnetTier::ALL {
            let (from, to) = (previous.network.placement(tier), self.network.placement(tier));
            if from != to {
                changes.push(PlanChange::SubnetPlacement {
                    tier,
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        let from = previous.domain.as_ref().map(|d| d.binding.clone());
        let to = self.domain.as_ref().map(|d| d.binding.clone());
        if from != to {
            changes.push(PlanChange::DomainBinding { from, to });
        }

        changes
    }

    /// ECS container definitions for the Metabase task
    ///
    /// Rendered once the engine knows the database endpoint.
    pub fn container_definitions(&self, endpoint: &DatabaseEndpoint) -> Value {
        let environment = [
            ("JAVA_TIMEZONE", CONTAINER_TIMEZONE.to_string()),
            ("MB_DB_TYPE", "mysql".to_string()),
            ("MB_DB_DBNAME", endpoint.database_name.clone()),
            ("MB_DB_PORT", endpoint.port.to_string()),
            ("MB_DB_USER", endpoint.username.clone()),
            ("MB_DB_PASS", endpoint.password.clone()),
            ("MB_DB_HOST", endpoint.host.clone()),
        ]
        .into_iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect::<Vec<_>>();

        json!([{
            "name": "metabase",
            "image": self.service.image,
            "portMappings": [{ "containerPort": self.service.container_port }],
            "environment": environment,
        }])
    }
}

fn security_group_rules(
    base: &str,
    service_group: &str,
    load_balancer_group: &str,
) -> Vec<SecurityGroupRulePlan> {
    use RuleDirection::{Egress, Ingress};
    let anywhere = || RulePeer::Cidr(ANYWHERE.to_string());

    vec![
        SecurityGroupRulePlan::tcp(load_balancer_group, Ingress, (443, 443), anywhere()),
        SecurityGroupRulePlan::tcp(load_balancer_group, Ingress, (80, 80), anywhere()),
        SecurityGroupRulePlan::tcp(
            load_balancer_group,
            Egress,
            (METABASE_PORT, METABASE_PORT),
            RulePeer::SecurityGroup(service_group.to_string()),
        ),
        SecurityGroupRulePlan::tcp(load_balancer_group, Egress, (443, 443), anywhere()),
        SecurityGroupRulePlan::tcp(
            service_group,
            Ingress,
            (METABASE_PORT, METABASE_PORT),
            RulePeer::SecurityGroup(load_balancer_group.to_string()),
        )
        .named(
            format!("{}-segment", base),
            "Allow access to Metabase from the Load Balancer",
        ),
        SecurityGroupRulePlan::tcp(
            service_group,
            Ingress,
            (0, u16::MAX),
            RulePeer::SecurityGroup(service_group.to_string()),
        )
        .named(
            format!("{}-self", base),
            "Allow access to anything from within the Security Group",
        ),
        SecurityGroupRulePlan::tcp(service_group, Egress, (0, u16::MAX), anywhere())
            .named(format!("{}-egress", base), "Allow egress to anywhere"),
    ]
}

fn listeners_for(has_domain: bool) -> Vec<ListenerPlan> {
    if has_domain {
        vec![
            ListenerPlan {
                port: 443,
                protocol: ListenerProtocol::Https,
                action: ListenerAction::Forward,
                uses_certificate: true,
                ssl_policy: Some(TLS_POLICY.to_string()),
            },
            ListenerPlan {
                port: 80,
                protocol: ListenerProtocol::Http,
                action: ListenerAction::Redirect {
                    protocol: ListenerProtocol::Https,
                    port: 443,
                    status_code: "HTTP_301".to_string(),
                },
                uses_certificate: false,
                ssl_policy: None,
            },
        ]
    } else {
        // No certificate without a domain: plain HTTP only
        vec![ListenerPlan {
            port: 80,
            protocol: ListenerProtocol::Http,
            action: ListenerAction::Forward,
            uses_certificate: false,
            ssl_policy: None,
        }]
    }
}
