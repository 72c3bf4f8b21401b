// Copyright (c) 2025 - Cowboy AI, Inc.
//! Component Contract - Boundary to the Provisioning Engine
//!
//! The provisioning engine is an external system: it receives a resolved
//! [`DeploymentPlan`] and creates or updates the cloud resources. This module
//! defines the seam ([`ProvisioningEngine`]) and the component that drives it
//! ([`MetabaseComponent`]).
//!
//! # Flow
//!
//! ```text
//! MetabaseArgs ─validate─> ComponentConfig ─resolve─> DeploymentPlan
//!                                                        │
//!                                                 ApplyRequest
//!                                                        │
//!                                         ProvisioningEngine::apply
//!                                                        │
//!                                                  ServiceHandle
//! ```
//!
//! # Failure Semantics
//!
//! - Every locally detectable problem fails before the engine is called.
//! - Engine errors are returned unmodified; nothing here retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{ComponentConfig, ComponentName, InvalidConfig, MetabaseArgs};
use crate::errors::{MetabaseError, MetabaseResult};
use crate::plan::{DeploymentPlan, PlanChange};

/// Error reported by the provisioning engine
///
/// Display is the engine's own message, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineError {
    /// Configuration problem only the engine can detect: unknown VPC, subnet
    /// outside the VPC, unsupported engine version, hosted zone not found
    #[error("{message}")]
    DeferredConfig {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        message: String,
    },

    /// Engine could not be reached or did not answer in time
    #[error("{message}")]
    Unavailable { message: String },

    /// Engine accepted the plan but provisioning failed
    #[error("{message}")]
    Failed { message: String },
}

impl EngineError {
    pub fn deferred(field: Option<&str>, message: impl Into<String>) -> Self {
        EngineError::DeferredConfig {
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        EngineError::Unavailable {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            EngineError::DeferredConfig { message, .. }
            | EngineError::Unavailable { message }
            | EngineError::Failed { message } => message,
        }
    }
}

/// A plan submitted to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub request_id: Uuid,
    pub component: ComponentName,
    pub plan: DeploymentPlan,
    /// Differences from the previously applied plan, if this is an update
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<PlanChange>,
    pub requested_at: DateTime<Utc>,
}

impl ApplyRequest {
    pub fn new(plan: DeploymentPlan) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            component: plan.component.clone(),
            plan,
            changes: Vec::new(),
            requested_at: Utc::now(),
        }
    }

    pub fn with_changes(mut self, changes: Vec<PlanChange>) -> Self {
        self.changes = changes;
        self
    }

    /// Whether any attached change takes the service down
    pub fn is_disruptive(&self) -> bool {
        self.changes.iter().any(PlanChange::is_disruptive)
    }
}

/// Handle to a deployed Metabase service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHandle {
    /// Externally reachable name: the custom domain when bound, otherwise the
    /// provider-assigned load balancer name
    pub dns_name: String,
    pub load_balancer_dns_name: String,
    /// Whether `dns_name` is a bound custom domain served over HTTPS
    #[serde(default)]
    pub custom_domain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_group_id: Option<String>,
}

impl ServiceHandle {
    /// Handle for a plan given the engine-assigned load balancer name
    pub fn for_plan(
        plan: &DeploymentPlan,
        load_balancer_dns_name: impl Into<String>,
        security_group_id: Option<String>,
    ) -> Self {
        let load_balancer_dns_name = load_balancer_dns_name.into();
        let dns_name = plan
            .domain
            .as_ref()
            .map(|d| d.binding.domain_name.clone())
            .unwrap_or_else(|| load_balancer_dns_name.clone());

        Self {
            dns_name,
            load_balancer_dns_name,
            custom_domain: plan.domain.is_some(),
            security_group_id,
        }
    }

    /// Whether the service is published under a custom domain
    pub fn has_custom_domain(&self) -> bool {
        self.custom_domain
    }

    /// Browser URL: HTTPS for a custom domain, plain HTTP on the load balancer
    pub fn url(&self) -> String {
        if self.has_custom_domain() {
            format!("https://{}", self.dns_name)
        } else {
            format!("http://{}", self.dns_name)
        }
    }
}

/// Provisioning engine trait
///
/// Implementations realise an [`ApplyRequest`] and return the live endpoint.
/// They own VPC/subnet membership, engine-version support and hosted-zone
/// lookups, and report problems there as [`EngineError::DeferredConfig`].
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Create or update the resources described by the request
    async fn apply(&self, request: &ApplyRequest) -> Result<ServiceHandle, EngineError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Outcome of a successful deploy
///
/// Keep `plan` around: it is the `previous` argument of the next
/// [`MetabaseComponent::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub plan: DeploymentPlan,
    pub handle: ServiceHandle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<PlanChange>,
}

/// One named Metabase component bound to a provisioning engine
pub struct MetabaseComponent<E> {
    name: ComponentName,
    engine: E,
}

impl<E: ProvisioningEngine> MetabaseComponent<E> {
    pub fn new(name: ComponentName, engine: E) -> Self {
        Self { name, engine }
    }

    pub fn name(&self) -> &ComponentName {
        &self.name
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validate and plan without touching the engine
    pub fn preview(&self, args: MetabaseArgs) -> MetabaseResult<DeploymentPlan> {
        let config = self.accept(args)?;
        self.plan(&config)
    }

    /// Validate, resolve, plan and apply
    pub async fn deploy(&self, args: MetabaseArgs) -> MetabaseResult<Deployment> {
        let config = self.accept(args)?;
        self.deploy_config(&config).await
    }

    /// Same as [`deploy`](Self::deploy) for an already constructed configuration
    pub async fn deploy_config(&self, config: &ComponentConfig) -> MetabaseResult<Deployment> {
        let plan = self.plan(config)?;
        self.submit(ApplyRequest::new(plan)).await
    }

    /// Re-apply over a previously applied plan, attaching the diff
    ///
    /// `previous` must be a plan of this component.
    pub async fn update(
        &self,
        previous: &DeploymentPlan,
        args: MetabaseArgs,
    ) -> MetabaseResult<Deployment> {
        if previous.component != self.name {
            warn!(
                component = %self.name,
                previous = %previous.component,
                "Rejected update over another component's plan"
            );
            return Err(MetabaseError::ComponentMismatch {
                expected: self.name.to_string(),
                found: previous.component.to_string(),
            });
        }

        let config = self.accept(args)?;
        let plan = self.plan(&config)?;
        let changes = plan.diff(previous);

        for change in changes.iter().filter(|c| c.is_disruptive()) {
            warn!(component = %self.name, %change, "Update includes a disruptive change");
        }

        self.submit(ApplyRequest::new(plan).with_changes(changes)).await
    }

    fn accept(&self, args: MetabaseArgs) -> MetabaseResult<ComponentConfig> {
        let violations = args.validate();
        if !violations.is_empty() {
            warn!(component = %self.name, count = violations.len(), "Rejected component arguments");
        }
        InvalidConfig::check(violations)?;
        Ok(ComponentConfig::try_from(args)?)
    }

    fn plan(&self, config: &ComponentConfig) -> MetabaseResult<DeploymentPlan> {
        let violations = config.validate();
        if !violations.is_empty() {
            warn!(component = %self.name, count = violations.len(), "Rejected component configuration");
        }
        InvalidConfig::check(violations)?;
        Ok(DeploymentPlan::build(&self.name, config))
    }

    async fn submit(&self, request: ApplyRequest) -> MetabaseResult<Deployment> {
        info!(
            component = %self.name,
            request_id = %request.request_id,
            engine = self.engine.name(),
            changes = request.changes.len(),
            "Submitting deployment plan"
        );

        match self.engine.apply(&request).await {
            Ok(handle) => {
                info!(component = %self.name, dns_name = %handle.dns_name, "Deployment applied");
                Ok(Deployment {
                    plan: request.plan,
                    handle,
                    changes: request.changes,
                })
            }
            Err(e) => {
                error!(component = %self.name, request_id = %request.request_id, "Engine error: {}", e);
                Err(e.into())
            }
        }
    }
}
