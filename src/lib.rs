// Copyright (c) 2025 - Cowboy AI, Inc.
//! Metabase Component
//!
//! Configuration core for a self-hosted Metabase deployment on AWS: an
//! Aurora MySQL cluster, a Fargate service and an application load balancer,
//! optionally published under a custom domain.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────┐   ┌────────────────┐   ┌────────────────────┐
//! │ MetabaseArgs │──>│ ComponentConfig │──>│ DeploymentPlan │──>│ ProvisioningEngine │
//! │  (raw JSON)  │   │ (value objects) │   │   (resolved)   │   │   (NATS / other)   │
//! └──────────────┘   └─────────────────┘   └────────────────┘   └────────────────────┘
//! ```
//!
//! - [`domain`]: input structures, invariants and default resolution
//! - [`plan`]: the engine-facing description of every resource
//! - [`engine`]: the provisioning seam and [`MetabaseComponent`]
//! - [`nats`]: request-reply transport to a remote engine
//! - [`config`]: environment settings and intent documents
//!
//! # Example
//!
//! ```rust
//! use metabase_component::domain::{ComponentConfig, ComponentName, NetworkingConfig};
//! use metabase_component::plan::DeploymentPlan;
//!
//! let config = ComponentConfig::builder("vpc-123")
//!     .networking(
//!         NetworkingConfig::builder()
//!             .ecs_subnet_ids(["subnet-123", "subnet-456"])
//!             .db_subnet_ids(["subnet-789", "subnet-abc"])
//!             .lb_subnet_ids(["subnet-def", "subnet-ghi"])
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//! assert!(config.validate().is_empty());
//!
//! let plan = DeploymentPlan::build(&ComponentName::new("analytics").unwrap(), &config);
//! assert_eq!(plan.service.image, "metabase/metabase:latest");
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod nats;
pub mod plan;

pub use config::EngineSettings;
pub use domain::{
    ComponentConfig, ComponentName, ConfigViolation, CustomDomainConfig, DatabaseConfig,
    InvalidConfig, MetabaseArgs, NetworkingConfig, Setting,
};
pub use engine::{
    ApplyRequest, Deployment, EngineError, MetabaseComponent, ProvisioningEngine, ServiceHandle,
};
pub use errors::{MetabaseError, MetabaseResult};
pub use nats::{EngineReply, NatsClient, NatsConfig, NatsProvisioningEngine};
pub use plan::{DeploymentPlan, PlanChange};
