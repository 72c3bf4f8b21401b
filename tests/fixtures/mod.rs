// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for metabase-component
//!
//! Deterministic component arguments, configurations and a stub provisioning
//! engine. The stub records every request it receives so tests can assert on
//! how many times (and with what) the engine was called.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use metabase_component::domain::{
    ComponentConfig, ComponentName, CustomDomainArgs, CustomDomainConfig, NetworkingArgs,
    NetworkingConfig,
};
use metabase_component::{ApplyRequest, EngineError, MetabaseArgs, ProvisioningEngine, ServiceHandle};

pub const VPC_ID: &str = "vpc-123";
pub const COMPONENT_NAME: &str = "metabaseService";
pub const DOMAIN_NAME: &str = "metabase.example.com";
pub const HOSTED_ZONE_NAME: &str = "example.com";
pub const LB_DNS_NAME: &str = "metabaseService-lb-1234567890.us-east-1.elb.amazonaws.com";
pub const SECURITY_GROUP_ID: &str = "sg-0123456789abcdef0";

pub const ECS_SUBNETS: [&str; 2] = ["subnet-123", "subnet-456"];
pub const DB_SUBNETS: [&str; 2] = ["subnet-789", "subnet-abc"];
pub const LB_SUBNETS: [&str; 2] = ["subnet-def", "subnet-ghi"];

pub fn component_name() -> ComponentName {
    ComponentName::new(COMPONENT_NAME).expect("Invalid component name in test fixture")
}

fn strings(ids: &[&str]) -> Option<Vec<String>> {
    Some(ids.iter().map(|s| s.to_string()).collect())
}

/// Networking arguments with all three tiers set
pub fn full_networking_args() -> NetworkingArgs {
    NetworkingArgs {
        ecs_subnet_ids: strings(&ECS_SUBNETS),
        db_subnet_ids: strings(&DB_SUBNETS),
        lb_subnet_ids: strings(&LB_SUBNETS),
    }
}

pub fn full_networking() -> NetworkingConfig {
    NetworkingConfig::try_from(full_networking_args()).expect("Invalid networking fixture")
}

pub fn domain_args() -> CustomDomainArgs {
    CustomDomainArgs {
        domain_name: Some(DOMAIN_NAME.to_string()),
        hosted_zone_name: Some(HOSTED_ZONE_NAME.to_string()),
    }
}

/// Arguments with explicit subnets for every tier
pub fn networked_args() -> MetabaseArgs {
    MetabaseArgs {
        networking: Some(full_networking_args()),
        ..MetabaseArgs::for_vpc(VPC_ID)
    }
}

/// Arguments binding the custom domain
pub fn domain_bound_args() -> MetabaseArgs {
    MetabaseArgs {
        domain: Some(domain_args()),
        ..MetabaseArgs::for_vpc(VPC_ID)
    }
}

/// Arguments with a domain name but no hosted zone
pub fn domain_only_args() -> MetabaseArgs {
    MetabaseArgs {
        domain: Some(CustomDomainArgs {
            domain_name: Some(DOMAIN_NAME.to_string()),
            hosted_zone_name: None,
        }),
        ..MetabaseArgs::for_vpc(VPC_ID)
    }
}

pub fn vpc_only_config() -> ComponentConfig {
    ComponentConfig::builder(VPC_ID).build().expect("Invalid config fixture")
}

pub fn domain_bound_config() -> ComponentConfig {
    ComponentConfig::builder(VPC_ID)
        .domain(
            CustomDomainConfig::bound(DOMAIN_NAME, HOSTED_ZONE_NAME)
                .expect("Invalid domain fixture"),
        )
        .build()
        .expect("Invalid config fixture")
}

/// How the stub engine answers
#[derive(Debug, Clone)]
pub enum StubBehavior {
    Succeed,
    Reject(EngineError),
}

/// Provisioning engine that records requests instead of provisioning
pub struct StubEngine {
    behavior: StubBehavior,
    requests: Mutex<Vec<ApplyRequest>>,
}

impl StubEngine {
    pub fn succeeding() -> Self {
        Self::with_behavior(StubBehavior::Succeed)
    }

    pub fn rejecting(error: EngineError) -> Self {
        Self::with_behavior(StubBehavior::Reject(error))
    }

    fn with_behavior(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ApplyRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProvisioningEngine for StubEngine {
    async fn apply(&self, request: &ApplyRequest) -> Result<ServiceHandle, EngineError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.behavior {
            StubBehavior::Succeed => Ok(ServiceHandle::for_plan(
                &request.plan,
                LB_DNS_NAME,
                Some(SECURITY_GROUP_ID.to_string()),
            )),
            StubBehavior::Reject(error) => Err(error.clone()),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}
