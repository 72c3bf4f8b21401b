// Copyright (c) 2025 - Cowboy AI, Inc.
//! Component Configuration Tests
//!
//! Construction, validation and default resolution of the composed
//! configuration.

mod fixtures;

use fixtures::*;
use metabase_component::domain::{
    fields, ComponentConfig, ConfigViolation, CustomDomainArgs, CustomDomainConfig,
    DatabaseArgs, DatabaseConfig, MetabaseArgs, NetworkingArgs, NetworkingConfig, Setting,
    SubnetPlacement, SubnetTier, ViolationRule, BASELINE_ENGINE_VERSION,
};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn ids(config: &NetworkingConfig, tier: SubnetTier) -> Vec<String> {
    config
        .subnet_ids(tier)
        .unwrap_or_default()
        .iter()
        .map(|id| id.to_string())
        .collect()
}

#[test]
fn test_full_networking_round_trip() {
    let config = ComponentConfig::try_from(networked_args()).unwrap();

    assert_eq!(config.vpc_id().as_str(), VPC_ID);
    let networking = config.networking().unwrap();
    assert_eq!(ids(networking, SubnetTier::Compute), ECS_SUBNETS);
    assert_eq!(ids(networking, SubnetTier::Database), DB_SUBNETS);
    assert_eq!(ids(networking, SubnetTier::LoadBalancer), LB_SUBNETS);

    assert!(config.validate().is_empty());
    assert_eq!(MetabaseArgs::from(config), networked_args());
}

#[test]
fn test_resolve_defaults_keeps_caller_subnet_order() {
    let unsorted = |ids: [&str; 3]| Some(ids.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    let args = MetabaseArgs {
        networking: Some(NetworkingArgs {
            ecs_subnet_ids: unsorted(["subnet-456", "subnet-123", "subnet-9"]),
            db_subnet_ids: unsorted(["subnet-abc", "subnet-789", "subnet-0"]),
            lb_subnet_ids: unsorted(["subnet-ghi", "subnet-def", "subnet-z"]),
        }),
        ..MetabaseArgs::for_vpc(VPC_ID)
    };

    let resolved = ComponentConfig::try_from(args).unwrap().resolve_defaults();
    let networking = resolved.networking().unwrap();

    assert_eq!(
        ids(networking, SubnetTier::Compute),
        ["subnet-456", "subnet-123", "subnet-9"]
    );
    assert_eq!(
        ids(networking, SubnetTier::Database),
        ["subnet-abc", "subnet-789", "subnet-0"]
    );
    assert_eq!(
        ids(networking, SubnetTier::LoadBalancer),
        ["subnet-ghi", "subnet-def", "subnet-z"]
    );
}

#[test]
fn test_full_networking_survives_resolution() {
    let resolved = ComponentConfig::try_from(networked_args())
        .unwrap()
        .resolve_defaults();
    let networking = resolved.networking().unwrap();

    assert_eq!(ids(networking, SubnetTier::Compute), ECS_SUBNETS);
    assert_eq!(ids(networking, SubnetTier::Database), DB_SUBNETS);
    assert_eq!(ids(networking, SubnetTier::LoadBalancer), LB_SUBNETS);
}

#[test]
fn test_vpc_only_defaults() {
    let resolved = vpc_only_config().resolve_defaults();

    assert_eq!(resolved.metabase_version(), Some("latest"));
    assert_eq!(
        resolved.database().unwrap().engine_version(),
        BASELINE_ENGINE_VERSION
    );
    let networking = resolved.networking().unwrap();
    for tier in SubnetTier::ALL {
        assert_eq!(networking.placement(tier), SubnetPlacement::EngineSelected);
    }
    assert!(resolved.domain().is_none());
}

#[test]
fn test_domain_only_scenario_is_rejected() {
    let args = domain_only_args();

    assert_eq!(
        args.validate(),
        vec![ConfigViolation::new(
            fields::HOSTED_ZONE_NAME,
            ViolationRule::IncompleteDomainBinding {
                present: fields::DOMAIN_NAME.to_string(),
                missing: fields::HOSTED_ZONE_NAME.to_string(),
            }
        )]
    );

    let err = ComponentConfig::try_from(args).unwrap_err();
    assert!(err.concerns(fields::HOSTED_ZONE_NAME));
}

#[test]
fn test_hosted_zone_only_is_rejected() {
    let err = CustomDomainConfig::new(None, Some(HOSTED_ZONE_NAME.to_string())).unwrap_err();
    assert!(err.concerns(fields::DOMAIN_NAME));
}

#[test]
fn test_bound_domain_survives_resolution() {
    let resolved = domain_bound_config().resolve_defaults();
    let domain = resolved.domain().unwrap();
    assert_eq!(domain.domain_name(), Some(DOMAIN_NAME));
    assert_eq!(domain.hosted_zone_name(), Some(HOSTED_ZONE_NAME));
}

#[test]
fn test_partial_networking_is_accepted() {
    let args = MetabaseArgs {
        networking: Some(NetworkingArgs {
            db_subnet_ids: Some(DB_SUBNETS.iter().map(|s| s.to_string()).collect()),
            ..NetworkingArgs::default()
        }),
        ..MetabaseArgs::for_vpc(VPC_ID)
    };
    assert!(args.validate().is_empty());

    let config = ComponentConfig::try_from(args).unwrap();
    let networking = config.networking().unwrap();
    assert!(networking.is_partial());
    assert_eq!(networking.explicit_tiers(), vec![SubnetTier::Database]);
    assert_eq!(
        networking.placement(SubnetTier::Compute),
        SubnetPlacement::EngineSelected
    );
}

#[test_case(SubnetTier::Compute ; "compute tier")]
#[test_case(SubnetTier::Database ; "database tier")]
#[test_case(SubnetTier::LoadBalancer ; "load balancer tier")]
fn test_empty_subnet_list_rejected(tier: SubnetTier) {
    let mut networking = NetworkingArgs::default();
    match tier {
        SubnetTier::Compute => networking.ecs_subnet_ids = Some(vec![]),
        SubnetTier::Database => networking.db_subnet_ids = Some(vec![]),
        SubnetTier::LoadBalancer => networking.lb_subnet_ids = Some(vec![]),
    }

    let err = NetworkingConfig::try_from(networking).unwrap_err();
    assert_eq!(
        err.violations(),
        &[ConfigViolation::new(tier.field(), ViolationRule::EmptyList)]
    );
}

#[test]
fn test_duplicate_subnet_rejected() {
    let err = NetworkingConfig::builder()
        .ecs_subnet_ids(["subnet-123", "subnet-123"])
        .build()
        .unwrap_err();

    assert_eq!(err.violations().len(), 1);
    assert_eq!(
        err.violations()[0].rule,
        ViolationRule::DuplicateIdentifier {
            value: "subnet-123".to_string()
        }
    );
}

#[test_case("vpc-123", true ; "well formed")]
#[test_case("vpc-0a1b2c3d4e5f67890", true ; "long form")]
#[test_case("default", false ; "missing prefix")]
#[test_case("vpc-", false ; "missing suffix")]
#[test_case("vpc-12_3", false ; "bad character")]
fn test_vpc_format_checked_by_validate(vpc_id: &str, ok: bool) {
    let config = ComponentConfig::builder(vpc_id).build().unwrap();
    assert_eq!(config.validate().is_empty(), ok);
}

#[test]
fn test_empty_vpc_rejected_at_construction() {
    let err = ComponentConfig::try_from(MetabaseArgs::for_vpc("")).unwrap_err();
    assert_eq!(
        err.violations(),
        &[ConfigViolation::new(fields::VPC_ID, ViolationRule::EmptyValue)]
    );
}

#[test]
fn test_explicit_engine_version_kept() {
    let args = MetabaseArgs {
        database: Some(DatabaseArgs {
            engine_version: Setting::Value("5.7.mysql_aurora.2.11.2".to_string()),
        }),
        ..MetabaseArgs::for_vpc(VPC_ID)
    };
    let config = ComponentConfig::try_from(args).unwrap();
    let database = config.database().unwrap();

    assert_eq!(database.engine_version(), "5.7.mysql_aurora.2.11.2");
    assert!(database.is_upgrade_from(&DatabaseConfig::baseline()));
}

#[test]
fn test_unset_engine_version_materialised() {
    let config = DatabaseConfig::new(Setting::Unset).unwrap();
    assert!(config.is_baseline());
}

#[test]
fn test_validate_reports_every_violation() {
    let args = MetabaseArgs {
        vpc_id: Some("my-vpc".to_string()),
        networking: Some(NetworkingArgs {
            ecs_subnet_ids: Some(vec!["sub-1".to_string()]),
            ..NetworkingArgs::default()
        }),
        domain: Some(CustomDomainArgs {
            domain_name: None,
            hosted_zone_name: Some(HOSTED_ZONE_NAME.to_string()),
        }),
        ..MetabaseArgs::default()
    };

    let fields_reported: Vec<String> = args.validate().into_iter().map(|v| v.field).collect();
    assert_eq!(
        fields_reported,
        vec![
            fields::DOMAIN_NAME.to_string(),
            fields::VPC_ID.to_string(),
            fields::ECS_SUBNET_IDS.to_string(),
        ]
    );
}
