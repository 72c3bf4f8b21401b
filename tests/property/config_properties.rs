// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Component Configuration
//!
//! Default resolution, subnet list invariants and plan derivation over
//! generated inputs.

use metabase_component::domain::{
    ComponentConfig, ComponentName, CustomDomainConfig, DatabaseConfig, NetworkingArgs,
    NetworkingConfig, Setting, SubnetTier, ViolationRule, BASELINE_ENGINE_VERSION,
};
use metabase_component::plan::DeploymentPlan;
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

fn vpc_id() -> impl Strategy<Value = String> {
    "[0-9a-f]{3,17}".prop_map(|suffix| format!("vpc-{}", suffix))
}

/// Distinct, well-formed subnet identifiers in arbitrary order
fn subnet_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[0-9a-f]{3,17}", 1..6)
        .prop_map(|suffixes| {
            suffixes
                .into_iter()
                .map(|suffix| format!("subnet-{}", suffix))
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn networking_args() -> impl Strategy<Value = NetworkingArgs> {
    (
        prop::option::of(subnet_ids()),
        prop::option::of(subnet_ids()),
        prop::option::of(subnet_ids()),
    )
        .prop_map(|(ecs, db, lb)| NetworkingArgs {
            ecs_subnet_ids: ecs,
            db_subnet_ids: db,
            lb_subnet_ids: lb,
        })
}

fn engine_version() -> impl Strategy<Value = Setting<String>> {
    prop_oneof![
        Just(Setting::Unset),
        "5\\.7\\.mysql_aurora\\.2\\.[0-9]{2}\\.[0-9]".prop_map(Setting::Value),
    ]
}

fn domain() -> impl Strategy<Value = Option<CustomDomainConfig>> {
    prop_oneof![
        Just(None),
        Just(Some(CustomDomainConfig::unbound())),
        "[a-z]{1,10}".prop_map(|label| {
            CustomDomainConfig::bound(format!("{}.example.com", label), "example.com").ok()
        }),
    ]
}

fn component_config() -> impl Strategy<Value = ComponentConfig> {
    (
        vpc_id(),
        prop::option::of("v0\\.4[0-9]\\.[0-9]"),
        prop::option::of(networking_args()),
        prop::option::of(engine_version()),
        domain(),
    )
        .prop_map(|(vpc, version, networking, engine, domain)| {
            let mut builder = ComponentConfig::builder(vpc);
            if let Some(version) = version {
                builder = builder.metabase_version(version);
            }
            if let Some(networking) = networking {
                builder = builder.networking(NetworkingConfig::try_from(networking).unwrap());
            }
            if let Some(engine) = engine {
                builder = builder.database(DatabaseConfig::new(engine).unwrap());
            }
            if let Some(domain) = domain {
                builder = builder.domain(domain);
            }
            builder.build().unwrap()
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: resolve_defaults is idempotent
    #[test]
    fn prop_resolve_defaults_idempotent(config in component_config()) {
        let once = config.resolve_defaults();
        let twice = once.resolve_defaults();

        prop_assert!(once.is_resolved());
        prop_assert_eq!(once, twice, "Resolving twice must equal resolving once");
    }

    /// Property: well-formed configurations validate cleanly
    #[test]
    fn prop_generated_configs_are_valid(config in component_config()) {
        prop_assert!(config.validate().is_empty());
        prop_assert!(config.resolve_defaults().validate().is_empty());
    }

    /// Property: an unset engine version always resolves to the baseline
    #[test]
    fn prop_unset_engine_version_is_baseline(vpc in vpc_id()) {
        let resolved = ComponentConfig::builder(vpc).build().unwrap().resolve_defaults();

        prop_assert_eq!(resolved.database().unwrap().engine_version(), BASELINE_ENGINE_VERSION);
    }

    /// Property: explicit subnet lists keep caller order exactly, through resolution
    #[test]
    fn prop_subnet_order_preserved(args in networking_args()) {
        let config = ComponentConfig::builder("vpc-123")
            .networking(NetworkingConfig::try_from(args.clone()).unwrap())
            .build()
            .unwrap()
            .resolve_defaults();
        let networking = config.networking().unwrap();

        let stored = |tier: SubnetTier| -> Option<Vec<String>> {
            networking
                .subnet_ids(tier)
                .map(|ids| ids.iter().map(|id| id.to_string()).collect())
        };

        prop_assert_eq!(stored(SubnetTier::Compute), args.ecs_subnet_ids);
        prop_assert_eq!(stored(SubnetTier::Database), args.db_subnet_ids);
        prop_assert_eq!(stored(SubnetTier::LoadBalancer), args.lb_subnet_ids);
    }

    /// Property: repeating any identifier is rejected
    #[test]
    fn prop_duplicate_subnet_rejected(ids in subnet_ids(), pick in any::<prop::sample::Index>()) {
        let duplicate = ids[pick.index(ids.len())].clone();
        let mut with_duplicate = ids.clone();
        with_duplicate.push(duplicate.clone());

        let err = NetworkingConfig::builder()
            .lb_subnet_ids(with_duplicate)
            .build()
            .unwrap_err();

        prop_assert_eq!(err.violations().len(), 1);
        prop_assert_eq!(
            &err.violations()[0].rule,
            &ViolationRule::DuplicateIdentifier { value: duplicate }
        );
    }

    /// Property: plans depend only on the resolved configuration
    #[test]
    fn prop_plan_ignores_resolution(config in component_config()) {
        let name = ComponentName::new("analytics").unwrap();
        let raw = DeploymentPlan::build(&name, &config);
        let resolved = DeploymentPlan::build(&name, &config.resolve_defaults());

        prop_assert!(raw.diff(&resolved).is_empty());
        prop_assert_eq!(raw, resolved);
    }

    /// Property: a bound domain is the endpoint; otherwise there is none
    #[test]
    fn prop_endpoint_follows_domain(config in component_config()) {
        let plan = DeploymentPlan::build(&ComponentName::new("analytics").unwrap(), &config);
        let bound = config.domain().and_then(|d| d.domain_name()).map(|d| format!("https://{}", d));

        prop_assert_eq!(plan.endpoint_url().map(str::to_string), bound);
    }
}
