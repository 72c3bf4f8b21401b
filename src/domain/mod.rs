// Copyright (c) 2025 - Cowboy AI, Inc.
//! Component Configuration Domain
//!
//! Input structures for the Metabase component and their validated
//! counterparts. Every `*Args` type mirrors the component schema and accepts
//! anything; every `*Config` type is an immutable value object that can only
//! be built when its invariants hold.
//!
//! # Value Objects with Invariants
//!
//! - [`NetworkingConfig`] - per-tier subnet placement (non-empty, duplicate-free)
//! - [`DatabaseConfig`] - Aurora engine version, materialised to a baseline
//! - [`CustomDomainConfig`] - domain + hosted zone, both or neither
//! - [`ComponentConfig`] - composition root with `validate()` / `resolve_defaults()`
//! - [`VpcId`], [`SubnetId`], [`ComponentName`] - identifiers
//!
//! # Validation
//!
//! Violations are reported as [`ConfigViolation`]s naming the schema field
//! and the rule; a failed construction returns them as [`InvalidConfig`].

pub mod component;
pub mod custom_domain;
pub mod database;
pub mod identifiers;
pub mod invariants;
pub mod networking;
pub mod setting;

pub use component::{
    ComponentConfig, ComponentConfigBuilder, MetabaseArgs, DEFAULT_METABASE_VERSION,
};
pub use custom_domain::{CustomDomainArgs, CustomDomainConfig, DomainBinding};
pub use database::{DatabaseArgs, DatabaseConfig, BASELINE_ENGINE_VERSION};
pub use identifiers::{ComponentName, SubnetId, VpcId};
pub use invariants::{fields, ConfigViolation, InvalidConfig, ViolationRule};
pub use networking::{
    NetworkingArgs, NetworkingConfig, NetworkingConfigBuilder, SubnetPlacement, SubnetTier,
};
pub use setting::Setting;
