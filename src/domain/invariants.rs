// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Configuration Invariants
//!
//! This module contains the structural rules shared by every configuration
//! value object. All functions are pure (no side effects, no I/O) and report
//! violations instead of stopping at the first one, so a caller can fix an
//! entire intent document in one pass.
//!
//! # Invariant Categories
//!
//! 1. **Structural Invariants**: present values are non-empty, lists are
//!    non-empty and duplicate-free
//! 2. **Pair Invariants**: fields that only make sense together
//!    (`domainName` + `hostedZoneName`)
//! 3. **Format Invariants**: best-effort identifier shape checks
//!    (`vpc-…`, `subnet-…`); real membership is checked by the engine
//!
//! Every violation names the offending field using the component schema's
//! field path (for example `networking.ecsSubnetIds`).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Field paths as they appear in the component schema
pub mod fields {
    pub const COMPONENT_NAME: &str = "name";
    pub const VPC_ID: &str = "vpcId";
    pub const METABASE_VERSION: &str = "metabaseVersion";
    pub const ECS_SUBNET_IDS: &str = "networking.ecsSubnetIds";
    pub const DB_SUBNET_IDS: &str = "networking.dbSubnetIds";
    pub const LB_SUBNET_IDS: &str = "networking.lbSubnetIds";
    pub const ENGINE_VERSION: &str = "database.engineVersion";
    pub const DOMAIN_NAME: &str = "domain.domainName";
    pub const HOSTED_ZONE_NAME: &str = "domain.hostedZoneName";
}

/// The specific rule a configuration value broke
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ViolationRule {
    /// A required field was not supplied
    #[error("required value is missing")]
    Missing,

    /// A string field is present but empty
    #[error("value is present but empty")]
    EmptyValue,

    /// A list field is present but has no elements
    #[error("list is present but empty (omit the field to let the engine choose)")]
    EmptyList,

    /// The same identifier appears more than once in a list
    #[error("duplicate identifier {value:?}")]
    DuplicateIdentifier { value: String },

    /// Only one half of the domain binding was given
    #[error("incomplete domain binding: {present} is set but {missing} is missing")]
    IncompleteDomainBinding { present: String, missing: String },

    /// Identifier does not look like a provider identifier of the expected kind
    #[error("malformed identifier {value:?}: expected {expected_prefix}<alphanumeric>")]
    MalformedIdentifier {
        value: String,
        expected_prefix: String,
    },

    /// Character not allowed in a resource name
    #[error("invalid character {character:?}")]
    InvalidCharacter { character: char },

    /// Value exceeds the maximum length
    #[error("value exceeds maximum length of {max} characters: {actual}")]
    TooLong { max: usize, actual: usize },
}

/// A single violated rule together with the field that violated it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigViolation {
    /// Schema path of the offending field
    pub field: String,
    /// Rule that was broken
    pub rule: ViolationRule,
}

impl ConfigViolation {
    pub fn new(field: impl Into<String>, rule: ViolationRule) -> Self {
        Self {
            field: field.into(),
            rule,
        }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.rule)
    }
}

/// Structural violation detected locally, before any engine interaction
///
/// Always carries at least one [`ConfigViolation`]. Not retryable: the
/// caller has to change the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidConfig {
    violations: Vec<ConfigViolation>,
}

impl<'de> Deserialize<'de> for InvalidConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            violations: Vec<ConfigViolation>,
        }

        let wire = Wire::deserialize(deserializer)?;
        match Self::check(wire.violations) {
            Err(invalid) => Ok(invalid),
            Ok(()) => Err(serde::de::Error::custom(
                "invalid configuration must carry at least one violation",
            )),
        }
    }
}

impl InvalidConfig {
    /// Wrap a single violation
    pub fn single(field: impl Into<String>, rule: ViolationRule) -> Self {
        Self {
            violations: vec![ConfigViolation::new(field, rule)],
        }
    }

    /// `Ok(())` when there is nothing to report, otherwise the violations as an error
    pub fn check(violations: Vec<ConfigViolation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    pub fn violations(&self) -> &[ConfigViolation] {
        &self.violations
    }

    /// Whether any violation concerns the given field path
    pub fn concerns(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn into_violations(self) -> Vec<ConfigViolation> {
        self.violations
    }
}

impl fmt::Display for InvalidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration")?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidConfig {}

/// Validate that a present string value is not empty
///
/// Whitespace-only values count as empty. The value itself is never
/// rewritten, only inspected.
pub fn check_present_value(field: &str, value: &str) -> Option<ConfigViolation> {
    if value.trim().is_empty() {
        return Some(ConfigViolation::new(field, ViolationRule::EmptyValue));
    }
    None
}

/// Validate an optional string: absence is fine, presence must be non-empty
pub fn check_optional_value(field: &str, value: Option<&str>) -> Option<ConfigViolation> {
    value.and_then(|v| check_present_value(field, v))
}

/// Validate a subnet identifier list
///
/// # Rules
/// - Present list must be non-empty
/// - No element may be empty
/// - No identifier may appear twice (each duplicate reported once)
pub fn check_identifier_list(field: &str, ids: &[String]) -> Vec<ConfigViolation> {
    if ids.is_empty() {
        return vec![ConfigViolation::new(field, ViolationRule::EmptyList)];
    }

    let mut violations = Vec::new();
    let mut seen = HashSet::with_capacity(ids.len());
    let mut reported = HashSet::new();

    for (index, id) in ids.iter().enumerate() {
        if let Some(v) = check_present_value(&format!("{}[{}]", field, index), id) {
            violations.push(v);
            continue;
        }
        if !seen.insert(id.as_str()) && reported.insert(id.as_str()) {
            violations.push(ConfigViolation::new(
                field,
                ViolationRule::DuplicateIdentifier { value: id.clone() },
            ));
        }
    }

    violations
}

/// Validate the domain binding pair
///
/// # Rules
/// - Both absent: valid (no custom domain)
/// - Both present: each must be non-empty
/// - Exactly one present: incomplete binding, reported against the missing field
pub fn check_domain_pair(
    domain_name: Option<&str>,
    hosted_zone_name: Option<&str>,
) -> Vec<ConfigViolation> {
    let mut violations = Vec::new();
    violations.extend(check_optional_value(fields::DOMAIN_NAME, domain_name));
    violations.extend(check_optional_value(fields::HOSTED_ZONE_NAME, hosted_zone_name));

    match (domain_name, hosted_zone_name) {
        (Some(_), None) => violations.push(ConfigViolation::new(
            fields::HOSTED_ZONE_NAME,
            ViolationRule::IncompleteDomainBinding {
                present: fields::DOMAIN_NAME.to_string(),
                missing: fields::HOSTED_ZONE_NAME.to_string(),
            },
        )),
        (None, Some(_)) => violations.push(ConfigViolation::new(
            fields::DOMAIN_NAME,
            ViolationRule::IncompleteDomainBinding {
                present: fields::HOSTED_ZONE_NAME.to_string(),
                missing: fields::DOMAIN_NAME.to_string(),
            },
        )),
        _ => {}
    }

    violations
}

/// Best-effort provider identifier shape check (`<prefix><alphanumeric>`)
///
/// This is a format check only. Whether the identifier exists, or belongs to
/// the target VPC, is decided by the provisioning engine.
pub fn check_identifier_format(field: &str, value: &str, prefix: &str) -> Option<ConfigViolation> {
    let well_formed = value
        .strip_prefix(prefix)
        .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(false);

    if well_formed {
        None
    } else {
        Some(ConfigViolation::new(
            field,
            ViolationRule::MalformedIdentifier {
                value: value.to_string(),
                expected_prefix: prefix.to_string(),
            },
        ))
    }
}
