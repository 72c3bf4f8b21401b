// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identifier Value Objects
//!
//! Provider identifiers ([`VpcId`], [`SubnetId`]) are opaque strings to this
//! crate: construction only rejects empty values, and
//! [`is_well_formed`](VpcId::is_well_formed) is a best-effort shape check.
//! Whether an identifier exists is the provisioning engine's call.
//!
//! [`ComponentName`] is stricter because it is embedded in derived resource
//! names (`{name}-metabase-sg`, `{name}metabasemysql`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::invariants::{check_identifier_format, check_present_value, fields, ViolationRule};

/// Identifier of the target virtual network (e.g. `vpc-123`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VpcId(String);

impl VpcId {
    pub const PREFIX: &'static str = "vpc-";

    pub fn new(value: impl Into<String>) -> Result<Self, ViolationRule> {
        let value = value.into();
        if check_present_value(fields::VPC_ID, &value).is_some() {
            return Err(ViolationRule::EmptyValue);
        }
        Ok(Self(value))
    }

    /// `vpc-` followed by ASCII alphanumerics
    pub fn is_well_formed(&self) -> bool {
        check_identifier_format(fields::VPC_ID, &self.0, Self::PREFIX).is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a subnet inside the target VPC (e.g. `subnet-123`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubnetId(String);

impl SubnetId {
    pub const PREFIX: &'static str = "subnet-";

    pub fn new(value: impl Into<String>) -> Result<Self, ViolationRule> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ViolationRule::EmptyValue);
        }
        Ok(Self(value))
    }

    /// `subnet-` followed by ASCII alphanumerics
    pub fn is_well_formed(&self) -> bool {
        check_identifier_format("", &self.0, Self::PREFIX).is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Logical name of one component instance
///
/// # Invariants
/// - Non-empty, at most 40 characters
/// - ASCII alphanumerics and hyphens only
/// - Cannot start or end with a hyphen
///
/// The length cap keeps derived names such as `{name}metabasefinalsnapshot`
/// within provider identifier limits.
///
/// # Examples
///
/// ```rust
/// use metabase_component::domain::ComponentName;
///
/// assert!(ComponentName::new("analytics").is_ok());
/// assert!(ComponentName::new("").is_err());
/// assert!(ComponentName::new("-analytics").is_err());
/// assert!(ComponentName::new("my_service").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName(String);

impl ComponentName {
    pub const MAX_LENGTH: usize = 40;

    pub fn new(value: impl Into<String>) -> Result<Self, ViolationRule> {
        let value = value.into();

        if value.is_empty() {
            return Err(ViolationRule::EmptyValue);
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(ViolationRule::TooLong {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }

        if let Some(character) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Err(ViolationRule::InvalidCharacter { character });
        }

        if value.starts_with('-') || value.ends_with('-') {
            return Err(ViolationRule::InvalidCharacter { character: '-' });
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_identifier_impls {
    ($($ty:ident),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ViolationRule;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = ViolationRule;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    )*};
}

string_identifier_impls!(VpcId, SubnetId, ComponentName);
