// Copyright (c) 2025 - Cowboy AI, Inc.
//! Custom Domain Configuration
//!
//! `domainName` and `hostedZoneName` form a unit: both or neither. DNS name
//! syntax and hosted-zone existence are not checked here, the engine looks
//! the zone up when it creates the certificate and alias record.

use serde::{Deserialize, Serialize};

use super::invariants::{check_domain_pair, ConfigViolation, InvalidConfig};

/// Custom domain arguments as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomainArgs {
    /// Fully-qualified name to serve Metabase on, e.g. `metabase.example.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    /// Hosted zone the record is created in, e.g. `example.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_zone_name: Option<String>,
}

impl CustomDomainArgs {
    pub fn validate(&self) -> Vec<ConfigViolation> {
        check_domain_pair(self.domain_name.as_deref(), self.hosted_zone_name.as_deref())
    }
}

/// A complete domain binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainBinding {
    pub domain_name: String,
    pub hosted_zone_name: String,
}

impl DomainBinding {
    /// Public HTTPS endpoint once the record and certificate are live
    pub fn endpoint_url(&self) -> String {
        format!("https://{}", self.domain_name)
    }
}

/// Validated custom domain configuration
///
/// Either unbound, or bound to a complete [`DomainBinding`].
///
/// # Examples
///
/// ```rust
/// use metabase_component::domain::CustomDomainConfig;
///
/// let bound = CustomDomainConfig::new(
///     Some("metabase.example.com".to_string()),
///     Some("example.com".to_string()),
/// ).unwrap();
/// assert!(bound.is_bound());
///
/// // Half a binding is rejected
/// assert!(CustomDomainConfig::new(Some("metabase.example.com".to_string()), None).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CustomDomainArgs", into = "CustomDomainArgs")]
pub struct CustomDomainConfig {
    binding: Option<DomainBinding>,
}

impl CustomDomainConfig {
    pub fn new(
        domain_name: Option<String>,
        hosted_zone_name: Option<String>,
    ) -> Result<Self, InvalidConfig> {
        Self::try_from(CustomDomainArgs {
            domain_name,
            hosted_zone_name,
        })
    }

    /// Bind `domain_name` inside `hosted_zone_name`
    pub fn bound(
        domain_name: impl Into<String>,
        hosted_zone_name: impl Into<String>,
    ) -> Result<Self, InvalidConfig> {
        Self::new(Some(domain_name.into()), Some(hosted_zone_name.into()))
    }

    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn binding(&self) -> Option<&DomainBinding> {
        self.binding.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn domain_name(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.domain_name.as_str())
    }

    pub fn hosted_zone_name(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.hosted_zone_name.as_str())
    }

    pub fn validate(&self) -> Vec<ConfigViolation> {
        CustomDomainArgs::from(self.clone()).validate()
    }
}

impl TryFrom<CustomDomainArgs> for CustomDomainConfig {
    type Error = InvalidConfig;

    fn try_from(args: CustomDomainArgs) -> Result<Self, Self::Error> {
        InvalidConfig::check(args.validate())?;

        let binding = match (args.domain_name, args.hosted_zone_name) {
            (Some(domain_name), Some(hosted_zone_name)) => Some(DomainBinding {
                domain_name,
                hosted_zone_name,
            }),
            _ => None,
        };

        Ok(Self { binding })
    }
}

impl From<CustomDomainConfig> for CustomDomainArgs {
    fn from(config: CustomDomainConfig) -> Self {
        match config.binding {
            Some(binding) => Self {
                domain_name: Some(binding.domain_name),
                hosted_zone_name: Some(binding.hosted_zone_name),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariants::{fields, ViolationRule};

    #[test]
    fn test_both_or_neither() {
        assert!(!CustomDomainConfig::new(None, None).unwrap().is_bound());

        let bound = CustomDomainConfig::bound("metabase.example.com", "example.com").unwrap();
        assert_eq!(bound.domain_name(), Some("metabase.example.com"));
        assert_eq!(bound.hosted_zone_name(), Some("example.com"));
    }

    #[test]
    fn test_missing_zone_reports_pair() {
        let err = CustomDomainConfig::new(Some("metabase.example.com".to_string()), None).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ConfigViolation::new(
                fields::HOSTED_ZONE_NAME,
                ViolationRule::IncompleteDomainBinding {
                    present: fields::DOMAIN_NAME.to_string(),
                    missing: fields::HOSTED_ZONE_NAME.to_string(),
                }
            )]
        );
    }

    #[test]
    fn test_missing_domain_rejected() {
        let err = CustomDomainConfig::new(None, Some("example.com".to_string())).unwrap_err();
        assert!(err.concerns(fields::DOMAIN_NAME));
    }

    #[test]
    fn test_empty_values_rejected() {
        let err = CustomDomainConfig::bound("", "example.com").unwrap_err();
        assert_eq!(
            err.violations(),
            &[ConfigViolation::new(fields::DOMAIN_NAME, ViolationRule::EmptyValue)]
        );
    }

    #[test]
    fn test_no_dns_syntax_checks() {
        // Syntax is the engine's concern
        assert!(CustomDomainConfig::bound("not a hostname", "example.com").is_ok());
    }

    #[test]
    fn test_endpoint_url() {
        let bound = CustomDomainConfig::bound("metabase.example.com", "example.com").unwrap();
        assert_eq!(
            bound.binding().unwrap().endpoint_url(),
            "https://metabase.example.com"
        );
    }
}
