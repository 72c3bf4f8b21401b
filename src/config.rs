// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime settings and intent documents
//!
//! Engine connection settings come from the environment:
//!
//! | Variable                      | Default                  |
//! |-------------------------------|--------------------------|
//! | `METABASE_NATS_URL`           | `nats://localhost:4222`  |
//! | `METABASE_NATS_CLIENT_NAME`   | `metabase-component`     |
//! | `METABASE_SUBJECT_ROOT`       | `metabase`               |
//! | `METABASE_APPLY_TIMEOUT_SECS` | `900`                    |
//!
//! `METABASE_NATS_URL` may list several servers separated by commas.
//!
//! Deployment intent is a JSON document in the component schema, parsed into
//! [`MetabaseArgs`].

use std::path::Path;
use std::time::Duration;

use crate::domain::MetabaseArgs;
use crate::errors::{MetabaseError, MetabaseResult};
use crate::nats::{NatsConfig, DEFAULT_SUBJECT_ROOT};

pub const NATS_URL_VAR: &str = "METABASE_NATS_URL";
pub const NATS_CLIENT_NAME_VAR: &str = "METABASE_NATS_CLIENT_NAME";
pub const SUBJECT_ROOT_VAR: &str = "METABASE_SUBJECT_ROOT";
pub const APPLY_TIMEOUT_VAR: &str = "METABASE_APPLY_TIMEOUT_SECS";

/// Provisioning can take a while: Aurora alone is several minutes
const DEFAULT_APPLY_TIMEOUT: Duration = Duration::from_secs(900);

/// Settings for reaching the provisioning engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub nats: NatsConfig,
    pub subject_root: String,
    /// Upper bound on one apply round trip
    pub apply_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                request_timeout: DEFAULT_APPLY_TIMEOUT,
                ..NatsConfig::default()
            },
            subject_root: DEFAULT_SUBJECT_ROOT.to_string(),
            apply_timeout: DEFAULT_APPLY_TIMEOUT,
        }
    }
}

impl EngineSettings {
    /// Load settings from environment variables
    pub fn from_env() -> MetabaseResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> MetabaseResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(urls) = lookup(NATS_URL_VAR) {
            let servers: Vec<String> = urls
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if servers.is_empty() {
                return Err(MetabaseError::Configuration(format!(
                    "{} lists no servers",
                    NATS_URL_VAR
                )));
            }
            settings.nats.servers = servers;
        }

        if let Some(name) = lookup(NATS_CLIENT_NAME_VAR) {
            settings.nats.name = name;
        }

        if let Some(root) = lookup(SUBJECT_ROOT_VAR) {
            if root.is_empty() || root.contains(char::is_whitespace) {
                return Err(MetabaseError::Configuration(format!(
                    "{} is not a valid subject token: {:?}",
                    SUBJECT_ROOT_VAR, root
                )));
            }
            settings.subject_root = root;
        }

        if let Some(secs) = lookup(APPLY_TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                MetabaseError::Configuration(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    APPLY_TIMEOUT_VAR, secs
                ))
            })?;
            if secs == 0 {
                return Err(MetabaseError::Configuration(format!(
                    "{} must be at least one second",
                    APPLY_TIMEOUT_VAR
                )));
            }
            settings.apply_timeout = Duration::from_secs(secs);
        }

        // The client-level request timeout must not cut an apply short
        settings.nats.request_timeout = settings.apply_timeout;

        Ok(settings)
    }
}

/// Parse a JSON intent document
pub fn parse_args(document: &str) -> MetabaseResult<MetabaseArgs> {
    serde_json::from_str(document).map_err(|e| MetabaseError::Deserialization(e.to_string()))
}

/// Read and parse a JSON intent document from disk
pub fn load_args(path: impl AsRef<Path>) -> MetabaseResult<MetabaseArgs> {
    let document = std::fs::read_to_string(path)?;
    parse_args(&document)
}
