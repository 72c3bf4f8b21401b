//! Error types for component operations

use thiserror::Error;

use crate::domain::InvalidConfig;
use crate::engine::EngineError;

/// Errors that can occur while validating, planning or deploying a component
#[derive(Debug, Error)]
pub enum MetabaseError {
    /// Locally detected configuration problem; fix the input and retry
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfig),

    /// Error reported by the provisioning engine, passed through verbatim
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Update over a plan that belongs to a different component
    #[error("plan belongs to component {found}, not {expected}")]
    ComponentMismatch { expected: String, found: String },

    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// NATS request error
    #[error("NATS request error: {0}")]
    NatsRequest(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Settings error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading an intent document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetabaseError {
    /// Whether the caller has to change its configuration (never transient)
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, MetabaseError::InvalidConfig(_))
    }
}

/// Result type for component operations
pub type MetabaseResult<T> = Result<T, MetabaseError>;

impl From<serde_json::Error> for MetabaseError {
    fn from(err: serde_json::Error) -> Self {
        MetabaseError::Serialization(err.to_string())
    }
}
