//! NATS transport to a remote provisioning engine

use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::engine::{ApplyRequest, EngineError, ProvisioningEngine, ServiceHandle};
use crate::errors::{MetabaseError, MetabaseResult};

/// Default root of every subject this crate uses
pub const DEFAULT_SUBJECT_ROOT: &str = "metabase";

/// Subject a component's apply requests are sent to
pub fn apply_subject(root: &str, component: &str) -> String {
    format!("{}.{}.apply", root, component)
}

/// Subject on which successful applies are announced
pub fn applied_subject(root: &str, component: &str) -> String {
    format!("{}.{}.applied", root, component)
}

/// Configuration for NATS connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "metabase-component".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// NATS client wrapper
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    pub async fn new(config: NatsConfig) -> MetabaseResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout));

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| MetabaseError::NatsConnection(e.to_string()))?;

        info!("Connected to NATS at {:?}", config.servers);

        Ok(Self { client })
    }

    /// Publish a JSON message to a subject
    pub async fn publish<T>(&self, subject: &str, message: &T) -> MetabaseResult<()>
    where
        T: Serialize,
    {
        let payload = serde_json::to_vec(message)?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| MetabaseError::NatsPublish(e.to_string()))?;

        debug!("Published message to subject: {}", subject);
        Ok(())
    }

    /// Request-reply with JSON bodies
    pub async fn request<T, R>(&self, subject: &str, request: &T) -> MetabaseResult<R>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let payload = serde_json::to_vec(request)?;

        let response = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .map_err(|e| MetabaseError::NatsRequest(e.to_string()))?;

        serde_json::from_slice(&response.payload)
            .map_err(|e| MetabaseError::Deserialization(e.to_string()))
    }
}

/// Reply sent by the remote engine for an [`ApplyRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EngineReply {
    Applied { handle: ServiceHandle },
    Rejected { error: EngineError },
}

impl From<EngineReply> for Result<ServiceHandle, EngineError> {
    fn from(reply: EngineReply) -> Self {
        match reply {
            EngineReply::Applied { handle } => Ok(handle),
            EngineReply::Rejected { error } => Err(error),
        }
    }
}

/// [`ProvisioningEngine`] reached over NATS request-reply
pub struct NatsProvisioningEngine {
    client: NatsClient,
    subject_root: String,
    timeout: Duration,
}

impl NatsProvisioningEngine {
    pub fn new(client: NatsClient, subject_root: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            subject_root: subject_root.into(),
            timeout,
        }
    }

    pub fn subject_root(&self) -> &str {
        &self.subject_root
    }
}

#[async_trait]
impl ProvisioningEngine for NatsProvisioningEngine {
    async fn apply(&self, request: &ApplyRequest) -> Result<ServiceHandle, EngineError> {
        let component = request.component.as_str();
        let subject = apply_subject(&self.subject_root, component);
        debug!(%subject, request_id = %request.request_id, "Sending apply request");

        let reply: EngineReply =
            tokio::time::timeout(self.timeout, self.client.request(&subject, request))
                .await
                .map_err(|_| {
                    EngineError::unavailable(format!(
                        "no reply on {} within {}s",
                        subject,
                        self.timeout.as_secs()
                    ))
                })?
                .map_err(|e| EngineError::unavailable(e.to_string()))?;

        let handle = Result::<ServiceHandle, EngineError>::from(reply)?;

        let announced = applied_subject(&self.subject_root, component);
        if let Err(e) = self.client.publish(&announced, &handle).await {
            warn!(subject = %announced, "Failed to announce applied deployment: {}", e);
        }

        Ok(handle)
    }

    fn name(&self) -> &str {
        "nats"
    }
}
