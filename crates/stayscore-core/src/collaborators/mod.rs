//! External services the skill depends on.
//!
//! Each service sits behind a trait so the pipeline can be driven with
//! in-memory fakes. HTTP implementations take their configuration section at
//! construction time.

mod notify;
mod property_api;
mod secrets;

pub use notify::{
    DisabledSmsSender, DisabledTopicPublisher, WebhookSmsSender, WebhookTopicPublisher,
};
pub use property_api::{DisabledUnitDirectory, PropertyApiClient};
pub use secrets::{ExtensionSecretStore, StaticSecretStore, access_token};

use crate::error::CollaboratorError;
use async_trait::async_trait;

/// Source of secret payloads.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the raw (JSON-encoded) secret stored under `name`.
    async fn secret_string(&self, name: &str) -> Result<String, CollaboratorError>;
}

/// Resolves persistent unit identifiers to display names.
#[async_trait]
pub trait UnitDirectory: Send + Sync {
    /// Looks up the display name of a unit.
    ///
    /// Lookup failures are logged and resolve to `Ok(None)`. Only failures to
    /// obtain credentials are returned as errors.
    async fn unit_name(&self, unit_id: &str) -> Result<Option<String>, CollaboratorError>;
}

/// Sends SMS text messages.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, message: &str, destination: &str) -> Result<(), CollaboratorError>;
}

/// Publishes messages to the staff notification topic.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    /// Publishes `message`, returning the HTTP status of the publish call.
    async fn publish(&self, message: &str) -> Result<u16, CollaboratorError>;
}

/// Builds a `reqwest` client with a request timeout.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}, using defaults", e);
            reqwest::Client::new()
        })
}
