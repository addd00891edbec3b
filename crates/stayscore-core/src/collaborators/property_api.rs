//! Property-management API client for unit lookups.

use super::{SecretStore, UnitDirectory, access_token, http_client};
use crate::config::{PropertyApiConfig, SecretsConfig};
use crate::error::CollaboratorError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Looks up units through `GET {endpoint}/v2/units/{unit_id}`.
pub struct PropertyApiClient {
    http: reqwest::Client,
    endpoint: String,
    secrets: Arc<dyn SecretStore>,
    secrets_config: SecretsConfig,
}

impl PropertyApiClient {
    pub fn new(
        endpoint: impl Into<String>,
        config: &PropertyApiConfig,
        secrets: Arc<dyn SecretStore>,
        secrets_config: SecretsConfig,
    ) -> Self {
        Self {
            http: http_client(config.timeout_secs),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            secrets,
            secrets_config,
        }
    }

    /// `{endpoint}/v2/units/{unit_id}` with the id percent-encoded as one
    /// path segment.
    fn unit_url(&self, unit_id: &str) -> Option<reqwest::Url> {
        let mut url = match reqwest::Url::parse(&self.endpoint) {
            Ok(url) => url,
            Err(e) => {
                error!("Invalid property API endpoint {}: {}", self.endpoint, e);
                return None;
            }
        };
        let Ok(mut segments) = url.path_segments_mut() else {
            error!("Property API endpoint {} cannot take a path", self.endpoint);
            return None;
        };
        segments.pop_if_empty().push("v2").push("units").push(unit_id);
        drop(segments);
        Some(url)
    }

    /// Extracts `name.value.text` from a unit document.
    fn unit_display_name(unit: &Value) -> Option<String> {
        unit.pointer("/name/value/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
impl UnitDirectory for PropertyApiClient {
    async fn unit_name(&self, unit_id: &str) -> Result<Option<String>, CollaboratorError> {
        let Some(url) = self.unit_url(unit_id) else {
            return Ok(None);
        };
        let token = access_token(self.secrets.as_ref(), &self.secrets_config).await?;

        let response = match self
            .http
            .get(url)
            .header("Authorization", token)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Request Error: unit lookup for {} failed: {}", unit_id, e);
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let headers = format!("{:?}", response.headers());
            let body = response.text().await.unwrap_or_default();
            error!(
                "Response Error Status and Data: {}:{}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            );
            error!("Response header: {}", headers);
            return Ok(None);
        }

        match response.json::<Value>().await {
            Ok(unit) => {
                debug!("Unit document: {}", unit);
                let name = Self::unit_display_name(&unit);
                if name.is_none() {
                    error!("Error: unit {} has no name.value.text", unit_id);
                }
                Ok(name)
            }
            Err(e) => {
                error!("Error: failed to parse unit {}: {}", unit_id, e);
                Ok(None)
            }
        }
    }
}

/// Used when no property API endpoint is configured.
pub struct DisabledUnitDirectory;

#[async_trait]
impl UnitDirectory for DisabledUnitDirectory {
    async fn unit_name(&self, unit_id: &str) -> Result<Option<String>, CollaboratorError> {
        info!("Property API not configured; not resolving unit {}", unit_id);
        Ok(None)
    }
}
