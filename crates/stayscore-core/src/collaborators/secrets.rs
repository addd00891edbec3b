//! Secret retrieval and property API access tokens.

use super::{SecretStore, http_client};
use crate::config::SecretsConfig;
use crate::error::CollaboratorError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

const SERVICE: &str = "secrets store";

/// Reads secrets through the Parameters and Secrets HTTP extension.
pub struct ExtensionSecretStore {
    http: reqwest::Client,
    endpoint: String,
    session_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetSecretValueResponse {
    secret_string: Option<String>,
}

impl ExtensionSecretStore {
    pub fn new(config: &SecretsConfig) -> Self {
        Self {
            http: http_client(config.timeout_secs),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            session_token: std::env::var(&config.session_token_env).ok(),
        }
    }
}

#[async_trait]
impl SecretStore for ExtensionSecretStore {
    async fn secret_string(&self, name: &str) -> Result<String, CollaboratorError> {
        let url = format!("{}/secretsmanager/get", self.endpoint);
        let mut request = self
            .http
            .get(&url)
            .query(&[("secretId", name), ("versionStage", "AWSCURRENT")]);
        if let Some(token) = &self.session_token {
            request = request.header("X-Aws-Parameters-Secrets-Token", token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| CollaboratorError::Request {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let payload: GetSecretValueResponse =
            response
                .json()
                .await
                .map_err(|e| CollaboratorError::Payload {
                    service: SERVICE,
                    detail: e.to_string(),
                })?;

        payload.secret_string.ok_or_else(|| CollaboratorError::Payload {
            service: SERVICE,
            detail: format!("secret {name} has no SecretString"),
        })
    }
}

/// Serves one fixed secret payload, for local runs and tests.
pub struct StaticSecretStore {
    payload: String,
}

impl StaticSecretStore {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn secret_string(&self, _name: &str) -> Result<String, CollaboratorError> {
        Ok(self.payload.clone())
    }
}

/// Fetches the property API token and formats it as a bearer credential.
///
/// Failures are logged here and returned to the caller.
pub async fn access_token(
    store: &dyn SecretStore,
    config: &SecretsConfig,
) -> Result<String, CollaboratorError> {
    let result = fetch_token(store, config).await;
    match &result {
        Ok(_) => debug!("Retrieved property API access token"),
        Err(e) => error!(
            "Failed to retrieve access token (region: {}): {}",
            config.region.as_deref().unwrap_or("unset"),
            e
        ),
    }
    result
}

async fn fetch_token(
    store: &dyn SecretStore,
    config: &SecretsConfig,
) -> Result<String, CollaboratorError> {
    let name = match (&config.secret_name, &config.static_secret) {
        (Some(name), _) => name.as_str(),
        (None, Some(_)) => "static",
        (None, None) => {
            return Err(CollaboratorError::NotConfigured {
                service: SERVICE,
                detail: "secrets.secret_name is not set".to_string(),
            });
        }
    };

    let raw = store.secret_string(name).await?;
    let secret: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| CollaboratorError::Payload {
            service: SERVICE,
            detail: format!("secret is not JSON: {e}"),
        })?;

    let token = secret
        .get(&config.access_token_key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| CollaboratorError::Payload {
            service: SERVICE,
            detail: format!("secret has no string field {}", config.access_token_key),
        })?;

    Ok(format!("Bearer {token}"))
}
