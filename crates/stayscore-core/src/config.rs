//! Configuration for the skill and its collaborators.
//!
//! Loaded from `stayscore.yml` and overlaid with `STAYSCORE_*` environment
//! variables. Each collaborator receives only its own section.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Task name another skill uses to hand a rating to this one.
pub const DEFAULT_RATING_TASK_NAME: &str =
    "amzn1.ask.skill.8fc28a64-828a-490c-b2d3-f18c329f5509.rating";

/// Config file names looked up in the working directory, in order.
pub const CONFIG_CANDIDATES: &[&str] = &["stayscore.yml", "stayscore.yaml"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub skill: SkillSection,
    pub secrets: SecretsConfig,
    pub property_api: PropertyApiConfig,
    pub notifications: NotificationsConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSection {
    /// Task name that launches straight into rating.
    pub rating_task_name: String,

    /// Mobile number that receives staff alerts.
    pub staff_sms_number: Option<String>,

    /// Locale used when the request locale has no bundle.
    pub default_locale: String,

    /// Directory of extra `<locale>.yml` bundles.
    pub locales_dir: Option<PathBuf>,
}

impl Default for SkillSection {
    fn default() -> Self {
        Self {
            rating_task_name: DEFAULT_RATING_TASK_NAME.to_string(),
            staff_sms_number: None,
            default_locale: "en-US".to_string(),
            locales_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub region: Option<String>,

    /// Name of the secret holding the property API token.
    pub secret_name: Option<String>,

    /// Field of the secret payload that holds the token.
    pub access_token_key: String,

    /// Base URL of the secrets HTTP endpoint.
    pub endpoint: String,

    /// Environment variable holding the endpoint's auth token.
    pub session_token_env: String,

    /// Inline secret payload. Skips the network when set.
    pub static_secret: Option<String>,

    pub timeout_secs: u64,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            region: None,
            secret_name: None,
            access_token_key: "access_token".to_string(),
            endpoint: "http://localhost:2773".to_string(),
            session_token_env: "AWS_SESSION_TOKEN".to_string(),
            static_secret: None,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyApiConfig {
    /// Base URL of the property-management API.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PropertyApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Topic that receives staff alerts.
    pub topic_arn: Option<String>,
    pub publish_endpoint: Option<String>,
    pub sms_endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            topic_arn: None,
            publish_endpoint: None,
            sms_endpoint: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

impl SkillConfig {
    /// Parses configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Loads the explicit path if given, else the first candidate found in
    /// `root`, else defaults. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let found = CONFIG_CANDIDATES
                    .iter()
                    .map(|c| root.join(c))
                    .find(|p| p.exists());
                match found {
                    Some(path) => Self::from_file(&path)?,
                    None => Self::default(),
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlays values from the environment, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("STAYSCORE_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = get("STAYSCORE_STAFF_SMS_NUMBER") {
            self.skill.staff_sms_number = Some(v);
        }
        if let Some(v) = get("STAYSCORE_PROPERTY_API_ENDPOINT") {
            self.property_api.endpoint = Some(v);
        }
        if let Some(v) = get("STAYSCORE_SECRET_NAME") {
            self.secrets.secret_name = Some(v);
        }
        if let Some(v) = get("STAYSCORE_SECRETS_REGION") {
            self.secrets.region = Some(v);
        }
        if let Some(v) = get("STAYSCORE_TOPIC_ARN") {
            self.notifications.topic_arn = Some(v);
        }
        if let Some(v) = get("STAYSCORE_PUBLISH_ENDPOINT") {
            self.notifications.publish_endpoint = Some(v);
        }
        if let Some(v) = get("STAYSCORE_SMS_ENDPOINT") {
            self.notifications.sms_endpoint = Some(v);
        }
    }

    /// Lists settings that leave part of the skill running in a degraded mode.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.property_api.endpoint.is_none() {
            warnings.push("property_api.endpoint is not set; unit names will not be resolved".to_string());
        }
        if self.secrets.secret_name.is_none() && self.secrets.static_secret.is_none() {
            warnings.push(
                "neither secrets.secret_name nor secrets.static_secret is set; property API calls will fail"
                    .to_string(),
            );
        }
        if self.skill.staff_sms_number.is_none() {
            warnings.push("skill.staff_sms_number is not set; staff SMS alerts are disabled".to_string());
        }
        if self.notifications.sms_endpoint.is_none() {
            warnings.push("notifications.sms_endpoint is not set; staff SMS alerts are disabled".to_string());
        }
        if self.notifications.publish_endpoint.is_none() || self.notifications.topic_arn.is_none() {
            warnings.push(
                "notifications.publish_endpoint or notifications.topic_arn is not set; topic alerts are disabled"
                    .to_string(),
            );
        }
        if let Some(dir) = &self.skill.locales_dir
            && !dir.is_dir()
        {
            warnings.push(format!("skill.locales_dir {} is not a directory", dir.display()));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SkillConfig::default();
        assert_eq!(config.skill.rating_task_name, DEFAULT_RATING_TASK_NAME);
        assert_eq!(config.skill.default_locale, "en-US");
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.secrets.access_token_key, "access_token");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
skill:
  staff_sms_number: "+15555550100"
property_api:
  endpoint: "https://api.example.com"
"#;
        let config = SkillConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.skill.staff_sms_number.as_deref(), Some("+15555550100"));
        assert_eq!(config.skill.rating_task_name, DEFAULT_RATING_TASK_NAME);
        assert_eq!(config.property_api.endpoint.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.property_api.timeout_secs, 10);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("STAYSCORE_BIND", "127.0.0.1:8080"),
            ("STAYSCORE_TOPIC_ARN", "arn:aws:sns:us-east-1:123:alerts"),
            ("STAYSCORE_SMS_ENDPOINT", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = SkillConfig::default();
        config.apply_env(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(
            config.notifications.topic_arn.as_deref(),
            Some("arn:aws:sns:us-east-1:123:alerts")
        );
        // Blank values are ignored
        assert!(config.notifications.sms_endpoint.is_none());
    }

    #[test]
    fn test_load_from_candidate_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("stayscore.yml"),
            "server:\n  bind: \"127.0.0.1:9000\"\n",
        )
        .unwrap();

        let config = SkillConfig::from_file(&dir.path().join("stayscore.yml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stayscore.yml");
        std::fs::write(&path, "server: [not, a, map").unwrap();

        let err = SkillConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("stayscore.yml"));
    }

    #[test]
    fn test_validate_flags_missing_endpoints() {
        let warnings = SkillConfig::default().validate();
        assert!(warnings.iter().any(|w| w.contains("property_api.endpoint")));
        assert!(warnings.iter().any(|w| w.contains("staff_sms_number")));

        let mut config = SkillConfig::default();
        config.property_api.endpoint = Some("https://api.example.com".to_string());
        config.secrets.static_secret = Some("{}".to_string());
        config.skill.staff_sms_number = Some("+1555".to_string());
        config.notifications.sms_endpoint = Some("https://sms.example.com".to_string());
        config.notifications.publish_endpoint = Some("https://pub.example.com".to_string());
        config.notifications.topic_arn = Some("arn".to_string());
        assert!(config.validate().is_empty());
    }
}
