//! Configuration types.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigError;
use crate::transport::DEFAULT_SOCKET_PATH;

/// Top-level assistant configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub transport: TransportConfig,
    pub intents: IntentsConfig,
    pub store: StoreConfig,
    pub display: DisplayConfig,
    /// User-specific secrets, passed through untouched.
    pub secret: HashMap<String, String>,
}

/// Intent transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Unix socket the intent server listens on.
    pub socket_path: PathBuf,
    /// Client-side timeout for one request.
    pub timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            timeout_ms: 10_000,
        }
    }
}

impl TransportConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Intent naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentsConfig {
    /// Prefix of every intent name, as in `livingonmars:nextStep`.
    pub namespace: String,
}

impl Default for IntentsConfig {
    fn default() -> Self {
        Self {
            namespace: "livingonmars".to_string(),
        }
    }
}

/// Procedure database service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl StoreConfig {
    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `base_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_url("store.base_url", &self.base_url)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// How display presence is detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPresence {
    #[default]
    Always,
    Never,
    Command,
}

/// GUI display service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Disable to run voice-only.
    pub enabled: bool,
    pub base_url: String,
    pub timeout_ms: u64,
    pub presence: DisplayPresence,
    /// Program and arguments used when `presence = "command"`.
    pub probe_command: Vec<String>,
    /// Regex matched against each line of the probe output.
    pub probe_pattern: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:4040".to_string(),
            timeout_ms: 5_000,
            presence: DisplayPresence::Always,
            probe_command: vec!["tvservice".to_string(), "-s".to_string()],
            probe_pattern: "^state 0x.*a$".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `base_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_url("display.base_url", &self.base_url)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("{value}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_services() {
        let config = AssistantConfig::default();
        assert_eq!(config.store.base_url, "http://localhost:8000");
        assert_eq!(config.display.base_url, "http://localhost:4040");
        assert_eq!(config.intents.namespace, "livingonmars");
        assert_eq!(
            config.transport.socket_path,
            PathBuf::from(DEFAULT_SOCKET_PATH)
        );
        assert!(config.display.enabled);
        assert_eq!(config.display.presence, DisplayPresence::Always);
        assert!(config.secret.is_empty());
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let toml = r#"
            [store]
            base_url = "http://db.lab:9000"

            [display]
            enabled = false
            presence = "command"

            [secret]
            api_token = "s3cr3t"
        "#;
        let config: AssistantConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.store.base_url, "http://db.lab:9000");
        assert_eq!(config.store.timeout_ms, 10_000);
        assert!(!config.display.enabled);
        assert_eq!(config.display.presence, DisplayPresence::Command);
        assert_eq!(config.display.probe_command, vec!["tvservice", "-s"]);
        assert_eq!(config.secret.get("api_token").map(String::as_str), Some("s3cr3t"));
        assert_eq!(config.intents.namespace, "livingonmars");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = StoreConfig {
            base_url: "not a url".to_string(),
            ..StoreConfig::default()
        };
        let result = config.base_url();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_timeouts() {
        let config = AssistantConfig::default();
        assert_eq!(config.store.timeout(), Duration::from_secs(10));
        assert_eq!(config.display.timeout(), Duration::from_secs(5));
        assert_eq!(config.transport.timeout(), Duration::from_secs(10));
    }
}
