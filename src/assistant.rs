//! Wiring: build the store, display and router from configuration.

use std::sync::Arc;

use url::Url;

use crate::config::{AssistantConfig, ConfigError, DisplayConfig, StoreConfig};
use crate::dialogue::{DialogueEngine, IntentRouter};
use crate::display::{DisplayClient, DisplayError, HttpDisplayClient, NoDisplay, PresenceProbe};
use crate::store::{HttpProcedureStore, ProcedureStore, StoreError};
use crate::transport::{IntentServer, ServerHandle, TransportError};

/// Errors that stop the assistant from starting.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create procedure store: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to create display client: {0}")]
    Display(#[from] DisplayError),

    #[error("Failed to start intent server: {0}")]
    Transport(#[from] TransportError),
}

/// Store URL from config, or the default one when the configured URL is
/// unusable.
fn store_base_url(config: &StoreConfig) -> Result<Url, ConfigError> {
    config.base_url().or_else(|e| {
        let fallback = StoreConfig::default();
        tracing::warn!(
            error = %e,
            fallback = %fallback.base_url,
            "Invalid procedure store URL, using default"
        );
        fallback.base_url()
    })
}

/// Build the HTTP procedure store. An invalid base URL falls back to the
/// default one.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn ProcedureStore>, SetupError> {
    let store = HttpProcedureStore::new(&store_base_url(config)?, config.timeout())?;
    tracing::debug!(base_url = %store.base_url(), "Procedure store configured");
    Ok(Arc::new(store))
}

/// Build the display client, or [`NoDisplay`] when the display is disabled
/// or its base URL is invalid. An invalid presence probe makes the display
/// count as absent.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_display(config: &DisplayConfig) -> Result<Arc<dyn DisplayClient>, SetupError> {
    if !config.enabled {
        tracing::info!("Display disabled, running voice-only");
        return Ok(Arc::new(NoDisplay));
    }

    let base_url = match config.base_url() {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid display URL, running voice-only");
            return Ok(Arc::new(NoDisplay));
        }
    };

    let presence = PresenceProbe::from_config(config).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Invalid display presence probe, treating display as absent");
        PresenceProbe::Never
    });

    let client = HttpDisplayClient::new(&base_url, config.timeout(), presence)?;
    tracing::debug!(base_url = %config.base_url, presence = ?config.presence, "Display configured");
    Ok(Arc::new(client))
}

/// Build the router over HTTP adapters.
///
/// # Errors
///
/// Returns an error if any adapter cannot be built.
pub fn build_router(config: &AssistantConfig) -> Result<IntentRouter, SetupError> {
    let engine = DialogueEngine::new(build_store(&config.store)?, build_display(&config.display)?);
    Ok(IntentRouter::new(engine, config.intents.namespace.clone()))
}

/// Build everything and start listening for intents. Bad configuration
/// values are logged and replaced; only transport failures stop startup.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound or an HTTP client cannot
/// be built.
pub fn serve(config: &AssistantConfig) -> Result<ServerHandle, SetupError> {
    let router = build_router(config)?;
    let server = IntentServer::new(&config.transport.socket_path);
    Ok(server.serve_router(router)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::DisplayPresence;

    #[test]
    fn test_build_router_with_defaults() {
        let router = build_router(&AssistantConfig::default()).unwrap();
        assert_eq!(router.namespace(), "livingonmars");
    }

    #[test]
    fn test_bad_store_url_falls_back_to_default() {
        let config = StoreConfig {
            base_url: "::nope".to_string(),
            ..StoreConfig::default()
        };
        let url = store_base_url(&config).unwrap();
        assert_eq!(url, StoreConfig::default().base_url().unwrap());
        assert!(build_store(&config).is_ok());
    }

    #[tokio::test]
    async fn test_disabled_display_is_absent() {
        let config = DisplayConfig {
            enabled: false,
            base_url: "not even checked".to_string(),
            ..DisplayConfig::default()
        };
        let display = build_display(&config).unwrap();
        assert!(!display.is_present().await);
    }

    #[tokio::test]
    async fn test_bad_display_url_runs_voice_only() {
        let config = DisplayConfig {
            base_url: "::nope".to_string(),
            ..DisplayConfig::default()
        };
        let display = build_display(&config).unwrap();
        assert!(!display.is_present().await);
    }

    #[tokio::test]
    async fn test_bad_presence_settings_count_as_absent() {
        let empty_command = DisplayConfig {
            presence: DisplayPresence::Command,
            probe_command: Vec::new(),
            ..DisplayConfig::default()
        };
        let bad_pattern = DisplayConfig {
            presence: DisplayPresence::Command,
            probe_pattern: "(unclosed".to_string(),
            ..DisplayConfig::default()
        };

        for config in [empty_command, bad_pattern] {
            let display = build_display(&config).unwrap();
            assert!(!display.is_present().await);
        }
    }

    #[tokio::test]
    async fn test_serve_starts_with_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AssistantConfig::default();
        config.transport.socket_path = dir.path().join("assistant.sock");
        config.store.base_url = "::nope".to_string();
        config.display.base_url = "also not a url".to_string();

        let handle = serve(&config).unwrap();
        assert!(handle.socket_path().exists());
        handle.shutdown();
    }

    #[tokio::test]
    async fn test_serve_fails_when_socket_cannot_be_bound() {
        let mut config = AssistantConfig::default();
        config.transport.socket_path = "/nonexistent-dir/assistant.sock".into();

        let result = serve(&config);
        assert!(matches!(result, Err(SetupError::Transport(_))));
    }
}
