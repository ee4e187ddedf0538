//! HTTP client for the procedure database service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::{
    parse_procedure_detail, parse_procedure_list, parse_procedure_steps, ProcedureDetail,
    ProcedureStep, ProcedureStore, ProcedureSummary, StoreError,
};

/// Connection timeout for HTTP requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Procedure store backed by the REST procedure database.
///
/// Requests are not retried; a failure surfaces to the dialogue so the user
/// can repeat the intent.
#[derive(Debug, Clone)]
pub struct HttpProcedureStore {
    client: Client,
    base_url: String,
}

impl HttpProcedureStore {
    /// Create a store for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UpstreamUnavailable` if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, id: Option<u32>) -> Result<serde_json::Value, StoreError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "Fetching from procedure store");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(StoreError::NotFound(id));
            }
        }
        if !status.is_success() {
            return Err(StoreError::UpstreamUnavailable(format!("HTTP {status} from {url}")));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProcedureStore for HttpProcedureStore {
    async fn list_procedures(&self) -> Result<Vec<ProcedureSummary>, StoreError> {
        let body = self.get_json("/procedures", None).await?;
        parse_procedure_list(body)
    }

    async fn procedure_detail(&self, id: u32) -> Result<ProcedureDetail, StoreError> {
        let body = self.get_json(&format!("/procedures/{id}"), Some(id)).await?;
        parse_procedure_detail(body)
    }

    async fn procedure_steps(&self, id: u32) -> Result<Vec<ProcedureStep>, StoreError> {
        let body = self
            .get_json(&format!("/proceduresteps/{id}"), Some(id))
            .await?;
        parse_procedure_steps(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let url = Url::parse("http://localhost:8000/").unwrap();
        let store = HttpProcedureStore::new(&url, Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let url = Url::parse("http://db.local/api/").unwrap();
        let store = HttpProcedureStore::new(&url, Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://db.local/api");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_upstream_unavailable() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let store = HttpProcedureStore::new(&url, Duration::from_millis(500)).unwrap();
        let result = store.list_procedures().await;
        assert!(matches!(result, Err(StoreError::UpstreamUnavailable(_))));
    }
}
