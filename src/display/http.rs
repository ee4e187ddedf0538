//! HTTP client for the GUI display service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use url::Url;

use super::{DisplayClient, DisplayError, PresenceProbe};
use crate::store::{ProcedureDetail, ProcedureStep, ProcedureSummary};

/// Display client posting screen updates to the GUI service.
#[derive(Debug, Clone)]
pub struct HttpDisplayClient {
    client: Client,
    base_url: String,
    presence: PresenceProbe,
}

impl HttpDisplayClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError::Unavailable` if the HTTP client cannot be built.
    pub fn new(
        base_url: &Url,
        timeout: Duration,
        presence: PresenceProbe,
    ) -> Result<Self, DisplayError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| DisplayError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            presence,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<(), DisplayError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DisplayError::Rejected {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        tracing::trace!(endpoint, "Display updated");
        Ok(())
    }

    async fn post_json(&self, endpoint: &str, body: &serde_json::Value) -> Result<(), DisplayError> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.send(endpoint, request).await
    }
}

#[async_trait]
impl DisplayClient for HttpDisplayClient {
    async fn is_present(&self) -> bool {
        self.presence.check().await
    }

    async fn show_list(&self, procedures: &[ProcedureSummary]) -> Result<(), DisplayError> {
        let body = serde_json::Value::Array(procedures.iter().map(|p| p.raw.clone()).collect());
        self.post_json("/show", &body).await
    }

    async fn highlight_selection(&self, id: u32) -> Result<(), DisplayError> {
        self.post_json("/select", &serde_json::json!({ "id": id }))
            .await
    }

    async fn show_detail(&self, detail: &ProcedureDetail) -> Result<(), DisplayError> {
        self.post_json("/confirm", &detail.raw).await
    }

    async fn start(&self) -> Result<(), DisplayError> {
        let request = self.client.post(self.url("/start"));
        self.send("/start", request).await
    }

    async fn show_step(&self, step: &ProcedureStep) -> Result<(), DisplayError> {
        self.post_json("/showstep", &step.raw).await
    }

    async fn show_finish(&self) -> Result<(), DisplayError> {
        let request = self.client.get(self.url("/finish"));
        self.send("/finish", request).await
    }

    async fn show_cancel(&self) -> Result<(), DisplayError> {
        self.post_json("/cancel", &serde_json::json!({ "cancel": "true" }))
            .await
    }
}
