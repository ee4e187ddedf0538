//! Intent transport client, used by the `send` command and by tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use super::{TransportError, DEFAULT_SOCKET_PATH};
use crate::dialogue::{DialogueResponse, IntentEvent};

/// Default timeout for one exchange. Store calls on the server side may take
/// a while, so this is generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client sending intent events to a running assistant.
#[derive(Debug, Clone)]
pub struct IntentClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl IntentClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(DEFAULT_SOCKET_PATH)
    }

    #[must_use]
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            socket_path: path.as_ref().to_path_buf(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks if the assistant is running by verifying the socket file exists.
    #[must_use]
    pub fn is_assistant_running(&self) -> bool {
        self.socket_path.exists()
    }

    /// Send one intent event and wait for the dialogue response.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The assistant is not running ([`TransportError::AssistantNotRunning`])
    /// - The connection fails ([`TransportError::Io`])
    /// - The operation times out ([`TransportError::Timeout`])
    /// - Message serialization fails ([`TransportError::Serialization`])
    /// - The connection closes without a response ([`TransportError::EmptyResponse`])
    pub async fn send(&self, event: &IntentEvent) -> Result<DialogueResponse, TransportError> {
        if !self.is_assistant_running() {
            return Err(TransportError::AssistantNotRunning);
        }

        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = self.timeout.as_millis() as u64;

        let result = tokio::time::timeout(self.timeout, async {
            let stream = UnixStream::connect(&self.socket_path).await?;
            let (reader, mut writer) = stream.into_split();

            let mut request_json = serde_json::to_string(event)?;
            request_json.push('\n');
            writer.write_all(request_json.as_bytes()).await?;
            writer.flush().await?;

            let mut reader = BufReader::new(reader);
            let mut response_line = String::new();
            let bytes_read = reader.read_line(&mut response_line).await?;

            if bytes_read == 0 {
                return Err(TransportError::EmptyResponse);
            }

            let response: DialogueResponse = serde_json::from_str(response_line.trim())?;
            Ok(response)
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(TransportError::Timeout(timeout_ms)),
        }
    }
}

impl Default for IntentClient {
    fn default() -> Self {
        Self::new()
    }
}
