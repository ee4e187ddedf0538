//! Intent transport server.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::{watch, Mutex};

use super::{TransportError, DEFAULT_SOCKET_PATH};
use crate::dialogue::{messages, DialogueResponse, IntentEvent, IntentRouter};

/// Server receiving intent events on a Unix domain socket.
///
/// Each connection gets its own task; the handler decides how events are
/// serialized. [`IntentServer::serve_router`] holds a lock for the whole of
/// each event so the dialogue sees one intent at a time.
#[derive(Debug)]
pub struct IntentServer {
    socket_path: PathBuf,
}

impl IntentServer {
    #[must_use]
    pub fn new<P: AsRef<Path>>(socket_path: P) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(DEFAULT_SOCKET_PATH)
    }

    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Serve a router. Events are processed strictly one after another.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the socket.
    pub fn serve_router(&self, router: IntentRouter) -> Result<ServerHandle, TransportError> {
        let router = Arc::new(Mutex::new(router));
        self.start(move |event| {
            let router = Arc::clone(&router);
            async move {
                let mut router = router.lock().await;
                router.route(event).await
            }
        })
    }

    /// Starts the server with the given event handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the socket.
    pub fn start<F, Fut>(&self, handler: F) -> Result<ServerHandle, TransportError>
    where
        F: Fn(IntentEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DialogueResponse> + Send,
    {
        // Remove a stale socket left by a previous run
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!(path = %self.socket_path.display(), "Intent server started");

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handler = Arc::new(handler);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Intent server shutting down");
                            break;
                        }
                    }

                    accept_result = listener.accept() => {
                        match accept_result {
                            Ok((stream, _addr)) => {
                                let handler = Arc::clone(&handler);
                                tokio::spawn(async move {
                                    if let Err(e) = handle_connection(stream, handler).await {
                                        tracing::warn!(error = %e, "Connection handler error");
                                    }
                                });
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Failed to accept connection");
                            }
                        }
                    }
                }
            }
        });

        Ok(ServerHandle {
            socket_path: self.socket_path.clone(),
            shutdown_tx,
        })
    }
}

/// Handle for a running intent server.
///
/// When dropped, the socket file is cleaned up.
#[derive(Debug)]
pub struct ServerHandle {
    socket_path: PathBuf,
    shutdown_tx: watch::Sender<bool>,
}

impl ServerHandle {
    /// Signals the server to shut down.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);

        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                tracing::warn!(
                    path = %self.socket_path.display(),
                    error = %e,
                    "Failed to remove socket file"
                );
            }
        }
    }
}

/// Answer for a request line that is not an intent event. The session id is
/// echoed when the line at least carries one.
fn undecodable(line: &str, error: &serde_json::Error) -> DialogueResponse {
    let session_id = serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("sessionId")?.as_str().map(str::to_string))
        .unwrap_or_default();
    tracing::warn!(error = %error, session_id = %session_id, "Undecodable intent event");

    DialogueResponse::EndSession {
        session_id,
        text: messages::NOT_UNDERSTOOD.to_string(),
    }
}

async fn handle_connection<F, Fut>(
    stream: tokio::net::UnixStream,
    handler: Arc<F>,
) -> Result<(), TransportError>
where
    F: Fn(IntentEvent) -> Fut + Send + Sync,
    Fut: Future<Output = DialogueResponse> + Send,
{
    let (reader, mut writer) = stream.into_split();
    let mut line = String::new();
    if BufReader::new(reader).read_line(&mut line).await? == 0 {
        return Ok(());
    }

    let response = match serde_json::from_str::<IntentEvent>(line.trim()) {
        Ok(event) => {
            tracing::debug!(
                session_id = %event.session_id,
                intent = %event.intent_name,
                slots = event.slots.len(),
                "Received intent"
            );
            handler(event).await
        }
        Err(e) => undecodable(line.trim(), &e),
    };

    let mut response_json = serde_json::to_string(&response)?;
    response_json.push('\n');
    writer.write_all(response_json.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::transport::IntentClient;

    #[test]
    fn server_new_uses_custom_path() {
        let server = IntentServer::new("/custom/path.sock");
        assert_eq!(server.socket_path(), Path::new("/custom/path.sock"));
    }

    #[test]
    fn server_with_default_path_uses_default() {
        let server = IntentServer::with_default_path();
        assert_eq!(server.socket_path(), Path::new(DEFAULT_SOCKET_PATH));
    }

    #[tokio::test]
    async fn server_client_echo() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("echo.sock");

        let server = IntentServer::new(&socket_path);
        let handle = server
            .start(|event| async move {
                DialogueResponse::EndSession {
                    session_id: event.session_id,
                    text: format!("heard {}", event.intent_name),
                }
            })
            .expect("Failed to start server");

        tokio::time::sleep(Duration::from_millis(10)).await;

        let client = IntentClient::with_path(&socket_path);
        assert!(client.is_assistant_running());

        let response = client
            .send(&IntentEvent::new("livingonmars:help", "abc"))
            .await
            .expect("Send failed");
        assert_eq!(response.text(), "heard livingonmars:help");
        assert_eq!(response.session_id(), "abc");

        handle.shutdown();
    }

    #[test]
    fn undecodable_line_echoes_session_id() {
        let line = r#"{"sessionId": "abc", "slots": 3}"#;
        let error = serde_json::from_str::<IntentEvent>(line).unwrap_err();
        let response = undecodable(line, &error);
        assert_eq!(response.session_id(), "abc");
        assert_eq!(response.text(), messages::NOT_UNDERSTOOD);

        let error = serde_json::from_str::<IntentEvent>("garbage").unwrap_err();
        assert_eq!(undecodable("garbage", &error).session_id(), "");
    }

    #[tokio::test]
    async fn server_handle_drop_cleans_up_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("drop.sock");

        {
            let server = IntentServer::new(&socket_path);
            let _handle = server
                .start(|event| async move {
                    DialogueResponse::EndSession {
                        session_id: event.session_id,
                        text: String::new(),
                    }
                })
                .expect("Failed to start server");

            assert!(socket_path.exists());
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!socket_path.exists());
    }
}
