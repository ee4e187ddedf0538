//! Transport error types.

/// Errors that can occur on the intent transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Socket I/O failed.
    #[error("Transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The assistant socket does not exist.
    #[error("Assistant not running (socket not found)")]
    AssistantNotRunning,

    /// The operation timed out.
    #[error("Transport timeout after {0}ms")]
    Timeout(u64),

    /// Failed to serialize or deserialize a message.
    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The peer closed the connection without answering.
    #[error("Empty response from assistant")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        let err = TransportError::AssistantNotRunning;
        assert_eq!(err.to_string(), "Assistant not running (socket not found)");

        let err = TransportError::Timeout(10_000);
        assert_eq!(err.to_string(), "Transport timeout after 10000ms");
    }
}
