//! Intent transport between the voice pipeline and the dialogue engine.
//!
//! # Protocol
//!
//! JSON-line format over a Unix domain socket, one exchange per connection:
//! - Client sends an [`IntentEvent`](crate::dialogue::IntentEvent) + newline
//! - Server responds with a [`DialogueResponse`](crate::dialogue::DialogueResponse) + newline
//!
//! ```text
//! Voice pipeline                 Assistant
//!     |                              |
//!     |-- IntentEvent -------------->|
//!     |                              | (route, handle)
//!     |<-- DialogueResponse ---------|
//! ```

pub mod client;
pub mod server;
pub mod types;

pub use client::IntentClient;
pub use server::{IntentServer, ServerHandle};
pub use types::TransportError;

/// Default socket path for the intent transport.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/procedure-assistant.sock";
