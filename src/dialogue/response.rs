//! Engine replies and transport responses.

use serde::{Deserialize, Serialize};

use super::IntentKind;

/// What the engine wants said, and whether the voice turn stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Speak and close the voice turn.
    End { text: String },
    /// Speak and keep listening for one of `accept`.
    Continue {
        text: String,
        accept: Vec<IntentKind>,
    },
}

impl Reply {
    #[must_use]
    pub fn end(text: impl Into<String>) -> Self {
        Self::End { text: text.into() }
    }

    #[must_use]
    pub fn continue_with(text: impl Into<String>, accept: &[IntentKind]) -> Self {
        Self::Continue {
            text: text.into(),
            accept: accept.to_vec(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::End { text } | Self::Continue { text, .. } => text,
        }
    }

    #[must_use]
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::End { .. })
    }
}

/// Response sent back over the intent transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueResponse {
    /// End the voice session after speaking `text`.
    EndSession {
        #[serde(rename = "sessionId")]
        session_id: String,
        text: String,
    },
    /// Speak `text` and accept only the intents in `intent_filter` next.
    ContinueSession {
        #[serde(rename = "sessionId")]
        session_id: String,
        text: String,
        #[serde(rename = "intentFilter")]
        intent_filter: Vec<String>,
    },
}

impl DialogueResponse {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::EndSession { text, .. } | Self::ContinueSession { text, .. } => text,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::EndSession { session_id, .. } | Self::ContinueSession { session_id, .. } => {
                session_id
            }
        }
    }
}
