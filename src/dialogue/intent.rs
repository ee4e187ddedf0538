//! Intent kinds, intent events and slot parsing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The closed set of intents the assistant understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Show,
    Choose,
    Confirm,
    Start,
    NextStep,
    Finish,
    Repeat,
    Help,
    Cancel,
}

impl IntentKind {
    pub const ALL: [Self; 9] = [
        Self::Show,
        Self::Choose,
        Self::Confirm,
        Self::Start,
        Self::NextStep,
        Self::Finish,
        Self::Repeat,
        Self::Help,
        Self::Cancel,
    ];

    /// Intent name without namespace, as registered with the voice assistant.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Show => "showProcedures",
            Self::Choose => "chooseProcedure",
            Self::Confirm => "confirmProcedure",
            Self::Start => "startProcedure",
            Self::NextStep => "nextStep",
            Self::Finish => "finishProcedure",
            Self::Repeat => "repeat",
            Self::Help => "help",
            Self::Cancel => "cancelProcedure",
        }
    }
}

/// Slot names read by the engine.
pub const PROCEDURE_SLOT: &str = "procedure";
pub const CONFIRMATION_SLOT: &str = "confirmation";

/// A value extracted from the utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    /// Text as spoken.
    pub raw_value: String,
    /// Normalized value, when the recognizer resolved one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One recognized utterance, delivered by the intent transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentEvent {
    pub intent_name: String,
    pub session_id: String,
    #[serde(default)]
    pub slots: HashMap<String, SlotValue>,
}

impl IntentEvent {
    #[must_use]
    pub fn new(intent_name: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            intent_name: intent_name.into(),
            session_id: session_id.into(),
            slots: HashMap::new(),
        }
    }

    /// Attach a slot with the given raw value.
    #[must_use]
    pub fn with_slot(mut self, name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        self.slots.insert(
            name.into(),
            SlotValue {
                raw_value: raw_value.into(),
                value: None,
            },
        );
        self
    }

    /// Slot value, preferring the normalized value over the raw text.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .map(|s| s.value.as_deref().unwrap_or(&s.raw_value))
    }
}

const ORDINALS: [(&str, u32); 6] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
];

/// Parse a spoken ordinal word ("one" to "six").
#[must_use]
pub fn parse_ordinal(word: &str) -> Option<u32> {
    let word = word.trim();
    ORDINALS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(word))
        .map(|(_, n)| *n)
}

/// Answer to a confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    /// Only an explicit "yes" confirms; anything else, including a missing
    /// slot, is a no.
    #[must_use]
    pub fn from_slot(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("yes") => Self::Yes,
            _ => Self::No,
        }
    }
}
