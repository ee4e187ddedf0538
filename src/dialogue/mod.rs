//! Dialogue core: session state, intents, the state machine and routing.
//!
//! # Phases
//!
//! ```text
//! Idle (0.0) --show/choose/start--> Listing (1.1) --choose--> AwaitingConfirmation (1.2)
//!     ^                                 ^                            |
//!     |                                 +--------- confirm: no ------+
//!     |                                                              | confirm: yes
//!     |                                                              v
//!     +--finish-- LastStep (3.2) <--next step-- Stepping (3.1) <--start-- Briefing (2.1)
//! ```
//!
//! `cancel` returns to `Idle` from anywhere; `repeat` and `help` never change
//! the phase.

mod engine;
pub mod intent;
pub mod messages;
mod response;
mod router;
mod session;

pub use engine::DialogueEngine;
pub use intent::{IntentEvent, IntentKind, SlotValue};
pub use response::{DialogueResponse, Reply};
pub use router::IntentRouter;
pub use session::{DialoguePhase, DialogueSession};
