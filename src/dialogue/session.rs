//! Dialogue session state.

use serde::{Deserialize, Serialize};

use crate::store::ProcedureStep;

/// Phase of the dialogue. Each variant is one legal (stage, state) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialoguePhase {
    /// 0.0: waiting for the user to ask for an experiment.
    #[default]
    Idle,
    /// 1.1: procedures listed, waiting for a number.
    Listing,
    /// 1.2: a procedure was picked, waiting for yes or no.
    AwaitingConfirmation,
    /// 2.1: procedure confirmed and briefed, waiting for start.
    Briefing,
    /// 3.1: following the steps.
    Stepping,
    /// 3.2: on the last step, waiting for finish.
    LastStep,
}

impl DialoguePhase {
    pub const ALL: [Self; 6] = [
        Self::Idle,
        Self::Listing,
        Self::AwaitingConfirmation,
        Self::Briefing,
        Self::Stepping,
        Self::LastStep,
    ];

    #[must_use]
    pub fn stage(self) -> u8 {
        self.pair().0
    }

    #[must_use]
    pub fn state(self) -> u8 {
        self.pair().1
    }

    /// The (stage, state) pair.
    #[must_use]
    pub fn pair(self) -> (u8, u8) {
        match self {
            Self::Idle => (0, 0),
            Self::Listing => (1, 1),
            Self::AwaitingConfirmation => (1, 2),
            Self::Briefing => (2, 1),
            Self::Stepping => (3, 1),
            Self::LastStep => (3, 2),
        }
    }

    /// Look up the phase for a (stage, state) pair.
    #[must_use]
    pub fn from_pair(stage: u8, state: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.pair() == (stage, state))
    }
}

/// Everything the engine remembers about the current conversation.
#[derive(Debug, Clone, Default)]
pub struct DialogueSession {
    pub(crate) phase: DialoguePhase,
    pub(crate) selected_procedure: Option<u32>,
    pub(crate) selected_procedure_title: Option<String>,
    pub(crate) resources_summary: Option<String>,
    pub(crate) procedures_list_text: Option<String>,
    pub(crate) current_step: Option<usize>,
    pub(crate) total_steps: Option<usize>,
    pub(crate) procedure_steps: Option<Vec<ProcedureStep>>,
}

impl DialogueSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to idle and forget the selection, steps and cached texts.
    pub fn reset(&mut self) {
        tracing::debug!(from = ?self.phase, "Session reset");
        *self = Self::default();
    }

    pub(crate) fn transition(&mut self, to: DialoguePhase) {
        tracing::info!(
            from = ?self.phase,
            to = ?to,
            stage = to.stage(),
            state = to.state(),
            "Dialogue transition"
        );
        self.phase = to;
    }

    #[must_use]
    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    #[must_use]
    pub fn stage(&self) -> u8 {
        self.phase.stage()
    }

    #[must_use]
    pub fn state(&self) -> u8 {
        self.phase.state()
    }

    #[must_use]
    pub fn selected_procedure(&self) -> Option<u32> {
        self.selected_procedure
    }

    #[must_use]
    pub fn selected_procedure_title(&self) -> Option<&str> {
        self.selected_procedure_title.as_deref()
    }

    #[must_use]
    pub fn resources_summary(&self) -> Option<&str> {
        self.resources_summary.as_deref()
    }

    #[must_use]
    pub fn procedures_list_text(&self) -> Option<&str> {
        self.procedures_list_text.as_deref()
    }

    #[must_use]
    pub fn current_step(&self) -> Option<usize> {
        self.current_step
    }

    #[must_use]
    pub fn total_steps(&self) -> Option<usize> {
        self.total_steps
    }

    #[must_use]
    pub fn procedure_steps(&self) -> Option<&[ProcedureStep]> {
        self.procedure_steps.as_deref()
    }

    /// The step under the cursor.
    #[must_use]
    pub fn current_step_record(&self) -> Option<&ProcedureStep> {
        let index = self.current_step?.checked_sub(1)?;
        self.procedure_steps.as_ref()?.get(index)
    }

    /// True when nothing beyond the phase is remembered.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.selected_procedure.is_none()
            && self.selected_procedure_title.is_none()
            && self.resources_summary.is_none()
            && self.procedures_list_text.is_none()
            && self.current_step.is_none()
            && self.total_steps.is_none()
            && self.procedure_steps.is_none()
    }
}
