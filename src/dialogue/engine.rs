//! The dialogue state machine.
//!
//! Every handler checks the current phase, talks to the procedure store,
//! mirrors the change on the display and returns what to say. Handlers never
//! fail: upstream errors become degraded replies with the phase unchanged,
//! and display errors are only logged.

use std::sync::Arc;

use crate::display::{DisplayClient, DisplayError};
use crate::store::{ProcedureStore, StoreError};

use super::intent::{parse_ordinal, Confirmation, CONFIRMATION_SLOT, PROCEDURE_SLOT};
use super::{messages, DialoguePhase, DialogueSession, IntentEvent, IntentKind, Reply};

fn log_display_result(action: &str, result: Result<(), DisplayError>) {
    if let Err(e) = result {
        tracing::warn!(action, error = %e, "Display update failed");
    }
}

/// Dialogue engine owning the session of the one live conversation.
pub struct DialogueEngine {
    session: DialogueSession,
    store: Arc<dyn ProcedureStore>,
    display: Arc<dyn DisplayClient>,
}

impl DialogueEngine {
    #[must_use]
    pub fn new(store: Arc<dyn ProcedureStore>, display: Arc<dyn DisplayClient>) -> Self {
        Self {
            session: DialogueSession::new(),
            store,
            display,
        }
    }

    #[must_use]
    pub fn session(&self) -> &DialogueSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> DialoguePhase {
        self.session.phase()
    }

    /// Handle one intent to completion.
    pub async fn handle(&mut self, kind: IntentKind, event: &IntentEvent) -> Reply {
        tracing::debug!(intent = ?kind, phase = ?self.session.phase(), "Handling intent");

        match (kind, self.session.phase()) {
            (IntentKind::Show | IntentKind::Choose | IntentKind::Start, DialoguePhase::Idle) => {
                self.list_procedures().await
            }
            (IntentKind::Choose, DialoguePhase::Listing) => self.choose(event).await,
            (IntentKind::Confirm, DialoguePhase::AwaitingConfirmation) => {
                self.confirm(event).await
            }
            (IntentKind::Show | IntentKind::Start, DialoguePhase::Briefing) => {
                self.start_steps().await
            }
            (IntentKind::NextStep, DialoguePhase::Stepping) => self.next_step().await,
            (IntentKind::Finish, DialoguePhase::LastStep) => self.finish().await,
            (IntentKind::Cancel, _) => self.cancel().await,
            (IntentKind::Repeat, _) => self.repeat(),
            (IntentKind::Help, _) => self.help(),
            (kind, phase) => {
                tracing::debug!(intent = ?kind, phase = ?phase, "Intent not expected here");
                self.help()
            }
        }
    }

    /// Generic help with a hint for the current phase. Never changes state.
    #[must_use]
    pub fn help(&self) -> Reply {
        Reply::end(messages::manual(self.session.phase()))
    }

    async fn display_present(&self) -> bool {
        self.display.is_present().await
    }

    async fn list_procedures(&mut self) -> Reply {
        let procedures = match self.store.list_procedures().await {
            Ok(procedures) => procedures,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list procedures");
                return Reply::end(messages::LIST_UNAVAILABLE);
            }
        };

        let list_text = messages::procedure_list(&procedures);
        let text = messages::procedures_found(procedures.len(), &list_text);
        self.session.procedures_list_text = Some(list_text);

        if self.display_present().await {
            log_display_result("show_list", self.display.show_list(&procedures).await);
        }

        self.session.transition(DialoguePhase::Listing);
        Reply::end(text)
    }

    async fn choose(&mut self, event: &IntentEvent) -> Reply {
        let reprompt = || {
            Reply::continue_with(
                messages::SELECT_A_NUMBER,
                &[IntentKind::Choose, IntentKind::Cancel],
            )
        };

        let Some(choice) = event.slot(PROCEDURE_SLOT).and_then(parse_ordinal) else {
            tracing::debug!(slot = ?event.slot(PROCEDURE_SLOT), "Unrecognized procedure number");
            return reprompt();
        };

        let procedures = match self.store.list_procedures().await {
            Ok(procedures) => procedures,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list procedures");
                return Reply::end(messages::LIST_UNAVAILABLE);
            }
        };

        let Some(procedure) = procedures.iter().find(|p| p.id == choice) else {
            tracing::debug!(choice, available = procedures.len(), "Procedure number out of range");
            return reprompt();
        };

        self.session.selected_procedure = Some(choice);
        self.session.selected_procedure_title = Some(procedure.title.clone());
        let text = messages::confirm_selection(choice, &procedure.title);

        if self.display_present().await {
            log_display_result(
                "highlight_selection",
                self.display.highlight_selection(choice).await,
            );
        }

        self.session.transition(DialoguePhase::AwaitingConfirmation);
        Reply::continue_with(text, &[IntentKind::Confirm, IntentKind::Cancel])
    }

    async fn confirm(&mut self, event: &IntentEvent) -> Reply {
        let answer = Confirmation::from_slot(event.slot(CONFIRMATION_SLOT));
        let selected = self.session.selected_procedure;

        let Some(id) = selected.filter(|_| answer == Confirmation::Yes) else {
            tracing::info!(answer = ?answer, selected = ?selected, "Selection not confirmed");
            return self.back_to_list(None).await;
        };

        let detail = match self.store.procedure_detail(id).await {
            Ok(detail) => detail,
            Err(StoreError::NotFound(id)) => {
                tracing::warn!(id, "Selected procedure no longer exists");
                return self.back_to_list(Some(id)).await;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to fetch procedure detail");
                return Reply::continue_with(
                    messages::DETAIL_UNAVAILABLE,
                    &[IntentKind::Confirm, IntentKind::Cancel],
                );
            }
        };

        let resources = detail.resources_summary();
        let text = messages::briefing(&detail.title, detail.steps_count, &resources);
        self.session.selected_procedure_title = Some(detail.title.clone());
        self.session.total_steps = Some(detail.steps_count);
        self.session.resources_summary = Some(resources);

        if self.display_present().await {
            log_display_result("show_detail", self.display.show_detail(&detail).await);
        }

        self.session.transition(DialoguePhase::Briefing);
        Reply::end(text)
    }

    /// Drop the pending selection and read the list again, from the cache
    /// when there is one. If the list has to be fetched and the store is
    /// down, the selection stays pending.
    async fn back_to_list(&mut self, missing: Option<u32>) -> Reply {
        let (list_text, refreshed) = match self.session.procedures_list_text.clone() {
            Some(text) => (text, None),
            None => match self.store.list_procedures().await {
                Ok(procedures) => (messages::procedure_list(&procedures), Some(procedures)),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to list procedures");
                    return Reply::continue_with(
                        messages::LIST_UNAVAILABLE,
                        &[IntentKind::Confirm, IntentKind::Cancel],
                    );
                }
            },
        };

        self.session.selected_procedure = None;
        self.session.selected_procedure_title = None;
        self.session.procedures_list_text = Some(list_text.clone());

        if self.display_present().await {
            log_display_result("show_cancel", self.display.show_cancel().await);
            if let Some(procedures) = &refreshed {
                log_display_result("show_list", self.display.show_list(procedures).await);
            }
        }

        self.session.transition(DialoguePhase::Listing);
        match missing {
            Some(id) => Reply::end(messages::procedure_not_found(id, &list_text)),
            None => Reply::end(messages::procedures_again(&list_text)),
        }
    }

    async fn start_steps(&mut self) -> Reply {
        let Some(id) = self.session.selected_procedure else {
            tracing::warn!("Briefing without a selected procedure");
            return self.help();
        };

        let steps = match self.store.procedure_steps(id).await {
            Ok(steps) => steps,
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to fetch procedure steps");
                return Reply::end(messages::STEPS_UNAVAILABLE);
            }
        };

        let Some(first) = steps.first().cloned() else {
            tracing::warn!(id, "Procedure has no steps");
            return Reply::end(messages::NO_STEPS);
        };

        let total = steps.len();
        if self.session.total_steps != Some(total) {
            tracing::warn!(
                id,
                announced = ?self.session.total_steps,
                fetched = total,
                "Step count mismatch, using fetched steps"
            );
        }
        self.session.total_steps = Some(total);
        self.session.current_step = Some(1);
        self.session.procedure_steps = Some(steps);

        if self.display_present().await {
            log_display_result("start", self.display.start().await);
            log_display_result("show_step", self.display.show_step(&first).await);
        }

        if total == 1 {
            self.session.transition(DialoguePhase::LastStep);
            Reply::end(messages::only_step(&first.description))
        } else {
            self.session.transition(DialoguePhase::Stepping);
            Reply::end(messages::first_step(&first.description))
        }
    }

    async fn next_step(&mut self) -> Reply {
        let (Some(current), Some(total)) = (self.session.current_step, self.session.total_steps)
        else {
            tracing::warn!("Stepping without a step cursor");
            return self.help();
        };

        let next = current + 1;
        let Some(step) = self
            .session
            .procedure_steps
            .as_ref()
            .and_then(|steps| steps.get(next - 1))
            .cloned()
        else {
            tracing::warn!(next, total, "No step after the current one");
            return self.help();
        };

        self.session.current_step = Some(next);
        tracing::debug!(step = next, total, "Advancing to next step");

        let text = if next == total {
            self.session.transition(DialoguePhase::LastStep);
            messages::last_step(&step.description)
        } else {
            messages::step_of(next, total, &step.description)
        };

        if self.display_present().await {
            log_display_result("show_step", self.display.show_step(&step).await);
        }

        Reply::end(text)
    }

    async fn finish(&mut self) -> Reply {
        tracing::info!(procedure = ?self.session.selected_procedure, "Procedure finished");
        self.session.reset();

        if self.display_present().await {
            log_display_result("show_finish", self.display.show_finish().await);
        }

        Reply::end(messages::FINISHED)
    }

    async fn cancel(&mut self) -> Reply {
        tracing::info!(phase = ?self.session.phase(), "Dialogue cancelled");
        self.session.reset();

        if self.display_present().await {
            log_display_result("show_cancel", self.display.show_cancel().await);
        }

        Reply::end(messages::CANCELLED)
    }

    /// Say again what belongs to the current phase, from cached fields only.
    fn repeat(&self) -> Reply {
        let session = &self.session;
        let forgotten = || Reply::end(messages::DO_NOT_REMEMBER);

        match session.phase() {
            DialoguePhase::Idle => Reply::end(messages::NOTHING_SAID_YET),
            DialoguePhase::Listing => session
                .procedures_list_text()
                .map_or_else(forgotten, |list| Reply::end(messages::procedures_again(list))),
            DialoguePhase::AwaitingConfirmation => {
                match (session.selected_procedure(), session.selected_procedure_title()) {
                    (Some(id), Some(title)) => Reply::continue_with(
                        messages::confirm_selection(id, title),
                        &[IntentKind::Confirm, IntentKind::Cancel],
                    ),
                    _ => forgotten(),
                }
            }
            DialoguePhase::Briefing => match (
                session.selected_procedure_title(),
                session.total_steps(),
                session.resources_summary(),
            ) {
                (Some(title), Some(total), Some(resources)) => {
                    Reply::end(messages::briefing_again(title, total, resources))
                }
                _ => forgotten(),
            },
            DialoguePhase::Stepping => {
                match (
                    session.current_step(),
                    session.total_steps(),
                    session.current_step_record(),
                ) {
                    (Some(1), _, Some(step)) => {
                        Reply::end(messages::first_step_again(&step.description))
                    }
                    (Some(current), Some(total), Some(step)) => Reply::end(
                        messages::step_of_again(current, total, &step.description),
                    ),
                    _ => forgotten(),
                }
            }
            DialoguePhase::LastStep => session
                .current_step_record()
                .map_or_else(forgotten, |step| {
                    Reply::end(messages::last_step_again(&step.description))
                }),
        }
    }
}
