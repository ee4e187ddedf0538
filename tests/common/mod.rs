//! In-memory store and display used by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use procedure_assistant::dialogue::{DialogueEngine, IntentEvent, IntentKind, IntentRouter};
use procedure_assistant::display::{DisplayClient, DisplayError};
use procedure_assistant::store::{
    ProcedureDetail, ProcedureStep, ProcedureStore, ProcedureSummary, StoreError,
};

/// A procedure held by [`MemoryStore`].
#[derive(Clone)]
pub struct Fixture {
    pub title: &'static str,
    pub resources: Vec<&'static str>,
    pub steps: Vec<&'static str>,
}

pub struct MemoryStore {
    procedures: Vec<Fixture>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new(procedures: Vec<Fixture>) -> Self {
        Self {
            procedures,
            available: AtomicBool::new(true),
        }
    }

    /// Three procedures; the second one has three steps.
    pub fn lab() -> Self {
        Self::new(vec![
            Fixture {
                title: "Growing Lettuce",
                resources: vec!["Seeds", "Soil"],
                steps: vec!["Fill the pot", "Plant the seeds"],
            },
            Fixture {
                title: "Testing Water",
                resources: vec!["Test tube", "Reagent", "Gloves"],
                steps: vec![
                    "Put on the gloves",
                    "Fill the test tube",
                    "Add two drops of reagent",
                ],
            },
            Fixture {
                title: "Measuring Radiation",
                resources: vec!["Geiger counter"],
                steps: vec!["Switch on the counter", "Read the value"],
            },
        ])
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn fixture(&self, id: u32) -> Result<&Fixture, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::UpstreamUnavailable("connection refused".to_string()));
        }
        id.checked_sub(1)
            .and_then(|i| self.procedures.get(i as usize))
            .ok_or(StoreError::NotFound(id))
    }
}

#[async_trait]
impl ProcedureStore for MemoryStore {
    async fn list_procedures(&self) -> Result<Vec<ProcedureSummary>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::UpstreamUnavailable("connection refused".to_string()));
        }
        Ok(self
            .procedures
            .iter()
            .zip(1u32..)
            .map(|(p, id)| ProcedureSummary::new(id, p.title))
            .collect())
    }

    async fn procedure_detail(&self, id: u32) -> Result<ProcedureDetail, StoreError> {
        let fixture = self.fixture(id)?;
        Ok(ProcedureDetail::new(
            fixture.title,
            fixture.steps.len(),
            &fixture.resources,
        ))
    }

    async fn procedure_steps(&self, id: u32) -> Result<Vec<ProcedureStep>, StoreError> {
        let fixture = self.fixture(id)?;
        Ok(fixture.steps.iter().map(|s| ProcedureStep::new(*s)).collect())
    }
}

/// Display that records every notification it receives.
#[derive(Default)]
pub struct RecordingDisplay {
    calls: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingDisplay {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), DisplayError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            Err(DisplayError::Unavailable("screen unplugged".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DisplayClient for RecordingDisplay {
    async fn is_present(&self) -> bool {
        true
    }

    async fn show_list(&self, procedures: &[ProcedureSummary]) -> Result<(), DisplayError> {
        self.record(format!("show_list {}", procedures.len()))
    }

    async fn highlight_selection(&self, id: u32) -> Result<(), DisplayError> {
        self.record(format!("select {id}"))
    }

    async fn show_detail(&self, detail: &ProcedureDetail) -> Result<(), DisplayError> {
        self.record(format!("detail {}", detail.title))
    }

    async fn start(&self) -> Result<(), DisplayError> {
        self.record("start".to_string())
    }

    async fn show_step(&self, step: &ProcedureStep) -> Result<(), DisplayError> {
        self.record(format!("step {}", step.description))
    }

    async fn show_finish(&self) -> Result<(), DisplayError> {
        self.record("finish".to_string())
    }

    async fn show_cancel(&self) -> Result<(), DisplayError> {
        self.record("cancel".to_string())
    }
}

pub fn engine(store: Arc<MemoryStore>, display: Arc<RecordingDisplay>) -> DialogueEngine {
    DialogueEngine::new(store, display)
}

pub fn router(store: Arc<MemoryStore>, display: Arc<RecordingDisplay>) -> IntentRouter {
    IntentRouter::new(engine(store, display), "livingonmars")
}

pub fn intent(kind: IntentKind) -> IntentEvent {
    IntentEvent::new(format!("livingonmars:{}", kind.wire_name()), "session-1")
}

pub fn choose(word: &str) -> IntentEvent {
    intent(IntentKind::Choose).with_slot("procedure", word)
}

pub fn confirm(word: &str) -> IntentEvent {
    intent(IntentKind::Confirm).with_slot("confirmation", word)
}
