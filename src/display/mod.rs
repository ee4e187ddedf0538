//! GUI display service port.
//!
//! Display updates are best-effort: the engine checks [`DisplayClient::is_present`]
//! before each call and only logs failures.

mod error;
mod http;
mod presence;

pub use error::DisplayError;
pub use http::HttpDisplayClient;
pub use presence::PresenceProbe;

use async_trait::async_trait;

use crate::store::{ProcedureDetail, ProcedureStep, ProcedureSummary};

/// Presentation sink mirroring the dialogue on a screen.
#[async_trait]
pub trait DisplayClient: Send + Sync {
    /// Whether a display is attached. Checked before every notification.
    async fn is_present(&self) -> bool;

    /// Show the list of available procedures.
    async fn show_list(&self, procedures: &[ProcedureSummary]) -> Result<(), DisplayError>;

    /// Highlight the procedure the user picked.
    async fn highlight_selection(&self, id: u32) -> Result<(), DisplayError>;

    /// Show the briefing for a confirmed procedure.
    async fn show_detail(&self, detail: &ProcedureDetail) -> Result<(), DisplayError>;

    /// Switch the screen to step-by-step mode.
    async fn start(&self) -> Result<(), DisplayError>;

    /// Show a single step.
    async fn show_step(&self, step: &ProcedureStep) -> Result<(), DisplayError>;

    /// Show the finish screen.
    async fn show_finish(&self) -> Result<(), DisplayError>;

    /// Drop back to the procedure list after a cancel or rejected selection.
    async fn show_cancel(&self) -> Result<(), DisplayError>;
}

/// Display client used when no screen is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

#[async_trait]
impl DisplayClient for NoDisplay {
    async fn is_present(&self) -> bool {
        false
    }

    async fn show_list(&self, _procedures: &[ProcedureSummary]) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn highlight_selection(&self, _id: u32) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn show_detail(&self, _detail: &ProcedureDetail) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn start(&self) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn show_step(&self, _step: &ProcedureStep) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn show_finish(&self) -> Result<(), DisplayError> {
        Ok(())
    }

    async fn show_cancel(&self) -> Result<(), DisplayError> {
        Ok(())
    }
}
