//! Procedure database access.
//!
//! The dialogue engine only sees the [`ProcedureStore`] trait. The HTTP
//! implementation talks to the procedure database service.

mod error;
mod http;
mod types;

pub use error::StoreError;
pub use http::HttpProcedureStore;
pub use types::*;

use async_trait::async_trait;

/// Read-only source of experiment procedures.
///
/// All operations are idempotent. Implementations are not expected to cache;
/// the engine keeps what it needs for "repeat" in the dialogue session.
#[async_trait]
pub trait ProcedureStore: Send + Sync {
    /// List every procedure, ordered by position. Ids are 1-based positions.
    async fn list_procedures(&self) -> Result<Vec<ProcedureSummary>, StoreError>;

    /// Fetch title, step count and resources for one procedure.
    async fn procedure_detail(&self, id: u32) -> Result<ProcedureDetail, StoreError>;

    /// Fetch the ordered steps of one procedure.
    async fn procedure_steps(&self, id: u32) -> Result<Vec<ProcedureStep>, StoreError>;
}
