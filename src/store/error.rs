//! Procedure store error types.

/// Errors returned by a [`super::ProcedureStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The backing service could not be reached or answered with an error.
    #[error("Procedure service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// No procedure exists with this id.
    #[error("Procedure {0} not found")]
    NotFound(u32),

    /// The service answered with a body of the wrong shape.
    #[error("Invalid response from procedure service: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::UpstreamUnavailable(e.to_string())
        }
    }
}
