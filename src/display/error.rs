//! Display error types.

/// Errors from display notifications. Never surfaced to the user.
#[derive(thiserror::Error, Debug)]
pub enum DisplayError {
    /// The display service could not be reached.
    #[error("Display service unavailable: {0}")]
    Unavailable(String),

    /// The display service answered with a non-success status.
    #[error("Display service rejected {endpoint}: HTTP {status}")]
    Rejected { endpoint: String, status: u16 },
}

impl From<reqwest::Error> for DisplayError {
    fn from(e: reqwest::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}
