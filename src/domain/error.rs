use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a URL")]
    EmptyUrl,

    #[error("Please select an item first")]
    NoSelection,

    #[error("Queue index {index} is out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Download {0} is still active")]
    SessionActive(String),

    /// Rejection reported by the download service, message kept verbatim.
    #[error("{0}")]
    Remote(String),

    #[error("Could not reach the download service: {0}")]
    Transport(String),
}

impl AppError {
    /// Errors raised before any request leaves the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::EmptyUrl
                | AppError::NoSelection
                | AppError::IndexOutOfRange { .. }
                | AppError::SessionActive(_)
        )
    }
}
