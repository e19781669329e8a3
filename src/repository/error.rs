//! Error types for entry submission.

use thiserror::Error;

/// Errors that can occur while submitting an entry.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection failure, timeout or broken transfer.
    #[error("Request to '{endpoint}' failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply body is not a journal entry.
    #[error("Malformed journal entry in reply: {0}")]
    Decode(#[from] serde_json::Error),
}
