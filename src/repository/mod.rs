//! Entry repository: the boundary to the mood-prediction backend.
//!
//! The core only sees the [`EntryRepository`] trait; the HTTP client is
//! one implementation, tests inject their own.

mod error;
mod http;

use async_trait::async_trait;

use crate::journal::JournalEntry;

pub use error::RepositoryError;
pub use http::HttpEntryRepository;

/// Submits entry text and returns the entry with its predicted mood.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Submit `text` and return the fully formed entry.
    async fn submit_entry(&self, text: &str) -> Result<JournalEntry, RepositoryError>;
}
