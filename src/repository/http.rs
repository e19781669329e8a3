//! HTTP implementation of the entry repository.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::RepositoryConfig;
use crate::journal::JournalEntry;

use super::error::RepositoryError;
use super::EntryRepository;

#[derive(Serialize)]
struct SubmitRequest<'a> {
    text: &'a str,
}

/// Posts entry text as JSON to the configured endpoint.
pub struct HttpEntryRepository {
    client: Client,
    endpoint: String,
}

impl HttpEntryRepository {
    pub fn new(config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .build()
            .map_err(RepositoryError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl EntryRepository for HttpEntryRepository {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn submit_entry(&self, text: &str) -> Result<JournalEntry, RepositoryError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            text_len = text.len(),
            "Submitting journal entry"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&SubmitRequest { text })
            .send()
            .await
            .map_err(|source| RepositoryError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| RepositoryError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            tracing::debug!(status = %status, latency_ms, "Mood service rejected entry");
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let entry: JournalEntry = serde_json::from_str(&body)?;
        tracing::debug!(
            id = entry.id,
            mood = %entry.mood,
            latency_ms,
            "Journal entry resolved"
        );
        Ok(entry)
    }
}
