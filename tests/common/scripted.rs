//! In-memory entry repository whose replies the test releases.

#![allow(dead_code)]

use async_trait::async_trait;
use moodjournal::journal::JournalEntry;
use moodjournal::mood_service::predict_mood;
use moodjournal::repository::{EntryRepository, RepositoryError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

type Reply = Result<JournalEntry, RepositoryError>;

/// Releases the reply for one gated text.
pub struct Gate(oneshot::Sender<Reply>);

impl Gate {
    pub fn succeed(self, entry: JournalEntry) {
        let _ = self.0.send(Ok(entry));
    }

    pub fn fail(self, status: u16, body: &str) {
        let _ = self.0.send(Err(RepositoryError::Status {
            status,
            body: body.to_string(),
        }));
    }
}

/// Repository that answers immediately unless a text was gated with
/// [`ScriptedRepository::gate`], in which case the call waits for the gate.
#[derive(Default)]
pub struct ScriptedRepository {
    gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
    next_id: AtomicU64,
}

impl ScriptedRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold the reply for `text` until the returned gate is released.
    pub fn gate(&self, text: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(text.to_string(), rx);
        Gate(tx)
    }

    /// Texts the repository was called with, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Texts whose call ran to completion, in completion order.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().clone()
    }
}

#[async_trait]
impl EntryRepository for ScriptedRepository {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn submit_entry(&self, text: &str) -> Result<JournalEntry, RepositoryError> {
        self.calls.lock().push(text.to_string());
        let gate = self.gates.lock().remove(text);

        let reply = match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| {
                Err(RepositoryError::Status {
                    status: 599,
                    body: "gate dropped".to_string(),
                })
            }),
            None => Ok(JournalEntry {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                time_created: "12:00:00 PM".to_string(),
                text: text.to_string(),
                mood: predict_mood(text).to_string(),
            }),
        };

        self.completed.lock().push(text.to_string());
        reply
    }
}
