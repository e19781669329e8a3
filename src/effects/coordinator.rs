//! Submission coordinator with latest-wins semantics.
//!
//! Every observed `Submit` starts a repository call and bumps the
//! generation. Calls complete back into the same loop, so comparing a
//! result's generation with the current one and dispatching it happen
//! without a newer `Submit` slipping in between. Only the result of the
//! most recently started submission becomes an `EntriesUpdated` action.
//!
//! Superseded calls are not aborted; their results are dropped on arrival.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};

use crate::journal::{Action, AppState, JournalEntry};
use crate::repository::{EntryRepository, RepositoryError};
use crate::shutdown::ShutdownHandle;
use crate::store::StoreHandle;

use super::failure::{FailureListener, SubmitFailure};
use super::progress::SubmissionProgress;

struct Completion {
    generation: u64,
    text: String,
    result: Result<JournalEntry, RepositoryError>,
}

pub struct SubmissionCoordinator {
    repository: Arc<dyn EntryRepository>,
    store: StoreHandle<AppState, Action>,
    actions: mpsc::UnboundedReceiver<Action>,
    failure_listener: Option<Arc<dyn FailureListener>>,
    generation: u64,
    resolved: u64,
    in_flight: JoinSet<Completion>,
    progress: watch::Sender<SubmissionProgress>,
}

impl SubmissionCoordinator {
    /// Create a coordinator observing `store`.
    ///
    /// The action subscription is taken here, so submissions dispatched
    /// between construction and [`run`](Self::run) are not missed.
    pub fn new(repository: Arc<dyn EntryRepository>, store: StoreHandle<AppState, Action>) -> Self {
        let actions = store.observe_actions();
        let (progress, _) = watch::channel(SubmissionProgress::default());

        Self {
            repository,
            store,
            actions,
            failure_listener: None,
            generation: 0,
            resolved: 0,
            in_flight: JoinSet::new(),
            progress,
        }
    }

    pub fn with_failure_listener(mut self, listener: Arc<dyn FailureListener>) -> Self {
        self.failure_listener = Some(listener);
        self
    }

    pub fn progress(&self) -> watch::Receiver<SubmissionProgress> {
        self.progress.subscribe()
    }

    /// Observe actions until shutdown is signaled or the store stops.
    pub async fn run(mut self, shutdown: ShutdownHandle) {
        tracing::debug!(repository = self.repository.name(), "Submission coordinator started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                action = self.actions.recv() => match action {
                    Some(action) => self.on_action(action),
                    None => break,
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.on_completion(joined);
                }
            }
        }

        tracing::debug!(
            in_flight = self.in_flight.len(),
            "Submission coordinator stopped"
        );
        self.in_flight.detach_all();
    }

    fn on_action(&mut self, action: Action) {
        let text = match action {
            Action::Submit { text } => text,
            other => {
                tracing::trace!(action = other.kind(), "Ignoring action");
                return;
            }
        };

        self.generation += 1;
        let generation = self.generation;

        if !self.in_flight.is_empty() {
            tracing::debug!(
                generation,
                superseded = self.in_flight.len(),
                "New submission supersedes in-flight calls"
            );
        }
        tracing::debug!(generation, text_len = text.len(), "Starting submission");

        let repository = Arc::clone(&self.repository);
        self.in_flight.spawn(async move {
            let result = repository.submit_entry(&text).await;
            Completion {
                generation,
                text,
                result,
            }
        });

        self.publish_progress();
    }

    fn on_completion(&mut self, joined: Result<Completion, JoinError>) {
        match joined {
            Err(e) => {
                tracing::error!(error = %e, "Submission task did not complete");
            }
            Ok(completion) if completion.generation != self.generation => {
                tracing::debug!(
                    generation = completion.generation,
                    latest = self.generation,
                    succeeded = completion.result.is_ok(),
                    "Discarding superseded submission result"
                );
            }
            Ok(Completion {
                generation,
                result: Ok(entry),
                ..
            }) => {
                tracing::debug!(generation, id = entry.id, mood = %entry.mood, "Submission resolved");
                self.resolved = generation;
                if self.store.dispatch(Action::entries_updated(entry)).is_err() {
                    tracing::debug!(generation, "Store closed, resolved entry dropped");
                }
            }
            Ok(Completion {
                generation,
                text,
                result: Err(error),
            }) => {
                tracing::warn!(generation, error = %error, "Journal submission failed");
                self.resolved = generation;
                if let Some(listener) = &self.failure_listener {
                    listener.on_submit_failed(&SubmitFailure {
                        generation,
                        text,
                        error,
                    });
                }
            }
        }

        self.publish_progress();
    }

    fn publish_progress(&self) {
        self.progress.send_replace(SubmissionProgress {
            generation: self.generation,
            in_flight: self.in_flight.len(),
            resolved: self.resolved,
        });
    }
}
