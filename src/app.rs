//! Composition of the journal store and its effect coordinator.
//!
//! ```text
//! View ── Submit ──→ Store ──→ SubmissionCoordinator ──→ EntryRepository
//!  ↑                   ↑                 │
//!  │                   └─ EntriesUpdated ┘
//!  └──── subscribe ────┘
//! ```
//!
//! One explicitly constructed instance per process; nothing is global.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::effects::{
    wait_for_progress, FailureListener, SubmissionCoordinator, SubmissionProgress,
};
use crate::journal::{Action, AppState, JournalReducer};
use crate::repository::EntryRepository;
use crate::shutdown::ShutdownCoordinator;
use crate::store::{Store, StoreHandle};

/// Handle used by views: `dispatch` actions, `subscribe` to state.
pub type JournalHandle = StoreHandle<AppState, Action>;

/// Builder for [`JournalApp`].
pub struct JournalAppBuilder {
    repository: Arc<dyn EntryRepository>,
    failure_listener: Option<Arc<dyn FailureListener>>,
    initial: AppState,
}

impl JournalAppBuilder {
    /// Report failed submissions to `listener` (no action is dispatched either way).
    pub fn with_failure_listener(mut self, listener: Arc<dyn FailureListener>) -> Self {
        self.failure_listener = Some(listener);
        self
    }

    /// Seed the store with existing entries instead of an empty history.
    pub fn with_initial_state(mut self, initial: AppState) -> Self {
        self.initial = initial;
        self
    }

    pub fn build(self) -> JournalApp {
        let (store, handle) = Store::<JournalReducer>::new(self.initial);
        let mut coordinator = SubmissionCoordinator::new(self.repository, handle.clone());
        if let Some(listener) = self.failure_listener {
            coordinator = coordinator.with_failure_listener(listener);
        }

        JournalApp {
            store,
            coordinator,
            handle,
        }
    }
}

/// A fully wired, not yet running journal.
pub struct JournalApp {
    store: Store<JournalReducer>,
    coordinator: SubmissionCoordinator,
    handle: JournalHandle,
}

impl JournalApp {
    pub fn builder(repository: Arc<dyn EntryRepository>) -> JournalAppBuilder {
        JournalAppBuilder {
            repository,
            failure_listener: None,
            initial: AppState::new(),
        }
    }

    /// Handle usable before the loops start; dispatched actions queue up.
    pub fn handle(&self) -> JournalHandle {
        self.handle.clone()
    }

    /// Spawn the store and coordinator loops on the current tokio runtime.
    pub fn start(self) -> RunningJournal {
        let shutdown = ShutdownCoordinator::new();
        let progress = self.coordinator.progress();

        let store_task = tokio::spawn(self.store.run(shutdown.handle()));
        let coordinator_task = tokio::spawn(self.coordinator.run(shutdown.handle()));
        tracing::info!("Journal store started");

        RunningJournal {
            handle: self.handle,
            progress,
            shutdown,
            store_task,
            coordinator_task,
        }
    }
}

/// A running journal: store loop plus submission coordinator.
pub struct RunningJournal {
    handle: JournalHandle,
    progress: watch::Receiver<SubmissionProgress>,
    shutdown: ShutdownCoordinator,
    store_task: JoinHandle<()>,
    coordinator_task: JoinHandle<()>,
}

impl RunningJournal {
    pub fn handle(&self) -> JournalHandle {
        self.handle.clone()
    }

    pub fn progress(&self) -> watch::Receiver<SubmissionProgress> {
        self.progress.clone()
    }

    /// Wait until submission `generation` has started and no call is in flight.
    ///
    /// Generations count `Submit` actions observed by the coordinator,
    /// starting at 1.
    pub async fn wait_settled(&self, generation: u64) {
        let mut progress = self.progress.clone();
        wait_for_progress(&mut progress, generation, |p| p.is_settled(generation)).await;
    }

    /// Wait until submission `generation`, or a newer one, has been handled.
    ///
    /// Unlike [`wait_settled`](Self::wait_settled) this does not wait for
    /// superseded calls whose results will be discarded.
    pub async fn wait_resolved(&self, generation: u64) {
        let mut progress = self.progress.clone();
        wait_for_progress(&mut progress, generation, |p| p.is_resolved(generation)).await;
    }

    /// Stop both loops. In-flight repository calls are left to finish on
    /// their own; their results go nowhere.
    pub async fn shutdown(self) {
        self.shutdown.signal();

        if let Err(e) = self.coordinator_task.await {
            tracing::error!(error = %e, "Submission coordinator task failed");
        }
        if let Err(e) = self.store_task.await {
            tracing::error!(error = %e, "Store task failed");
        }
        tracing::info!("Journal store stopped");
    }
}
