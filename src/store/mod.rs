//! Single-writer state container.
//!
//! [`Store::new`] returns the two halves of the container:
//!
//! - [`Store`] owns the action receiver and is the only writer of state.
//!   It runs as one long-lived task ([`Store::run`]).
//! - [`StoreHandle`] is the cheap, cloneable front: `dispatch` actions in,
//!   `subscribe` / `watch` state out, and `observe_actions` for effect
//!   coordinators.
//!
//! Actions are reduced strictly in arrival order. After each reduce the
//! action is forwarded to every action observer, so observers see the same
//! order the reducer did.

mod listeners;

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::mvi::{Reducer, State};
use crate::shutdown::ShutdownHandle;

use listeners::Listeners;
pub use listeners::Subscription;

/// Errors returned by [`StoreHandle`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store loop has stopped; the action was not delivered.
    #[error("store is closed")]
    Closed,
}

type Observers<A> = Arc<Mutex<Vec<mpsc::UnboundedSender<A>>>>;

/// The writer half of the state container.
pub struct Store<R: Reducer> {
    actions: mpsc::UnboundedReceiver<R::Intent>,
    state: watch::Sender<R::State>,
    listeners: Listeners<R::State>,
    observers: Observers<R::Intent>,
    _reducer: PhantomData<fn() -> R>,
}

impl<R: Reducer> Store<R> {
    /// Create a store seeded with `initial` state.
    pub fn new(initial: R::State) -> (Self, StoreHandle<R::State, R::Intent>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(initial);
        let listeners = Listeners::default();
        let observers: Observers<R::Intent> = Arc::new(Mutex::new(Vec::new()));

        let handle = StoreHandle {
            actions: action_tx,
            state: state_rx,
            listeners: listeners.clone(),
            observers: Arc::clone(&observers),
        };

        let store = Self {
            actions: action_rx,
            state: state_tx,
            listeners,
            observers,
            _reducer: PhantomData,
        };

        (store, handle)
    }

    /// Process actions until shutdown is signaled or every handle is gone.
    ///
    /// Actions already queued when shutdown is signaled are still reduced.
    pub async fn run(mut self, shutdown: ShutdownHandle) {
        tracing::debug!("Store loop started");

        loop {
            let action = tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                action = self.actions.recv() => match action {
                    Some(action) => action,
                    None => break,
                },
            };
            self.apply(action);
        }

        // Fold whatever was dispatched before the signal.
        self.actions.close();
        while let Ok(action) = self.actions.try_recv() {
            self.apply(action);
        }

        self.observers.lock().clear();
        tracing::debug!("Store loop stopped");
    }

    fn apply(&mut self, action: R::Intent) {
        tracing::trace!(action = ?action, "Reducing action");

        let forwarded = action.clone();

        // The state is moved out of the channel for the reduce, so the
        // reducer holds the only reference and can append in place.
        let changed = self.state.send_if_modified(|state| {
            let before = state.revision();
            let next = R::reduce(std::mem::take(state), action);
            let changed = next.revision() != before;
            *state = next;
            changed
        });

        if changed {
            let next = self.state.borrow().clone();
            self.listeners.notify(&next);
        }

        self.observers
            .lock()
            .retain(|observer| observer.send(forwarded.clone()).is_ok());
    }
}

/// The reader/dispatcher half of the state container.
pub struct StoreHandle<S, A> {
    actions: mpsc::UnboundedSender<A>,
    state: watch::Receiver<S>,
    listeners: Listeners<S>,
    observers: Observers<A>,
}

impl<S, A> Clone for StoreHandle<S, A> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            state: self.state.clone(),
            listeners: self.listeners.clone(),
            observers: Arc::clone(&self.observers),
        }
    }
}

impl<S, A> StoreHandle<S, A>
where
    S: Clone,
{
    /// Queue an action for the store. Never waits on the reducer.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        self.actions.send(action).map_err(|_| StoreError::Closed)
    }

    /// Register a callback invoked with every new state snapshot.
    ///
    /// The callback runs on the store loop, after the reduce that produced
    /// the snapshot. Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
        S: 'static,
    {
        self.listeners.add(Arc::new(callback))
    }

    /// Async view of the state; changes whenever the reducer produces a new state.
    pub fn watch(&self) -> watch::Receiver<S> {
        self.state.clone()
    }

    /// Current state snapshot.
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Receive every action after the store has reduced it.
    ///
    /// Dropping the receiver unregisters the observer.
    pub fn observe_actions(&self) -> mpsc::UnboundedReceiver<A> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.lock().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{Action, AppState, JournalEntry, JournalReducer};
    use crate::shutdown::ShutdownCoordinator;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn entry(id: u64) -> JournalEntry {
        JournalEntry {
            id,
            time_created: "10:00:00 AM".into(),
            text: format!("text {id}"),
            mood: "Happy".into(),
        }
    }

    #[tokio::test]
    async fn dispatch_updates_watched_state() {
        let shutdown = ShutdownCoordinator::new();
        let (store, handle) = Store::<JournalReducer>::new(AppState::new());
        let task = tokio::spawn(store.run(shutdown.handle()));

        let mut rx = handle.watch();
        handle.dispatch(Action::entries_updated(entry(1))).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().journal_entries(), &[entry(1)][..]);

        shutdown.signal();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn submit_does_not_notify_subscribers() {
        let shutdown = ShutdownCoordinator::new();
        let (store, handle) = Store::<JournalReducer>::new(AppState::new());
        let task = tokio::spawn(store.run(shutdown.handle()));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _subscription = handle.subscribe(move |_state: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut observed = handle.observe_actions();
        handle.dispatch(Action::submit("hello")).unwrap();
        handle.dispatch(Action::entries_updated(entry(2))).unwrap();

        // Observers see actions after they were reduced, in order.
        assert_eq!(observed.recv().await, Some(Action::submit("hello")));
        assert_eq!(
            observed.recv().await,
            Some(Action::entries_updated(entry(2)))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        shutdown.signal();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn dropped_subscription_stops_callbacks() {
        let shutdown = ShutdownCoordinator::new();
        let (store, handle) = Store::<JournalReducer>::new(AppState::new());
        let task = tokio::spawn(store.run(shutdown.handle()));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = handle.subscribe(move |_state: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(subscription);

        let mut observed = handle.observe_actions();
        handle.dispatch(Action::entries_updated(entry(3))).unwrap();
        observed.recv().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(handle.state().len(), 1);

        shutdown.signal();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn unsubscribe_stops_callbacks() {
        let shutdown = ShutdownCoordinator::new();
        let (store, handle) = Store::<JournalReducer>::new(AppState::new());
        let task = tokio::spawn(store.run(shutdown.handle()));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = handle.subscribe(move |_state: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut observed = handle.observe_actions();
        handle.dispatch(Action::entries_updated(entry(1))).unwrap();
        observed.recv().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        subscription.unsubscribe();
        handle.dispatch(Action::entries_updated(entry(2))).unwrap();
        observed.recv().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state().len(), 2);

        shutdown.signal();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn append_reuses_history_storage() {
        let shutdown = ShutdownCoordinator::new();
        let mut entries = Vec::with_capacity(8);
        entries.push(entry(0));
        let initial = AppState::from(entries);
        let storage = initial.journal_entries().as_ptr() as usize;

        let (store, handle) = Store::<JournalReducer>::new(initial);
        let task = tokio::spawn(store.run(shutdown.handle()));

        let mut rx = handle.watch();
        handle.dispatch(Action::entries_updated(entry(1))).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().journal_entries().as_ptr() as usize, storage);
        assert_eq!(rx.borrow().len(), 2);

        shutdown.signal();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_after_shutdown_is_closed() {
        let shutdown = ShutdownCoordinator::new();
        let (store, handle) = Store::<JournalReducer>::new(AppState::new());
        let task = tokio::spawn(store.run(shutdown.handle()));

        shutdown.signal();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("store stops on shutdown")
            .unwrap();

        assert_eq!(handle.dispatch(Action::submit("late")), Err(StoreError::Closed));
    }
}
