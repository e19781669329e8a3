//! State-change callbacks registered through `StoreHandle::subscribe`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Callback<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Registry<S> {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(u64, Callback<S>)>>,
}

pub(crate) struct Listeners<S> {
    inner: Arc<Registry<S>>,
}

impl<S> Default for Listeners<S> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                callbacks: Mutex::new(Vec::new()),
            }),
        }
    }
}

impl<S> Clone for Listeners<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: 'static> Listeners<S> {
    pub(crate) fn add(&self, callback: Callback<S>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.callbacks.lock().push((id, callback));

        let registry: Arc<dyn Unsubscribe> = self.inner.clone();
        Subscription {
            id,
            registry: Arc::downgrade(&registry),
        }
    }
}

impl<S> Listeners<S> {
    pub(crate) fn notify(&self, state: &S) {
        // Snapshot the callbacks so a callback may subscribe or unsubscribe
        // without deadlocking on the registry lock.
        let callbacks: Vec<Callback<S>> = self
            .inner
            .callbacks
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(state);
        }
    }
}

trait Unsubscribe: Send + Sync {
    fn remove(&self, id: u64);
}

impl<S> Unsubscribe for Registry<S> {
    fn remove(&self, id: u64) {
        self.callbacks.lock().retain(|(existing, _)| *existing != id);
    }
}

/// Keeps a state callback registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Unsubscribe>,
}

impl Subscription {
    /// Explicitly unsubscribe. Equivalent to dropping.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
