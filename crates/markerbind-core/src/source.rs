//! Tracking-source subscription.
//!
//! A [`TrackingSource`] delivers [`TrackingChanges`] batches to subscribed
//! listeners. [`Subscription`] is the scoped handle to one listener: it is
//! acquired on activation and released on every exit path, including
//! unwinding, so no callback can reach a torn-down consumer.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::lifecycle_misuse;
use crate::tracking::TrackingChanges;

/// Opaque identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Callback invoked once per change batch.
pub type ChangeListener = Box<dyn FnMut(&TrackingChanges) + Send>;

/// Change-notification channel of a tracking subsystem.
pub trait TrackingSource: Send + Sync {
    /// Register a listener for future batches.
    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId;

    /// Remove a listener. Returns `false` when `id` was not registered.
    /// Once this returns, the listener is never invoked again.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// In-process tracking source: listeners are invoked synchronously, in
/// subscription order, from the thread that calls [`TrackingHub::publish`].
///
/// Listeners must not subscribe or unsubscribe from inside a callback.
#[derive(Default)]
pub struct TrackingHub {
    listeners: Mutex<Vec<(SubscriptionId, ChangeListener)>>,
    next_id: AtomicU64,
}

impl TrackingHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a batch to every listener. Returns how many were notified.
    pub fn publish(&self, changes: &TrackingChanges) -> usize {
        let mut listeners = self.listeners.lock();
        for (_, listener) in listeners.iter_mut() {
            listener(changes);
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl TrackingSource for TrackingHub {
    fn subscribe(&self, listener: ChangeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        tracing::debug!(%id, "tracking listener subscribed");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut listeners = self.listeners.lock();
            listeners
                .iter()
                .position(|(existing, _)| *existing == id)
                .map(|index| listeners.remove(index))
        };
        // The listener is dropped outside the lock.
        match removed {
            Some(_) => {
                tracing::debug!(%id, "tracking listener unsubscribed");
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for TrackingHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Scoped registration of one listener on a [`TrackingSource`].
///
/// Dropping the guard unsubscribes. Releasing a subscription that the
/// source no longer knows is a lifecycle error.
pub struct Subscription {
    source: Arc<dyn TrackingSource>,
    id: SubscriptionId,
    released: bool,
}

impl Subscription {
    pub fn acquire(source: Arc<dyn TrackingSource>, listener: ChangeListener) -> Self {
        let id = source.subscribe(listener);
        Self {
            source,
            id,
            released: false,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribe now. Returns `false` if the source had already dropped
    /// the listener.
    pub fn release(mut self) -> bool {
        self.unsubscribe()
    }

    fn unsubscribe(&mut self) -> bool {
        self.released = true;
        if self.source.unsubscribe(self.id) {
            return true;
        }
        if std::thread::panicking() {
            tracing::warn!(id = %self.id, "subscription already released");
        } else {
            lifecycle_misuse("subscription released twice");
        }
        false
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.released {
            self.unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}
