//! Thread-safe binding of a lifecycle manager and its scene to a tracking
//! source.
//!
//! Batches may arrive on any thread; a single mutex around the manager and
//! scene serializes whole batches so the registry is only ever observed
//! between batches.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::MarkerError;
use crate::manager::MarkerLifecycleManager;
use crate::scene::Scene;
use crate::source::{Subscription, TrackingSource};
use crate::tracking::TrackingChanges;

type ManagerFor<S> = MarkerLifecycleManager<<S as Scene>::Prefab, <S as Scene>::Handle>;

struct Bound<S: Scene> {
    manager: ManagerFor<S>,
    scene: S,
}

/// Releases the subscription, then deactivates the manager.
struct Attachment<S: Scene> {
    state: Arc<Mutex<Bound<S>>>,
    subscription: Option<Subscription>,
}

impl<S: Scene> Drop for Attachment<S> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
        }
        let mut bound = self.state.lock();
        if bound.manager.is_active() {
            let _ = bound.manager.deactivate();
        }
    }
}

/// A manager and scene subscribed to a [`TrackingSource`] for as long as the
/// binding lives.
pub struct MarkerBinding<S: Scene> {
    state: Arc<Mutex<Bound<S>>>,
    attachment: Attachment<S>,
}

impl<S> MarkerBinding<S>
where
    S: Scene + Send + 'static,
    S::Prefab: Send + Sync + 'static,
    S::Handle: Send + 'static,
{
    /// Activate `manager` and subscribe it to `source`.
    pub fn attach(
        source: Arc<dyn TrackingSource>,
        mut manager: ManagerFor<S>,
        scene: S,
    ) -> Result<Self, MarkerError> {
        manager.activate()?;
        let state = Arc::new(Mutex::new(Bound { manager, scene }));

        let listener_state = Arc::clone(&state);
        let subscription = Subscription::acquire(
            source,
            Box::new(move |changes: &TrackingChanges| {
                let mut bound = listener_state.lock();
                let Bound { manager, scene } = &mut *bound;
                let report = manager.process(changes, scene);
                for issue in report.violations() {
                    tracing::warn!(%issue, "tracking batch issue");
                }
            }),
        );
        tracing::info!(id = %subscription.id(), "marker binding attached");

        Ok(Self {
            attachment: Attachment {
                state: Arc::clone(&state),
                subscription: Some(subscription),
            },
            state,
        })
    }
}

impl<S: Scene> MarkerBinding<S> {
    /// Run `f` with exclusive access to the manager and scene. Blocks while a
    /// batch is being applied.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ManagerFor<S>, &mut S) -> R) -> R {
        let mut bound = self.state.lock();
        let Bound { manager, scene } = &mut *bound;
        f(manager, scene)
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.state.lock().manager.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unsubscribe and hand back the deactivated manager and scene.
    ///
    /// Returns `None` if the source still holds on to the listener after
    /// unsubscribing.
    pub fn detach(self) -> Option<(ManagerFor<S>, S)> {
        let Self { state, attachment } = self;
        drop(attachment);
        tracing::info!("marker binding detached");
        Arc::try_unwrap(state).ok().map(|mutex| {
            let Bound { manager, scene } = mutex.into_inner();
            (manager, scene)
        })
    }
}
