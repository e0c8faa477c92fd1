//! Marker lifecycle manager — keeps the instance registry in step with the
//! tracking source.
//!
//! Each batch is applied in a fixed order: added, then updated, then removed.
//! Every event is handled on its own; a bad event is recorded in the
//! [`BatchReport`] and skipped, never aborting the rest of the batch.

use std::fmt;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::{LifecyclePolicy, RemovalPolicy};
use crate::error::{CatalogError, EventPhase, MarkerError, lifecycle_misuse};
use crate::registry::{ActiveInstance, InstanceRegistry};
use crate::scene::Scene;
use crate::tracking::{TrackedMarker, TrackingChanges};

/// Outcome of applying one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Instances instantiated from a template.
    pub created: usize,
    /// Instances switched from hidden to shown.
    pub shown: usize,
    /// Instances switched from shown to hidden.
    pub hidden: usize,
    /// Instances moved to a new anchor pose.
    pub moved: usize,
    /// Instances destroyed and erased.
    pub destroyed: usize,
    /// Instances kept registered after their marker was removed.
    pub retained: usize,
    /// Per-event issues, in processing order.
    pub issues: Vec<MarkerError>,
}

impl BatchReport {
    /// No issue of any kind was raised.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues that point at a contract violation rather than an expected no-op.
    pub fn violations(&self) -> impl Iterator<Item = &MarkerError> {
        self.issues.iter().filter(|issue| issue.is_contract_violation())
    }

    /// Whether the batch changed the registry or any instance.
    pub fn changed_anything(&self) -> bool {
        self.created + self.shown + self.hidden + self.moved + self.destroyed > 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} shown={} hidden={} moved={} destroyed={} retained={} issues={}",
            self.created,
            self.shown,
            self.hidden,
            self.moved,
            self.destroyed,
            self.retained,
            self.issues.len()
        )
    }
}

/// Owns the marker → instance registry and applies tracking batches to it.
///
/// `P` is the catalog's prefab type and `H` the scene's handle type; the
/// scene itself is supplied per batch.
#[derive(Debug)]
pub struct MarkerLifecycleManager<P, H> {
    catalog: Arc<Catalog<P>>,
    policy: LifecyclePolicy,
    registry: InstanceRegistry<H>,
    active: bool,
}

impl<P, H> MarkerLifecycleManager<P, H> {
    /// Create an inactive manager. Fails when the catalog cannot satisfy the
    /// policy's template matching rule.
    pub fn new(catalog: Arc<Catalog<P>>, policy: LifecyclePolicy) -> Result<Self, CatalogError> {
        catalog.validate(policy.template_match)?;
        Ok(Self {
            catalog,
            policy,
            registry: InstanceRegistry::new(),
            active: false,
        })
    }

    /// Mark the manager subscribed. Batches are only accepted while active.
    pub fn activate(&mut self) -> Result<(), MarkerError> {
        if self.active {
            return Err(lifecycle_misuse("manager activated twice"));
        }
        self.active = true;
        tracing::debug!(templates = self.catalog.len(), "marker lifecycle manager activated");
        Ok(())
    }

    /// Mark the manager unsubscribed. Registered instances are left alone.
    pub fn deactivate(&mut self) -> Result<(), MarkerError> {
        if !self.active {
            return Err(lifecycle_misuse("manager deactivated while inactive"));
        }
        self.active = false;
        tracing::debug!(instances = self.registry.len(), "marker lifecycle manager deactivated");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &Arc<Catalog<P>> {
        &self.catalog
    }

    pub fn registry(&self) -> &InstanceRegistry<H> {
        &self.registry
    }

    pub fn instance(&self, name: &str) -> Option<&ActiveInstance<H>> {
        self.registry.get(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Apply one batch of tracking changes.
    pub fn process<S>(&mut self, changes: &TrackingChanges, scene: &mut S) -> BatchReport
    where
        S: Scene<Prefab = P, Handle = H> + ?Sized,
    {
        let mut report = BatchReport::default();
        if !self.active {
            report
                .issues
                .push(lifecycle_misuse("tracking batch received while inactive"));
            return report;
        }

        for marker in &changes.added {
            self.apply_added(marker, scene, &mut report);
        }
        for marker in &changes.updated {
            self.apply_updated(marker, scene, &mut report);
        }
        for marker in &changes.removed {
            self.apply_removed(marker, scene, &mut report);
        }

        tracing::trace!(%report, instances = self.registry.len(), "tracking batch applied");
        report
    }

    /// Destroy every registered instance, returning how many were destroyed.
    pub fn clear<S>(&mut self, scene: &mut S) -> usize
    where
        S: Scene<Prefab = P, Handle = H> + ?Sized,
    {
        let mut destroyed = 0;
        for (name, instance) in self.registry.drain() {
            tracing::debug!(marker = %name, "destroying instance on clear");
            scene.destroy(instance.handle);
            destroyed += 1;
        }
        destroyed
    }

    fn apply_added<S>(&mut self, marker: &TrackedMarker, scene: &mut S, report: &mut BatchReport)
    where
        S: Scene<Prefab = P, Handle = H> + ?Sized,
    {
        let Some(template) = self.catalog.lookup(&marker.name, self.policy.template_match) else {
            tracing::debug!(marker = %marker.name, "no template for marker, ignoring");
            report.issues.push(MarkerError::UnrecognizedMarker {
                name: marker.name.clone(),
            });
            return;
        };

        if self.registry.contains(&marker.name) {
            tracing::debug!(marker = %marker.name, "marker already instantiated");
            report.issues.push(MarkerError::DuplicateActiveInstance {
                name: marker.name.clone(),
            });
            return;
        }

        let handle = scene.instantiate(&template.prefab, marker);
        let instance = ActiveInstance {
            handle,
            active: true,
            anchor: marker.pose,
        };
        match self.registry.try_insert(&marker.name, instance) {
            Ok(_) => {
                tracing::info!(marker = %marker.name, template = %template.name, "instantiated marker object");
                report.created += 1;
            }
            Err(rejected) => {
                scene.destroy(rejected.handle);
                report.issues.push(MarkerError::DuplicateActiveInstance {
                    name: marker.name.clone(),
                });
            }
        }
    }

    fn apply_updated<S>(&mut self, marker: &TrackedMarker, scene: &mut S, report: &mut BatchReport)
    where
        S: Scene<Prefab = P, Handle = H> + ?Sized,
    {
        let Some(instance) = self.registry.get_mut(&marker.name) else {
            missing_entry(&self.catalog, &self.policy, marker, EventPhase::Updated, report);
            return;
        };

        if instance.anchor != marker.pose {
            scene.move_to(&instance.handle, &marker.pose);
            instance.anchor = marker.pose;
            report.moved += 1;
        }

        let visible = marker.state.is_tracking();
        if instance.active != visible {
            scene.set_active(&instance.handle, visible);
            instance.active = visible;
            if visible {
                report.shown += 1;
            } else {
                report.hidden += 1;
            }
            tracing::debug!(marker = %marker.name, state = %marker.state, visible, "marker visibility changed");
        }
    }

    fn apply_removed<S>(&mut self, marker: &TrackedMarker, scene: &mut S, report: &mut BatchReport)
    where
        S: Scene<Prefab = P, Handle = H> + ?Sized,
    {
        match self.policy.on_removed {
            RemovalPolicy::Destroy => {
                let Some(instance) = self.registry.remove(&marker.name) else {
                    missing_entry(&self.catalog, &self.policy, marker, EventPhase::Removed, report);
                    return;
                };
                scene.destroy(instance.handle);
                report.destroyed += 1;
                tracing::info!(marker = %marker.name, "destroyed marker object");
            }
            RemovalPolicy::Deactivate => {
                let Some(instance) = self.registry.get_mut(&marker.name) else {
                    missing_entry(&self.catalog, &self.policy, marker, EventPhase::Removed, report);
                    return;
                };
                if instance.active {
                    scene.set_active(&instance.handle, false);
                    instance.active = false;
                    report.hidden += 1;
                }
                report.retained += 1;
                tracing::info!(marker = %marker.name, "retained hidden marker object");
            }
        }
    }
}

/// Record an update/remove for a marker with no registry entry.
///
/// Markers without a template never get an entry, so their follow-up events
/// are expected and logged quietly; anything else is a contract violation.
fn missing_entry<P>(
    catalog: &Catalog<P>,
    policy: &LifecyclePolicy,
    marker: &TrackedMarker,
    phase: EventPhase,
    report: &mut BatchReport,
) {
    if catalog.lookup(&marker.name, policy.template_match).is_some() {
        tracing::warn!(marker = %marker.name, %phase, "no instance registered for marker, skipping event");
    } else {
        tracing::debug!(marker = %marker.name, %phase, "skipping event for unrecognized marker");
    }
    report.issues.push(MarkerError::MissingRegistryEntry {
        name: marker.name.clone(),
        phase,
    });
}
