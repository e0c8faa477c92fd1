//! Bevy resources for the marker lifecycle.

use bevy::prelude::*;
use markerbind_core::{BatchReport, MarkerLifecycleManager};

use crate::scene::MarkerPrefab;

/// Bevy resource owning the marker → entity registry.
///
/// Only `sync_tracked_markers` mutates it during normal operation.
#[derive(Resource)]
pub struct MarkerLifecycle {
    /// The lifecycle manager; handles are marker entities.
    pub manager: MarkerLifecycleManager<MarkerPrefab, Entity>,
}

impl MarkerLifecycle {
    /// Entity currently anchored to `name`, if any.
    pub fn entity(&self, name: &str) -> Option<Entity> {
        self.manager.instance(name).map(|instance| instance.handle)
    }
}

/// Running totals across all applied batches.
#[derive(Resource, Debug, Default)]
pub struct MarkerStats {
    /// Batches applied so far.
    pub batches: u64,
    /// Entities spawned.
    pub created: u64,
    /// Entities despawned.
    pub destroyed: u64,
    /// Per-event issues raised.
    pub issues: u64,
    /// Report of the most recent batch.
    pub last_report: Option<BatchReport>,
}

impl MarkerStats {
    pub fn record(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.created += report.created as u64;
        self.destroyed += report.destroyed as u64;
        self.issues += report.issues.len() as u64;
        self.last_report = Some(report.clone());
    }
}
