//! Bevy systems for the marker lifecycle.
//!
//! `sync_tracked_markers` is the ONLY place marker entities are spawned or
//! despawned. The tracking integration writes `TrackedMarkersChanged`, the
//! manager applies it through `Commands`, and a `MarkerBatchApplied` report
//! goes back out.

use bevy::prelude::*;

use crate::events::{MarkerBatchApplied, TrackedMarkersChanged};
use crate::resources::{MarkerLifecycle, MarkerStats};
use crate::scene::CommandsScene;

/// Startup system: start accepting tracking batches.
pub fn activate_marker_lifecycle(lifecycle: Option<ResMut<MarkerLifecycle>>) {
    let Some(mut lifecycle) = lifecycle else {
        return;
    };
    if lifecycle.manager.is_active() {
        return;
    }
    if let Err(e) = lifecycle.manager.activate() {
        tracing::warn!("Marker lifecycle activation failed: {e}");
    }
}

/// Stop accepting tracking batches. Hosts schedule this when leaving their
/// AR session state; entities already spawned are left in place.
pub fn deactivate_marker_lifecycle(lifecycle: Option<ResMut<MarkerLifecycle>>) {
    let Some(mut lifecycle) = lifecycle else {
        return;
    };
    if !lifecycle.manager.is_active() {
        return;
    }
    if let Err(e) = lifecycle.manager.deactivate() {
        tracing::warn!("Marker lifecycle deactivation failed: {e}");
    }
}

/// Apply inbound tracking batches, in arrival order.
pub fn sync_tracked_markers(
    mut changes: MessageReader<TrackedMarkersChanged>,
    lifecycle: Option<ResMut<MarkerLifecycle>>,
    mut stats: ResMut<MarkerStats>,
    mut applied: MessageWriter<MarkerBatchApplied>,
    mut commands: Commands,
) {
    let Some(mut lifecycle) = lifecycle else {
        // Rejected catalog.
        let dropped = changes.read().count();
        if dropped > 0 {
            tracing::debug!("Dropping {dropped} tracking batches: no marker catalog");
        }
        return;
    };

    for message in changes.read() {
        if !lifecycle.manager.is_active() {
            tracing::debug!(
                "Dropping tracking batch of {} markers: lifecycle inactive",
                message.changes.len()
            );
            continue;
        }

        let mut scene = CommandsScene::new(&mut commands);
        let report = lifecycle.manager.process(&message.changes, &mut scene);
        for issue in report.violations() {
            tracing::warn!("Tracking batch issue: {issue}");
        }

        stats.record(&report);
        applied.write(MarkerBatchApplied { report });
    }
}

/// Despawn every marker entity and empty the registry.
pub fn clear_marker_entities(lifecycle: Option<ResMut<MarkerLifecycle>>, mut commands: Commands) {
    let Some(mut lifecycle) = lifecycle else {
        return;
    };
    let mut scene = CommandsScene::new(&mut commands);
    let cleared = lifecycle.manager.clear(&mut scene);
    if cleared > 0 {
        tracing::info!("Cleared {cleared} marker entities");
    }
}
