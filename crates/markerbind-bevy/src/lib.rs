//! Markerbind Bevy Plugin — drives the marker lifecycle from Bevy's ECS.
//!
//! Provides `MarkerBindPlugin`, which turns `TrackedMarkersChanged` messages
//! into spawned, shown, hidden, moved and despawned marker entities.

pub mod events;
pub mod resources;
pub mod scene;
pub mod systems;

use std::sync::Arc;

use bevy::prelude::*;
use markerbind_core::{Catalog, LifecyclePolicy, MarkerLifecycleManager};

// Re-export for downstream crates.
pub use markerbind_core;

pub use events::{MarkerBatchApplied, TrackedMarkersChanged};
pub use resources::{MarkerLifecycle, MarkerStats};
pub use scene::{CommandsScene, MarkerAnchor, MarkerPrefab};
use systems::{activate_marker_lifecycle, sync_tracked_markers};

/// Main Bevy plugin for marker lifecycle synchronization.
///
/// Registers:
/// - `TrackedMarkersChanged` (inbound) and `MarkerBatchApplied` (outbound)
/// - the `MarkerStats` resource, and `MarkerLifecycle` when the catalog is
///   accepted
/// - a `Startup` system activating the manager and the `Update` sync system
pub struct MarkerBindPlugin {
    /// Templates shared with the manager.
    pub catalog: Arc<Catalog<MarkerPrefab>>,
    /// Removal and template-matching policy.
    pub policy: LifecyclePolicy,
}

impl MarkerBindPlugin {
    pub fn new(catalog: Arc<Catalog<MarkerPrefab>>, policy: LifecyclePolicy) -> Self {
        Self { catalog, policy }
    }
}

impl Plugin for MarkerBindPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<TrackedMarkersChanged>()
            .add_message::<MarkerBatchApplied>()
            .init_resource::<MarkerStats>()
            .add_systems(Startup, activate_marker_lifecycle)
            .add_systems(Update, sync_tracked_markers);

        // Without a manager the systems above run as no-ops; the messages stay
        // registered so host tracking systems keep working.
        match MarkerLifecycleManager::new(Arc::clone(&self.catalog), self.policy) {
            Ok(manager) => {
                app.insert_resource(MarkerLifecycle { manager });
            }
            Err(e) => {
                tracing::error!("Marker catalog rejected: {e}");
                tracing::warn!("Tracked markers will not spawn any entities");
            }
        }
    }
}
