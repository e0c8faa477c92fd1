//! Bevy messages carrying tracking batches in and reports out.

use bevy::prelude::*;
use markerbind_core::{BatchReport, TrackingChanges};

/// Fired by the tracking integration once per processed tracking frame.
#[derive(Message, Debug, Clone)]
pub struct TrackedMarkersChanged {
    /// Added, updated and removed markers for this frame.
    pub changes: TrackingChanges,
}

/// Fired after a batch has been applied to the marker entities.
#[derive(Message, Debug, Clone)]
pub struct MarkerBatchApplied {
    /// What the batch changed and any per-event issues.
    pub report: BatchReport,
}
