//! Tracking records as reported by the external tracking subsystem.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tracking subsystem's confidence in a marker's current pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// Pose is actively tracked this frame.
    Tracking,
    /// Pose is degraded or extrapolated.
    Limited,
    /// Not tracked.
    #[default]
    None,
}

impl TrackingState {
    /// Only `Tracking` counts as actively tracked; everything else hides.
    pub const fn is_tracking(self) -> bool {
        matches!(self, Self::Tracking)
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tracking => write!(f, "tracking"),
            Self::Limited => write!(f, "limited"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Spatial transform of a marker in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One physical marker's state within a single change batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedMarker {
    /// Reference identity of the marker in the tracking library.
    pub name: String,
    /// Current pose.
    #[serde(default)]
    pub pose: Pose,
    /// Current tracking state.
    #[serde(default)]
    pub state: TrackingState,
}

impl TrackedMarker {
    pub fn new(name: impl Into<String>, state: TrackingState) -> Self {
        Self {
            name: name.into(),
            pose: Pose::IDENTITY,
            state,
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }
}

/// A batch of marker changes, partitioned into three disjoint sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingChanges {
    /// Markers detected for the first time.
    pub added: Vec<TrackedMarker>,
    /// Markers whose pose or tracking state changed.
    pub updated: Vec<TrackedMarker>,
    /// Markers the tracking subsystem has given up on.
    pub removed: Vec<TrackedMarker>,
}

impl TrackingChanges {
    pub fn added(markers: impl IntoIterator<Item = TrackedMarker>) -> Self {
        Self {
            added: markers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn updated(markers: impl IntoIterator<Item = TrackedMarker>) -> Self {
        Self {
            updated: markers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn removed(markers: impl IntoIterator<Item = TrackedMarker>) -> Self {
        Self {
            removed: markers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Total number of marker records in the batch.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}
