//! The visual-object side of the binding.

use crate::tracking::{Pose, TrackedMarker};

/// Engine hook that creates, shows/hides, moves and destroys the visual
/// objects anchored to markers.
///
/// The manager only ever holds `Handle`s; the scene owns the objects. A
/// scene is passed to each [`crate::MarkerLifecycleManager::process`] call
/// so engines with frame-scoped object access can implement it.
pub trait Scene {
    /// Blueprint type stored in the catalog.
    type Prefab;
    /// Handle to a live visual object.
    type Handle;

    /// Create an object from `prefab`, attached to the marker's transform.
    fn instantiate(&mut self, prefab: &Self::Prefab, marker: &TrackedMarker) -> Self::Handle;

    /// Show or hide an object.
    fn set_active(&mut self, handle: &Self::Handle, active: bool);

    /// Move an object to follow its marker.
    fn move_to(&mut self, handle: &Self::Handle, pose: &Pose);

    /// Release an object. The handle is not used again.
    fn destroy(&mut self, handle: Self::Handle);
}
