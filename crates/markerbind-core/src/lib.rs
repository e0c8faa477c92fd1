//! Markerbind Core — engine-agnostic marker lifecycle synchronization.
//!
//! Keeps exactly one visual object alive per recognized tracking marker,
//! driven by add/update/remove batches from an external tracking source.
//! No engine or rendering dependencies; the scene and the tracking source
//! are reached through the [`Scene`] and [`TrackingSource`] traits.

pub mod binding;
pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod registry;
pub mod scene;
pub mod source;
pub mod tracking;

#[cfg(test)]
mod test_scene;

// Re-exports for convenience.
pub use binding::MarkerBinding;
pub use catalog::{Catalog, MarkerTemplate, names_match};
pub use config::{LifecyclePolicy, RemovalPolicy, TemplateMatch};
pub use error::{CatalogError, EventPhase, MarkerError};
pub use manager::{BatchReport, MarkerLifecycleManager};
pub use registry::{ActiveInstance, InstanceRegistry};
pub use scene::Scene;
pub use source::{ChangeListener, Subscription, SubscriptionId, TrackingHub, TrackingSource};
pub use tracking::{Pose, TrackedMarker, TrackingChanges, TrackingState};
