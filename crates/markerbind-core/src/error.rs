//! Error taxonomy for marker lifecycle processing.
//!
//! [`MarkerError`] values never escape [`crate::MarkerLifecycleManager::process`]
//! as an `Err`; they are collected per event into a [`crate::BatchReport`].

use std::fmt;

/// Which phase of a batch an event belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Added,
    Updated,
    Removed,
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Updated => write!(f, "updated"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// A per-event issue raised while applying a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkerError {
    /// No catalog template matches the detected marker.
    #[error("no template matches marker `{name}`")]
    UnrecognizedMarker { name: String },
    /// An added event arrived for a marker that already has an instance.
    #[error("marker `{name}` already has an active instance")]
    DuplicateActiveInstance { name: String },
    /// An updated/removed event referenced a marker with no instance.
    #[error("{phase} event for marker `{name}` has no registry entry")]
    MissingRegistryEntry { name: String, phase: EventPhase },
    /// Events processed while unsubscribed, or a double activate/deactivate.
    #[error("subscription lifecycle misuse: {0}")]
    SubscriptionLifecycleMisuse(&'static str),
}

impl MarkerError {
    /// Whether the issue indicates a contract violation worth surfacing,
    /// as opposed to an expected no-op.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingRegistryEntry { .. } | Self::SubscriptionLifecycleMisuse(_)
        )
    }
}

/// Errors raised while building a [`crate::Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("template names `{first}` and `{second}` match the same markers")]
    AmbiguousTemplate { first: String, second: String },
    #[error("template at index {0} has an empty name")]
    EmptyName(usize),
}

/// Report a lifecycle programming error: fail fast in development builds,
/// log and carry on in release builds.
pub(crate) fn lifecycle_misuse(reason: &'static str) -> MarkerError {
    let err = MarkerError::SubscriptionLifecycleMisuse(reason);
    if cfg!(debug_assertions) {
        panic!("{err}");
    }
    tracing::warn!("{err}");
    err
}
