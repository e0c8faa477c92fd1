//! Lifecycle policy configuration.

use serde::{Deserialize, Serialize};

/// What to do with an instance when its marker is reported as removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Destroy the instance and erase its registry entry.
    #[default]
    Destroy,
    /// Hide the instance and keep it registered for re-tracking.
    Deactivate,
}

/// How to resolve several catalog templates matching the same marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateMatch {
    /// The earliest matching template in catalog order wins.
    #[default]
    FirstMatch,
    /// The latest matching template in catalog order wins.
    LastMatch,
    /// Reject catalogs containing case-insensitively duplicated names.
    ErrorOnAmbiguous,
}

/// Policy knobs for [`crate::MarkerLifecycleManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecyclePolicy {
    /// Behavior on removed events.
    pub on_removed: RemovalPolicy,
    /// Template resolution when names collide.
    pub template_match: TemplateMatch,
}

impl LifecyclePolicy {
    pub fn with_removal(mut self, on_removed: RemovalPolicy) -> Self {
        self.on_removed = on_removed;
        self
    }

    pub fn with_template_match(mut self, template_match: TemplateMatch) -> Self {
        self.template_match = template_match;
        self
    }
}
