//! Scripted tracking sessions replayed by the demo.

use std::path::{Path, PathBuf};

use markerbind_bevy::MarkerPrefab;
use markerbind_core::{Catalog, CatalogError, LifecyclePolicy, MarkerTemplate, TrackingChanges};
use serde::Deserialize;

use crate::DemoModel;

/// Session bundled with the binary.
const PETS_SESSION: &str = include_str!("../sessions/pets.json");

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read session {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid session script: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid template catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// A replayable tracking session: the catalog to load and the batches the
/// tracking source would have produced.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub policy: LifecyclePolicy,
    /// Template names; each gets a prefab tagging the entity with its name.
    pub templates: Vec<String>,
    /// One entry per tracking frame.
    #[serde(default)]
    pub batches: Vec<TrackingChanges>,
}

impl SessionScript {
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The bundled cat/dog session.
    pub fn pets() -> Result<Self, SessionError> {
        Self::parse(PETS_SESSION)
    }

    /// Build the Bevy catalog for this session's templates.
    pub fn catalog(&self) -> Result<Catalog<MarkerPrefab>, SessionError> {
        let templates = self
            .templates
            .iter()
            .map(|name| {
                let model = DemoModel {
                    template: name.clone(),
                };
                MarkerTemplate::new(name.clone(), MarkerPrefab::bundle(model))
            })
            .collect();
        let catalog = Catalog::new(templates)?;
        catalog.validate(self.policy.template_match)?;
        Ok(catalog)
    }
}
