//! Markerbind Demo — replays a scripted tracking session headlessly.
//!
//! Each batch of the session is delivered as one `TrackedMarkersChanged`
//! message per `App::update`, exactly as an AR tracking integration would
//! deliver one batch per processed camera frame.

mod config;
mod session;

use std::process::ExitCode;
use std::sync::Arc;

use bevy::log::LogPlugin;
use clap::Parser;
use bevy::prelude::*;
use markerbind_bevy::{
    MarkerAnchor, MarkerBindPlugin, MarkerLifecycle, MarkerStats, TrackedMarkersChanged,
};

use config::DemoConfig;
use session::{SessionError, SessionScript};

/// Stand-in for the visual content a real prefab would spawn.
#[derive(Component, Debug, Clone)]
pub struct DemoModel {
    /// Catalog template the entity was built from.
    pub template: String,
}

fn main() -> ExitCode {
    let config = DemoConfig::parse();

    let mut app = App::new();
    app.add_plugins(LogPlugin {
        filter: config.log_filter.clone(),
        ..default()
    });

    match run(&mut app, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(app: &mut App, config: &DemoConfig) -> Result<(), SessionError> {
    let script = match &config.session_path {
        Some(path) => {
            tracing::info!("Loading session {}", path.display());
            SessionScript::load(path)?
        }
        None => SessionScript::pets()?,
    };

    let catalog = Arc::new(script.catalog()?);
    let template_names: Vec<&str> = catalog
        .templates()
        .iter()
        .map(|template| template.name.as_str())
        .collect();
    tracing::info!(
        "Replaying {} batches against templates [{}] ({:?})",
        script.batches.len(),
        template_names.join(", "),
        script.policy
    );

    app.add_plugins(MarkerBindPlugin::new(catalog, script.policy));
    app.update();

    for (index, changes) in script.batches.into_iter().enumerate() {
        app.world_mut()
            .write_message(TrackedMarkersChanged { changes });
        app.update();

        if let Some(report) = &app.world().resource::<MarkerStats>().last_report {
            tracing::info!("batch #{}: {}", index + 1, report);
        }
    }

    log_surviving_anchors(app);
    Ok(())
}

fn log_surviving_anchors(app: &mut App) {
    let world = app.world_mut();
    let mut anchors = world.query::<(&MarkerAnchor, &DemoModel, &Visibility, &Transform)>();
    let mut lines: Vec<String> = anchors
        .iter(world)
        .map(|(anchor, model, visibility, transform)| {
            format!(
                "{} (template {}) {:?} at {:?}",
                anchor.name, model.template, visibility, transform.translation
            )
        })
        .collect();
    lines.sort();

    let stats = world.resource::<MarkerStats>();
    tracing::info!(
        "Session finished: {} batches, {} created, {} destroyed, {} issues",
        stats.batches,
        stats.created,
        stats.destroyed,
        stats.issues
    );
    if let Some(lifecycle) = world.get_resource::<MarkerLifecycle>() {
        let registry = lifecycle.manager.registry();
        tracing::info!("{} marker entities registered", registry.len());
        for (name, instance) in registry.iter() {
            tracing::debug!(
                "  {name} -> {:?} (active: {}, anchor {:?})",
                instance.handle,
                instance.active,
                instance.anchor.position
            );
        }
    }
    for line in lines {
        tracing::info!("  {line}");
    }
}
