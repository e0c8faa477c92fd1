use std::sync::Arc;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use markerbind_bevy::systems::{clear_marker_entities, deactivate_marker_lifecycle};
use markerbind_bevy::{
    MarkerAnchor, MarkerBindPlugin, MarkerLifecycle, MarkerPrefab, MarkerStats,
    TrackedMarkersChanged,
};
use markerbind_core::{
    Catalog, LifecyclePolicy, MarkerTemplate, Pose, RemovalPolicy, TemplateMatch, TrackedMarker,
    TrackingChanges, TrackingState,
};

#[derive(Component, Debug, Clone, PartialEq, Eq)]
struct Species(&'static str);

fn pet_catalog() -> Arc<Catalog<MarkerPrefab>> {
    let templates = vec![
        MarkerTemplate::new("Cat", MarkerPrefab::bundle(Species("cat"))),
        MarkerTemplate::new("dog", MarkerPrefab::bundle(Species("dog"))),
    ];
    Arc::new(Catalog::new(templates).expect("catalog should be valid"))
}

fn app_with(policy: LifecyclePolicy) -> App {
    let mut app = App::new();
    app.add_plugins(MarkerBindPlugin::new(pet_catalog(), policy));
    app.update();
    app
}

fn send(app: &mut App, changes: TrackingChanges) {
    app.world_mut().write_message(TrackedMarkersChanged { changes });
    app.update();
}

fn anchors(app: &mut App) -> Vec<(Entity, String, Visibility, &'static str)> {
    let world = app.world_mut();
    let mut query = world.query::<(Entity, &MarkerAnchor, &Visibility, &Species)>();
    query
        .iter(world)
        .map(|(entity, anchor, visibility, species)| {
            (entity, anchor.name.clone(), *visibility, species.0)
        })
        .collect()
}

fn cat(state: TrackingState) -> TrackedMarker {
    TrackedMarker::new("cat", state)
}

#[test]
fn added_marker_spawns_anchored_entity() {
    let mut app = app_with(LifecyclePolicy::default());
    let pose = Pose::from_position(Vec3::new(1.0, 2.0, 3.0));

    send(
        &mut app,
        TrackingChanges::added([cat(TrackingState::Tracking).with_pose(pose)]),
    );

    let spawned = anchors(&mut app);
    assert_eq!(spawned.len(), 1);
    let (entity, name, visibility, species) = spawned[0].clone();
    assert_eq!(name, "cat");
    assert_eq!(visibility, Visibility::Inherited);
    assert_eq!(species, "cat");

    let transform = app.world().get::<Transform>(entity).copied();
    assert_eq!(transform.map(|t| t.translation), Some(pose.position));
    assert_eq!(
        app.world().resource::<MarkerLifecycle>().entity("cat"),
        Some(entity)
    );
}

#[test]
fn limited_tracking_hides_entity() {
    let mut app = app_with(LifecyclePolicy::default());
    send(&mut app, TrackingChanges::added([cat(TrackingState::Tracking)]));

    send(&mut app, TrackingChanges::updated([cat(TrackingState::Limited)]));
    assert_eq!(anchors(&mut app)[0].2, Visibility::Hidden);

    send(&mut app, TrackingChanges::updated([cat(TrackingState::Tracking)]));
    assert_eq!(anchors(&mut app)[0].2, Visibility::Inherited);
}

#[test]
fn update_moves_entity_with_marker() {
    let mut app = app_with(LifecyclePolicy::default());
    send(&mut app, TrackingChanges::added([cat(TrackingState::Tracking)]));

    let pose = Pose {
        position: Vec3::new(0.0, 0.5, -2.0),
        rotation: Quat::from_rotation_y(1.0),
    };
    send(
        &mut app,
        TrackingChanges::updated([cat(TrackingState::Tracking).with_pose(pose)]),
    );

    let entity = anchors(&mut app)[0].0;
    let transform = app
        .world()
        .get::<Transform>(entity)
        .copied()
        .expect("marker entity should have a transform");
    assert_eq!(transform.translation, pose.position);
    assert_eq!(transform.rotation, pose.rotation);
}

#[test]
fn removal_despawns_and_readd_spawns_new_entity() {
    let mut app = app_with(LifecyclePolicy::default());
    send(&mut app, TrackingChanges::added([cat(TrackingState::Tracking)]));
    let first = anchors(&mut app)[0].0;

    send(&mut app, TrackingChanges::removed([cat(TrackingState::None)]));
    assert!(anchors(&mut app).is_empty());
    assert!(app.world().get_entity(first).is_err());

    send(&mut app, TrackingChanges::added([cat(TrackingState::Tracking)]));
    let spawned = anchors(&mut app);
    assert_eq!(spawned.len(), 1);
    assert_ne!(spawned[0].0, first);

    let stats = app.world().resource::<MarkerStats>();
    assert_eq!(stats.batches, 3);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.destroyed, 1);
}

#[test]
fn deactivate_policy_hides_instead_of_despawning() {
    let policy = LifecyclePolicy::default().with_removal(RemovalPolicy::Deactivate);
    let mut app = app_with(policy);
    send(&mut app, TrackingChanges::added([cat(TrackingState::Tracking)]));

    send(&mut app, TrackingChanges::removed([cat(TrackingState::None)]));

    let spawned = anchors(&mut app);
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].2, Visibility::Hidden);
}

#[test]
fn unknown_and_duplicate_markers_spawn_nothing_extra() {
    let mut app = app_with(LifecyclePolicy::default());
    send(
        &mut app,
        TrackingChanges::added([
            cat(TrackingState::Tracking),
            TrackedMarker::new("CAT", TrackingState::Tracking),
            TrackedMarker::new("bird", TrackingState::Tracking),
        ]),
    );
    send(&mut app, TrackingChanges::added([cat(TrackingState::Tracking)]));
    send(&mut app, TrackingChanges::updated([TrackedMarker::new("bird", TrackingState::Tracking)]));

    // "cat" and "CAT" are distinct reference names served by the same template.
    let mut names: Vec<String> = anchors(&mut app).into_iter().map(|a| a.1).collect();
    names.sort();
    assert_eq!(names, vec!["CAT".to_string(), "cat".to_string()]);

    let stats = app.world().resource::<MarkerStats>();
    assert_eq!(stats.issues, 3);
}

#[test]
fn inactive_lifecycle_drops_batches() {
    let mut app = app_with(LifecyclePolicy::default());
    app.world_mut()
        .run_system_once(deactivate_marker_lifecycle)
        .expect("deactivation system should run");

    send(&mut app, TrackingChanges::added([cat(TrackingState::Tracking)]));

    assert!(anchors(&mut app).is_empty());
    assert_eq!(app.world().resource::<MarkerStats>().batches, 0);
}

#[test]
fn clear_despawns_all_marker_entities() {
    let mut app = app_with(LifecyclePolicy::default());
    send(
        &mut app,
        TrackingChanges::added([
            cat(TrackingState::Tracking),
            TrackedMarker::new("dog", TrackingState::Tracking),
        ]),
    );
    assert_eq!(anchors(&mut app).len(), 2);

    app.world_mut()
        .run_system_once(clear_marker_entities)
        .expect("clear system should run");

    assert!(anchors(&mut app).is_empty());
    assert!(app.world().resource::<MarkerLifecycle>().manager.is_empty());
}

fn report_cat_every_frame(mut tracking: MessageWriter<TrackedMarkersChanged>) {
    tracking.write(TrackedMarkersChanged {
        changes: TrackingChanges::added([cat(TrackingState::Tracking)]),
    });
}

#[test]
fn rejected_catalog_keeps_host_tracking_systems_running() {
    let templates = vec![
        MarkerTemplate::new("cat", MarkerPrefab::bundle(Species("cat"))),
        MarkerTemplate::new("Cat", MarkerPrefab::bundle(Species("cat"))),
    ];
    let catalog = Arc::new(Catalog::new(templates).expect("names are non-empty"));
    let policy = LifecyclePolicy::default().with_template_match(TemplateMatch::ErrorOnAmbiguous);

    let mut app = App::new();
    app.add_plugins(MarkerBindPlugin::new(catalog, policy))
        .add_systems(Update, report_cat_every_frame);
    app.update();
    app.update();

    assert!(app.world().get_resource::<MarkerLifecycle>().is_none());
    assert!(anchors(&mut app).is_empty());
    assert_eq!(app.world().resource::<MarkerStats>().batches, 0);

    app.world_mut()
        .run_system_once(clear_marker_entities)
        .expect("clear system should run without a lifecycle");
}
