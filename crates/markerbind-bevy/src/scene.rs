//! Marker entities: prefabs and the `Commands`-backed scene.

use std::fmt;
use std::sync::Arc;

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use markerbind_core::{Pose, Scene, TrackedMarker};

/// Tags an entity spawned for a tracked marker.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct MarkerAnchor {
    /// Reference name reported by the tracking source.
    pub name: String,
}

type PrefabFn = dyn for<'a> Fn(&mut EntityCommands<'a>) + Send + Sync;

/// Blueprint for the entity spawned on a marker. Runs against the freshly
/// spawned entity, which already carries `MarkerAnchor`, `Transform` and
/// `Visibility`.
#[derive(Clone)]
pub struct MarkerPrefab {
    build: Arc<PrefabFn>,
}

impl MarkerPrefab {
    pub fn new(build: impl for<'a> Fn(&mut EntityCommands<'a>) + Send + Sync + 'static) -> Self {
        Self {
            build: Arc::new(build),
        }
    }

    /// A prefab inserting a clone of `bundle`.
    pub fn bundle<B: Bundle + Clone>(bundle: B) -> Self {
        Self::new(move |entity| {
            entity.insert(bundle.clone());
        })
    }

    /// A prefab adding nothing beyond the anchor components.
    pub fn apply(&self, entity: &mut EntityCommands<'_>) {
        (self.build)(entity);
    }
}

impl fmt::Debug for MarkerPrefab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerPrefab").finish_non_exhaustive()
    }
}

/// Convert a tracked pose into a Bevy transform.
pub fn pose_transform(pose: &Pose) -> Transform {
    Transform::from_translation(pose.position).with_rotation(pose.rotation)
}

const fn visibility(active: bool) -> Visibility {
    if active {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// [`Scene`] over a system's `Commands`. Handles are entities; all changes
/// land when the commands are applied.
pub struct CommandsScene<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
}

impl<'a, 'w, 's> CommandsScene<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self { commands }
    }
}

impl Scene for CommandsScene<'_, '_, '_> {
    type Prefab = MarkerPrefab;
    type Handle = Entity;

    fn instantiate(&mut self, prefab: &MarkerPrefab, marker: &TrackedMarker) -> Entity {
        let mut entity = self.commands.spawn((
            MarkerAnchor {
                name: marker.name.clone(),
            },
            pose_transform(&marker.pose),
            visibility(true),
        ));
        prefab.apply(&mut entity);
        entity.id()
    }

    fn set_active(&mut self, handle: &Entity, active: bool) {
        self.commands.entity(*handle).try_insert(visibility(active));
    }

    fn move_to(&mut self, handle: &Entity, pose: &Pose) {
        self.commands.entity(*handle).try_insert(pose_transform(pose));
    }

    fn destroy(&mut self, handle: Entity) {
        self.commands.entity(handle).try_despawn();
    }
}
