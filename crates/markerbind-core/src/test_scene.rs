//! Recording scene used by unit tests.

use std::collections::HashMap;

use crate::scene::Scene;
use crate::tracking::{Pose, TrackedMarker};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SceneOp {
    Instantiate { handle: u32, prefab: &'static str },
    SetActive { handle: u32, active: bool },
    MoveTo { handle: u32, pose: Pose },
    Destroy { handle: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LiveObject {
    pub prefab: &'static str,
    pub active: bool,
    pub pose: Pose,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingScene {
    pub ops: Vec<SceneOp>,
    pub live: HashMap<u32, LiveObject>,
    next_handle: u32,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, handle: u32) -> Option<&LiveObject> {
        self.live.get(&handle)
    }
}

impl Scene for RecordingScene {
    type Prefab = &'static str;
    type Handle = u32;

    fn instantiate(&mut self, prefab: &&'static str, marker: &TrackedMarker) -> u32 {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.live.insert(
            handle,
            LiveObject {
                prefab: *prefab,
                active: true,
                pose: marker.pose,
            },
        );
        self.ops.push(SceneOp::Instantiate {
            handle,
            prefab: *prefab,
        });
        handle
    }

    fn set_active(&mut self, handle: &u32, active: bool) {
        if let Some(object) = self.live.get_mut(handle) {
            object.active = active;
        }
        self.ops.push(SceneOp::SetActive {
            handle: *handle,
            active,
        });
    }

    fn move_to(&mut self, handle: &u32, pose: &Pose) {
        if let Some(object) = self.live.get_mut(handle) {
            object.pose = *pose;
        }
        self.ops.push(SceneOp::MoveTo {
            handle: *handle,
            pose: *pose,
        });
    }

    fn destroy(&mut self, handle: u32) {
        self.live.remove(&handle);
        self.ops.push(SceneOp::Destroy { handle });
    }
}
