//! Hover-driven door animation.
//!
//! Each interactive door eases its swing angle towards "open" while the
//! pointer hovers it and back towards "closed" otherwise. The angle moves a
//! fixed share of the remaining distance per frame, so it approaches the
//! target exponentially and never overshoots.

use cgmath::Quaternion;
use log::{debug, warn};

use crate::{
    config::Settings,
    data_structures::{
        instance::Instance,
        scene_graph::{NodeId, SceneGraph},
    },
    pick::Intersection,
    registry::ModelRegistry,
};

/// Once this close (in radians) the angle settles on its target.
const SETTLE_EPSILON: f32 = 1e-4;

/// Swing direction of a door.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationSign {
    Positive,
    Negative,
}

impl RotationSign {
    pub fn factor(&self) -> f32 {
        match self {
            RotationSign::Positive => 1.0,
            RotationSign::Negative => -1.0,
        }
    }
}

/// Coarse classification of a door's continuous angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorPhase {
    Closed,
    Transitioning,
    Open,
}

pub fn lerp(from: f32, to: f32, factor: f32) -> f32 {
    from + (to - from) * factor
}

#[derive(Clone, Debug)]
pub struct InteractiveDoor {
    pub part_id: String,
    pub sign: RotationSign,
    current_angle: f32,
    target_angle: f32,
    rest_rotation: Option<Quaternion<f32>>,
}

impl InteractiveDoor {
    pub fn new(part_id: impl Into<String>, sign: RotationSign) -> Self {
        Self {
            part_id: part_id.into(),
            sign,
            current_angle: 0.0,
            target_angle: 0.0,
            rest_rotation: None,
        }
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }

    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    pub fn phase(&self, open_angle: f32) -> DoorPhase {
        let open = open_angle * self.sign.factor();
        if self.current_angle.abs() <= SETTLE_EPSILON {
            DoorPhase::Closed
        } else if (self.current_angle - open).abs() <= SETTLE_EPSILON {
            DoorPhase::Open
        } else {
            DoorPhase::Transitioning
        }
    }

    /// Sets the target for this frame and moves one smoothing step towards it.
    pub fn step(&mut self, hovered: bool, open_angle: f32, smoothing: f32) -> f32 {
        self.target_angle = if hovered {
            open_angle * self.sign.factor()
        } else {
            0.0
        };
        let next = lerp(self.current_angle, self.target_angle, smoothing);
        self.current_angle = if (next - self.target_angle).abs() <= SETTLE_EPSILON {
            self.target_angle
        } else {
            next
        };
        self.current_angle
    }

    fn reset(&mut self) {
        self.current_angle = 0.0;
        self.target_angle = 0.0;
        self.rest_rotation = None;
    }
}

/**
 * All interactive doors of the configurator.
 *
 * The set binds lazily to the registry's current model: whenever the registry
 * generation changes the doors forget their angles and capture the resting
 * orientation of their nodes on the next update.
 */
#[derive(Debug)]
pub struct DoorSet {
    doors: Vec<InteractiveDoor>,
    open_angle: f32,
    smoothing: f32,
    bound_generation: Option<u64>,
}

impl DoorSet {
    pub fn new(settings: &Settings) -> Self {
        let doors = settings
            .doors
            .iter()
            .map(|binding| InteractiveDoor::new(binding.part_id.clone(), binding.sign))
            .collect();
        Self {
            doors,
            open_angle: settings.open_angle.0,
            smoothing: settings.smoothing,
            bound_generation: None,
        }
    }

    pub fn doors(&self) -> &[InteractiveDoor] {
        &self.doors
    }

    pub fn get(&self, part_id: &str) -> Option<&InteractiveDoor> {
        self.doors.iter().find(|door| door.part_id == part_id)
    }

    pub fn open_angle(&self) -> f32 {
        self.open_angle
    }

    /**
     * Advances every door by one frame.
     *
     * `hits` is this frame's intersection list. A door counts as hovered when
     * any intersected node is the door's node or one of its descendants.
     * Doors whose part is missing from the model are skipped. Returns the part
     * ids hovered this frame.
     */
    pub fn update(&mut self, registry: &mut ModelRegistry, hits: &[Intersection]) -> Vec<String> {
        if !registry.is_loaded() {
            return Vec::new();
        }
        if self.bound_generation != Some(registry.generation()) {
            debug!("Binding {} doors to model generation {}", self.doors.len(), registry.generation());
            self.doors.iter_mut().for_each(InteractiveDoor::reset);
            self.bound_generation = Some(registry.generation());
        }

        let mut hovered_parts = Vec::new();
        for door in self.doors.iter_mut() {
            let Some(node) = registry.part(&door.part_id) else {
                continue;
            };
            let Some(scene) = registry.scene_mut() else {
                return hovered_parts;
            };
            let hovered = is_hovered(scene, node, hits);
            let angle = door.step(hovered, self.open_angle, self.smoothing);
            let Some(scene_node) = scene.get_mut(node) else {
                warn!("Door `{}` points to a node that is not in the graph", door.part_id);
                continue;
            };
            let rest = *door.rest_rotation.get_or_insert(scene_node.local.rotation);
            scene_node.local.rotation = Instance::yaw_from(rest, angle);
            if hovered {
                hovered_parts.push(door.part_id.clone());
            }
        }
        hovered_parts
    }
}

fn is_hovered(scene: &SceneGraph, door: NodeId, hits: &[Intersection]) -> bool {
    hits.iter().any(|hit| scene.is_within(hit.node, door))
}
