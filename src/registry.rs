//! The currently loaded model and its named parts.
//!
//! The registry owns the scene graph of the loaded asset and a lookup from
//! logical part ids (`door-1`, `shelves`, ...) to nodes of that graph. The
//! lookup is resolved once per load by name. Parts the asset does not contain
//! are simply absent: every operation on them is a silent no-op, which leaves
//! the corresponding feature inert.

use std::collections::HashMap;

use cgmath::Vector3;
use log::{debug, info, warn};

use crate::{
    config::{PartBinding, ROOT_PART},
    data_structures::{
        instance::Instance,
        mesh::Color,
        scene_graph::{NodeId, SceneGraph, SceneGraphNode},
    },
    error::ConfiguratorError,
};

#[derive(Debug, Default)]
pub struct ModelRegistry {
    bindings: Vec<PartBinding>,
    scene: Option<SceneGraph>,
    parts: HashMap<String, NodeId>,
    generation: u64,
}

impl ModelRegistry {
    pub fn new(bindings: Vec<PartBinding>) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    /**
     * Installs `scene` as the current model, discarding the previous one.
     *
     * Placement and dimensions own the root transform. A root that carries a
     * transform of its own is moved under an identity container first.
     *
     * Re-resolves every part binding by node name and returns the bindings that
     * found no node. Misses are not errors; they are reported so the caller can
     * log them once.
     */
    pub fn load(&mut self, scene: SceneGraph) -> Vec<ConfiguratorError> {
        let transformed_root = scene
            .get(scene.root())
            .filter(|root| root.local != Instance::default())
            .map(|root| root.name.clone());
        let scene = match transformed_root {
            Some(name) => {
                debug!("Wrapping transformed model root `{}`", name);
                scene.wrapped(format!("{}_container", name))
            }
            None => scene,
        };
        let mut parts = HashMap::with_capacity(self.bindings.len() + 1);
        let mut missing = Vec::new();
        parts.insert(ROOT_PART.to_string(), scene.root());
        for binding in &self.bindings {
            match scene.find_by_name(&binding.node_name) {
                Some(id) => {
                    parts.insert(binding.part_id.clone(), id);
                }
                None => missing.push(ConfiguratorError::PartNotFound {
                    part_id: binding.part_id.clone(),
                    node_name: binding.node_name.clone(),
                }),
            }
        }
        for name in scene.names() {
            debug!("model node: {}", name);
        }
        self.generation += 1;
        info!(
            "Installed model generation {} ({} nodes, {} of {} parts resolved)",
            self.generation,
            scene.len(),
            parts.len() - 1,
            self.bindings.len()
        );
        missing.iter().for_each(|miss| warn!("{}", miss));
        self.parts = parts;
        self.scene = Some(scene);
        missing
    }

    /// Drops the current model, e.g. when the configurator is disposed.
    pub fn clear(&mut self) {
        self.scene = None;
        self.parts.clear();
    }

    pub fn is_loaded(&self) -> bool {
        self.scene.is_some()
    }

    /// Incremented on every [`ModelRegistry::load`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneGraph> {
        self.scene.as_mut()
    }

    pub fn part(&self, part_id: &str) -> Option<NodeId> {
        self.parts.get(part_id).copied()
    }

    pub fn apply_placement(&mut self, placement: &Instance) {
        if let Some(root) = self.root_mut() {
            root.local = *placement;
        }
    }

    /// Sets the scale of the model root.
    pub fn apply_dimensions(&mut self, scale: Vector3<f32>) {
        if let Some(root) = self.root_mut() {
            root.local.scale = scale;
        }
    }

    /// Recolours every mesh in the subtree of `part_id`.
    pub fn apply_color(&mut self, part_id: &str, color: Color) {
        let Some(part) = self.part(part_id) else {
            return;
        };
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let subtree: Vec<NodeId> = scene.descendants(part).collect();
        for id in subtree {
            if let Some(mesh) = scene.get_mut(id).and_then(|node| node.mesh.as_mut()) {
                mesh.material.color = color;
            }
        }
    }

    pub fn apply_visibility(&mut self, part_id: &str, visible: bool) {
        let Some(part) = self.part(part_id) else {
            return;
        };
        if let Some(node) = self.scene.as_mut().and_then(|scene| scene.get_mut(part)) {
            node.visible = visible;
        }
    }

    fn root_mut(&mut self) -> Option<&mut SceneGraphNode> {
        let scene = self.scene.as_mut()?;
        let root = scene.root();
        scene.get_mut(root)
    }
}
