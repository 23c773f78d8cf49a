//! Object picking by ray casting.
//!
//! The pointer's normalized device coordinates are turned into a world ray
//! through the camera. The ray is then tested against every visible mesh of
//! the scene graph:
//! 1. Traverse the graph depth first, composing world matrices on the way down
//! 2. Move the ray into each mesh node's local space (inverse world matrix)
//! 3. Reject the node early against its local bounds, then test its triangles
//! 4. Keep the nearest triangle per node and sort all nodes nearest first
//!
//! The local-space ray keeps an unnormalized direction, so the distances found
//! there are already world distances from the camera.

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    camera::{Camera, Projection},
    data_structures::{
        ray::Ray,
        scene_graph::{NodeId, SceneGraph},
    },
    pointer::PointerState,
};

/// A mesh node hit by the pointer ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub node: NodeId,
    /// Distance from the camera along the ray.
    pub distance: f32,
    pub point: cgmath::Point3<f32>,
}

/// Casts the pointer ray into `scene` and returns every mesh node it crosses, nearest first.
///
/// No pointer or no loaded scene is the ordinary "nothing hovered" case and yields an empty list.
pub fn hit_test(
    pointer: &PointerState,
    camera: &Camera,
    projection: &Projection,
    scene: Option<&SceneGraph>,
) -> Vec<Intersection> {
    let (Some(ndc), Some(scene)) = (pointer.ndc(), scene) else {
        return Vec::new();
    };
    let ray = camera.cast_ray(ndc, projection);
    intersect_scene(&ray, scene, scene.root())
}

/// Intersects `ray` with the subtree below `root`, nearest first.
pub fn intersect_scene(ray: &Ray, scene: &SceneGraph, root: NodeId) -> Vec<Intersection> {
    let mut intersections = Vec::new();
    let parent_of_root = scene
        .parent(root)
        .and_then(|parent| scene.world_matrix(parent))
        .unwrap_or_else(Matrix4::identity);
    let mut stack: Vec<(NodeId, Matrix4<f32>)> = vec![(root, parent_of_root)];

    while let Some((id, parent_world)) = stack.pop() {
        let Some(node) = scene.get(id) else {
            continue;
        };
        // hidden parts are neither drawn nor hoverable
        if !node.visible {
            continue;
        }
        let world = parent_world * node.local.to_matrix();
        if let Some(mesh) = &node.mesh {
            let Some(inverse) = world.invert() else {
                log::debug!("Skipping `{}`, its world matrix is singular", node.name);
                continue;
            };
            let local_ray = ray.transform(&inverse);
            if let Some(distance) = mesh.intersect(&local_ray) {
                intersections.push(Intersection {
                    node: id,
                    distance,
                    point: ray.at(distance),
                });
            }
        }
        // reversed so that children are visited in their stored order
        stack.extend(node.children().iter().rev().map(|&child| (child, world)));
    }

    intersections.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    intersections
}
