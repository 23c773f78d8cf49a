//! Local transformation data of scene graph nodes.
//!
//! Every node stores its position, rotation and scale relative to its parent.
//! World matrices are obtained by multiplying the local matrices from the root
//! down to the node.

use cgmath::{One, Rad, Rotation3};

/// Per-node transformation: position, rotation (as quaternion), and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Create a new instance with identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = cgmath::Vector3::new(scale, scale, scale);
        self
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /**
     * Rotation about the vertical (y) axis on top of `rest`.
     *
     * Doors are authored with an arbitrary resting orientation; their swing is
     * applied in the door's own frame so the authored orientation survives.
     */
    pub fn yaw_from(rest: cgmath::Quaternion<f32>, angle: f32) -> cgmath::Quaternion<f32> {
        rest * cgmath::Quaternion::from_angle_y(Rad(angle))
    }
}

impl From<cgmath::Vector3<f32>> for Instance {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}
