//! Camera and projection used to turn pointer positions into world rays.

use cgmath::{InnerSpace, Point2, Point3, Rad, Vector3};

use crate::data_structures::ray::Ray;

/// Fly-camera described by a position and yaw/pitch angles.
///
/// A yaw of -90° with zero pitch looks down the negative z axis.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /**
     * Ray from the camera position through a point in normalized device coordinates.
     *
     * `ndc` is (-1, -1) at the bottom left and (1, 1) at the top right of the
     * render surface. Points outside that square produce rays outside the view
     * frustum.
     */
    pub fn cast_ray(&self, ndc: Point2<f32>, projection: &Projection) -> Ray {
        let forward = self.forward();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);
        let half_height = (projection.fovy.0 * 0.5).tan();
        let half_width = half_height * projection.aspect;
        let direction =
            (forward + right * (ndc.x * half_width) + up * (ndc.y * half_height)).normalize();
        Ray::new(self.position, direction)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    aspect_factor: f32,
}

impl Projection {
    /// `aspect_factor` scales the surface's width/height ratio (the wardrobe view uses 0.7).
    pub fn new<F: Into<Rad<f32>>>(
        width: u32,
        height: u32,
        fovy: F,
        znear: f32,
        zfar: f32,
        aspect_factor: f32,
    ) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy: fovy.into(),
            znear,
            zfar,
            aspect_factor,
        };
        projection.resize(width, height);
        projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring projection resize to {}x{}", width, height);
            return;
        }
        self.aspect = width as f32 / height as f32 * self.aspect_factor;
    }

    pub fn calc_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
