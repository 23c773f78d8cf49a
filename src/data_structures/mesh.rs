//! Triangle geometry and surface colour attached to scene graph nodes.

use std::{fmt, str::FromStr};

use cgmath::Point3;

use crate::{
    data_structures::ray::{Aabb, Ray},
    error::ConfiguratorError,
};

/// Linear RGBA colour, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let to_f = |c: u8| f32::from(c) / 255.0;
        Color::rgb(to_f(r), to_f(g), to_f(b))
    }

    /// Parses CSS hex notation: `#RRGGBB` or the `#RGB` shorthand.
    pub fn from_hex(value: &str) -> Result<Self, ConfiguratorError> {
        let invalid = || ConfiguratorError::InvalidColor(value.to_string());
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channels: Vec<u8> = match digits.len() {
            6 => (0..3)
                .map(|i| u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16))
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?,
            3 => digits
                .chars()
                .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
                .collect::<Option<_>>()
                .ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        Ok(Color::from_rgb8(channels[0], channels[1], channels[2]))
    }

    pub fn to_hex(&self) -> String {
        let f_to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            f_to_u8(self.r),
            f_to_u8(self.g),
            f_to_u8(self.b)
        )
    }
}

impl From<[f32; 4]> for Color {
    fn from(rgba: [f32; 4]) -> Self {
        Self {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        }
    }
}

impl FromStr for Color {
    type Err = ConfiguratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            color: Color::WHITE,
        }
    }
}

/// Indexed triangle list in the owning node's local space.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    positions: Vec<Point3<f32>>,
    indices: Vec<u32>,
    bounds: Option<Aabb>,
    pub material: Material,
}

impl Mesh {
    /**
     * Indices that point outside `positions` are dropped together with the rest of
     * their triangle, as is a trailing incomplete triangle.
     */
    pub fn new(name: impl Into<String>, positions: Vec<Point3<f32>>, indices: Vec<u32>) -> Self {
        let name = name.into();
        let vertex_count = positions.len();
        let indices: Vec<u32> = indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| (i as usize) < vertex_count))
            .flatten()
            .copied()
            .collect();
        let bounds = Aabb::from_points(&positions);
        Self {
            name,
            positions,
            indices,
            bounds,
            material: Material::default(),
        }
    }

    /// Closed box spanning `min..max`, twelve triangles.
    pub fn cuboid(name: impl Into<String>, min: Point3<f32>, max: Point3<f32>) -> Self {
        let positions = vec![
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // back
            4, 5, 6, 4, 6, 7, // front
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
            3, 7, 6, 3, 6, 2, // top
            0, 1, 5, 0, 5, 4, // bottom
        ];
        Self::new(name, positions, indices)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.material.color = color;
        self
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Distance to the nearest triangle hit by `ray` (in multiples of its direction).
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let bounds = self.bounds?;
        ray.intersect_aabb(&bounds)?;
        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let a = self.positions[tri[0] as usize];
                let b = self.positions[tri[1] as usize];
                let c = self.positions[tri[2] as usize];
                ray.intersect_triangle(a, b, c)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}
