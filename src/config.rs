//! User-facing configuration state and engine settings.
//!
//! [`ConfigurationState`] is what the form controls edit: dimensions, colours
//! per body part and enabled features. [`Settings`] holds the engine constants
//! (which asset to load, which nodes are doors, camera setup, animation
//! tuning).

use std::{collections::BTreeMap, f32::consts::FRAC_PI_2, fmt, str::FromStr};

use cgmath::{Deg, Point3, Rad, Vector3};

use crate::{
    data_structures::{instance::Instance, mesh::Color},
    door::RotationSign,
    error::ConfiguratorError,
};

/// Part id that always resolves to the root of the loaded model.
pub const ROOT_PART: &str = "root";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyPart {
    Body,
    Doors,
    Drawers,
    Shelves,
    SafeBox,
}

impl BodyPart {
    /// Colouring order: the body first so the more specific parts override it.
    pub const ALL: [BodyPart; 5] = [
        BodyPart::Body,
        BodyPart::Doors,
        BodyPart::Drawers,
        BodyPart::Shelves,
        BodyPart::SafeBox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPart::Body => "body",
            BodyPart::Doors => "doors",
            BodyPart::Drawers => "drawers",
            BodyPart::Shelves => "shelves",
            BodyPart::SafeBox => "safeBox",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Doors,
    Drawers,
    Shelves,
    SafeBox,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Doors,
        Feature::Drawers,
        Feature::Shelves,
        Feature::SafeBox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Doors => "doors",
            Feature::Drawers => "drawers",
            Feature::Shelves => "shelves",
            Feature::SafeBox => "safeBox",
        }
    }
}

impl FromStr for BodyPart {
    type Err = ConfiguratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::ALL
            .into_iter()
            .find(|part| part.as_str() == s)
            .ok_or_else(|| ConfiguratorError::UnknownIdentifier {
                kind: "body part",
                name: s.to_string(),
            })
    }
}

impl FromStr for Feature {
    type Err = ConfiguratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| ConfiguratorError::UnknownIdentifier {
                kind: "feature",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
    Depth,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Width => "width",
            Axis::Height => "height",
            Axis::Depth => "depth",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn validate(&self) -> Result<(), ConfiguratorError> {
        [
            (Axis::Width, self.width),
            (Axis::Height, self.height),
            (Axis::Depth, self.depth),
        ]
        .into_iter()
        .try_for_each(|(axis, value)| validate_dimension(axis, value))
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
            Axis::Depth => self.depth,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Width => self.width = value,
            Axis::Height => self.height = value,
            Axis::Depth => self.depth = value,
        }
    }

    /// Width scales x, height scales y, depth scales z.
    pub fn to_scale(&self) -> Vector3<f32> {
        Vector3::new(self.width, self.height, self.depth)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

fn validate_dimension(axis: Axis, value: f32) -> Result<(), ConfiguratorError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfiguratorError::InvalidDimension {
            axis: axis.to_string(),
            value,
        })
    }
}

/// How dimension edits reach the model's scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingMode {
    /// Every axis follows its own dimension.
    #[default]
    PerAxis,
    /// The most recently edited value is applied to all three axes.
    Uniform,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationState {
    pub dimensions: Dimensions,
    pub colors: BTreeMap<BodyPart, Color>,
    pub features: BTreeMap<Feature, bool>,
    /// Scale derived from the dimension edits, `None` until the first edit.
    scale: Option<Vector3<f32>>,
}

impl ConfigurationState {
    pub fn set_dimensions(
        &mut self,
        dimensions: Dimensions,
        mode: ScalingMode,
    ) -> Result<Vector3<f32>, ConfiguratorError> {
        dimensions.validate()?;
        self.dimensions = dimensions;
        let scale = match mode {
            ScalingMode::PerAxis => dimensions.to_scale(),
            // without a single edited axis the width stands in for all three
            ScalingMode::Uniform => Vector3::new(dimensions.width, dimensions.width, dimensions.width),
        };
        self.scale = Some(scale);
        Ok(scale)
    }

    pub fn set_dimension(
        &mut self,
        axis: Axis,
        value: f32,
        mode: ScalingMode,
    ) -> Result<Vector3<f32>, ConfiguratorError> {
        validate_dimension(axis, value)?;
        self.dimensions.set(axis, value);
        let scale = match mode {
            ScalingMode::PerAxis => self.dimensions.to_scale(),
            ScalingMode::Uniform => Vector3::new(value, value, value),
        };
        self.scale = Some(scale);
        Ok(scale)
    }

    /// Scale to apply to the model root, once any dimension was edited.
    pub fn scale(&self) -> Option<Vector3<f32>> {
        self.scale
    }

    pub fn set_color(&mut self, part: BodyPart, color: Color) {
        self.colors.insert(part, color);
    }

    pub fn color(&self, part: BodyPart) -> Option<Color> {
        self.colors.get(&part).copied()
    }

    pub fn set_feature(&mut self, feature: Feature, enabled: bool) {
        self.features.insert(feature, enabled);
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.get(&feature).copied().unwrap_or(false)
    }
}

impl Default for ConfigurationState {
    fn default() -> Self {
        let colors = [
            (BodyPart::Body, Color::from_rgb8(0x8B, 0x45, 0x13)),
            (BodyPart::Doors, Color::from_rgb8(0xA0, 0x52, 0x2D)),
            (BodyPart::Drawers, Color::from_rgb8(0xD2, 0x69, 0x1E)),
            (BodyPart::Shelves, Color::from_rgb8(0xDE, 0xB8, 0x87)),
            (BodyPart::SafeBox, Color::from_rgb8(0x80, 0x80, 0x80)),
        ]
        .into_iter()
        .collect();
        let features = [
            (Feature::Doors, true),
            (Feature::Drawers, true),
            (Feature::Shelves, true),
            (Feature::SafeBox, false),
        ]
        .into_iter()
        .collect();
        Self {
            dimensions: Dimensions::default(),
            colors,
            features,
            scale: None,
        }
    }
}

/// Logical part id bound to a node name of the loaded model.
#[derive(Clone, Debug, PartialEq)]
pub struct PartBinding {
    pub part_id: String,
    pub node_name: String,
}

impl PartBinding {
    pub fn new(part_id: impl Into<String>, node_name: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            node_name: node_name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoorBinding {
    pub part_id: String,
    pub sign: RotationSign,
}

#[derive(Clone, Copy, Debug)]
pub struct CameraSettings {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// The view occupies part of the page, its aspect ratio is scaled by this factor.
    pub aspect_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 48.0),
            yaw: Deg(-90.0).into(),
            pitch: Rad(0.0),
            fovy: Deg(45.0).into(),
            znear: 1.0,
            zfar: 1000.0,
            aspect_factor: 0.7,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// Asset loaded on start, relative to the assets directory.
    pub model: String,
    pub parts: Vec<PartBinding>,
    pub doors: Vec<DoorBinding>,
    /// Part ids recoloured by each body part colour.
    pub color_targets: BTreeMap<BodyPart, Vec<String>>,
    /// Part ids shown or hidden by each feature toggle.
    pub feature_targets: BTreeMap<Feature, Vec<String>>,
    /// Transform given to a freshly loaded model root.
    pub placement: Instance,
    pub scaling: ScalingMode,
    pub camera: CameraSettings,
    /// Door swing when fully open, before the door's rotation sign.
    pub open_angle: Rad<f32>,
    /// Share of the remaining angle covered per frame.
    pub smoothing: f32,
    pub stats_interval_millis: u64,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfiguratorError> {
        let invalid = |msg: String| Err(ConfiguratorError::InvalidSettings(msg));
        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return invalid(format!(
                "smoothing factor must lie strictly between 0 and 1, got {}",
                self.smoothing
            ));
        }
        if !self.open_angle.0.is_finite() {
            return invalid(format!("open angle {:?} is not finite", self.open_angle));
        }
        let camera = &self.camera;
        if !(camera.fovy.0 > 0.0 && camera.fovy.0 < std::f32::consts::PI) {
            return invalid(format!("field of view {:?} out of range", camera.fovy));
        }
        if !(camera.znear > 0.0 && camera.znear < camera.zfar) {
            return invalid(format!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                camera.znear, camera.zfar
            ));
        }
        if !(camera.aspect_factor > 0.0) {
            return invalid(format!("aspect factor must be positive, got {}", camera.aspect_factor));
        }
        if let Some(door) = self
            .doors
            .iter()
            .find(|door| !self.parts.iter().any(|p| p.part_id == door.part_id))
        {
            return invalid(format!("door `{}` has no part binding", door.part_id));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        let parts = vec![
            PartBinding::new("door-1", "Wardrobe_door_1"),
            PartBinding::new("door-2", "Wardrobe_door_2"),
            PartBinding::new("door-3", "Wardrobe_door_3"),
            PartBinding::new("drawers", "Wardrobe_drawers"),
            PartBinding::new("shelves", "Wardrobe_shelves"),
            PartBinding::new("safe-box", "Wardrobe_safe_box"),
        ];
        // the middle door swings the other way so the pair opens mirrored
        let doors = [
            ("door-1", RotationSign::Positive),
            ("door-2", RotationSign::Negative),
            ("door-3", RotationSign::Positive),
        ]
        .into_iter()
        .map(|(part_id, sign)| DoorBinding {
            part_id: part_id.to_string(),
            sign,
        })
        .collect();
        let doors_ids = || vec!["door-1".to_string(), "door-2".to_string(), "door-3".to_string()];
        let color_targets = [
            (BodyPart::Body, vec![ROOT_PART.to_string()]),
            (BodyPart::Doors, doors_ids()),
            (BodyPart::Drawers, vec!["drawers".to_string()]),
            (BodyPart::Shelves, vec!["shelves".to_string()]),
            (BodyPart::SafeBox, vec!["safe-box".to_string()]),
        ]
        .into_iter()
        .collect();
        let feature_targets = [
            (Feature::Doors, doors_ids()),
            (Feature::Drawers, vec!["drawers".to_string()]),
            (Feature::Shelves, vec!["shelves".to_string()]),
            (Feature::SafeBox, vec!["safe-box".to_string()]),
        ]
        .into_iter()
        .collect();
        Self {
            model: "Wardrobe.glb".to_string(),
            parts,
            doors,
            color_targets,
            feature_targets,
            placement: Instance::from(Vector3::new(0.0, -10.0, 0.0)).with_uniform_scale(5.0),
            scaling: ScalingMode::default(),
            camera: CameraSettings::default(),
            open_angle: Rad(FRAC_PI_2),
            smoothing: 0.1,
            stats_interval_millis: 1000,
        }
    }
}
