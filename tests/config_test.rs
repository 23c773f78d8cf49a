use std::str::FromStr;

use closet_configurator::{
    Deg, Vector3,
    config::{Axis, BodyPart, ConfigurationState, Dimensions, Feature, ScalingMode, Settings},
    data_structures::mesh::Color,
    error::ConfiguratorError,
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn defaults_match_the_wardrobe_form() {
    let state = ConfigurationState::default();

    assert_eq!(state.dimensions, Dimensions::new(1.0, 1.0, 1.0));
    assert_eq!(state.scale(), None);
    assert_eq!(state.color(BodyPart::Body).unwrap().to_hex(), "#8B4513");
    assert_eq!(state.color(BodyPart::Doors).unwrap().to_hex(), "#A0522D");
    assert_eq!(state.color(BodyPart::Drawers).unwrap().to_hex(), "#D2691E");
    assert_eq!(state.color(BodyPart::Shelves).unwrap().to_hex(), "#DEB887");
    assert_eq!(state.color(BodyPart::SafeBox).unwrap().to_hex(), "#808080");
    assert!(state.is_enabled(Feature::Doors));
    assert!(state.is_enabled(Feature::Drawers));
    assert!(state.is_enabled(Feature::Shelves));
    assert!(!state.is_enabled(Feature::SafeBox));
}

#[test]
fn default_settings_are_valid() {
    let settings = Settings::default();
    settings.validate().unwrap();
    assert_eq!(settings.model, "Wardrobe.glb");
    assert_eq!(settings.doors.len(), 3);
    assert_close(settings.camera.fovy.0, Deg(45.0_f32).0.to_radians(), 1e-6);
    assert_eq!(settings.camera.aspect_factor, 0.7);
}

#[test]
fn invalid_settings_are_rejected() {
    let mut settings = Settings::default();
    settings.smoothing = 1.5;
    assert!(matches!(settings.validate(), Err(ConfiguratorError::InvalidSettings(_))));

    let mut settings = Settings::default();
    settings.camera.znear = 2000.0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.parts.retain(|part| part.part_id != "door-2");
    assert!(settings.validate().is_err());
}

#[test]
fn per_axis_scaling_follows_each_dimension() {
    let mut state = ConfigurationState::default();

    let scale = state
        .set_dimensions(Dimensions::new(2.0, 1.5, 0.5), ScalingMode::PerAxis)
        .unwrap();
    assert_eq!(scale, Vector3::new(2.0, 1.5, 0.5));

    let scale = state.set_dimension(Axis::Height, 3.0, ScalingMode::PerAxis).unwrap();
    assert_eq!(scale, Vector3::new(2.0, 3.0, 0.5));
    assert_eq!(state.scale(), Some(scale));
    assert_eq!(state.dimensions.get(Axis::Height), 3.0);
}

#[test]
fn uniform_scaling_uses_the_edited_value() {
    let mut state = ConfigurationState::default();

    let scale = state.set_dimension(Axis::Depth, 2.0, ScalingMode::Uniform).unwrap();

    assert_eq!(scale, Vector3::new(2.0, 2.0, 2.0));
    assert_eq!(state.dimensions, Dimensions::new(1.0, 1.0, 2.0));
}

#[test]
fn non_positive_dimensions_are_rejected() {
    let mut state = ConfigurationState::default();

    for value in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let result = state.set_dimension(Axis::Width, value, ScalingMode::PerAxis);
        assert!(matches!(result, Err(ConfiguratorError::InvalidDimension { .. })));
    }
    let result = state.set_dimensions(Dimensions::new(1.0, 0.0, 1.0), ScalingMode::PerAxis);
    assert!(result.is_err());

    assert_eq!(state.dimensions, Dimensions::default());
    assert_eq!(state.scale(), None);
}

#[test]
fn hex_colors_parse_in_both_notations() {
    assert_eq!(Color::from_hex("#FFFFFF").unwrap(), Color::WHITE);
    assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
    assert_eq!(Color::from_hex("#a0522d").unwrap().to_hex(), "#A0522D");
    assert_eq!(Color::from_str("#808080").unwrap().to_string(), "#808080");

    for broken in ["", "FFFFFF", "#12345", "#GGGGGG", "#1234567"] {
        assert!(matches!(Color::from_hex(broken), Err(ConfiguratorError::InvalidColor(_))));
    }
}

#[test]
fn identifiers_use_the_form_names() {
    assert_eq!(BodyPart::from_str("safeBox").unwrap(), BodyPart::SafeBox);
    assert_eq!(Feature::from_str("drawers").unwrap(), Feature::Drawers);
    assert_eq!(BodyPart::Doors.to_string(), "doors");
    assert!(matches!(
        Feature::from_str("mirror"),
        Err(ConfiguratorError::UnknownIdentifier { kind: "feature", .. })
    ));
}
