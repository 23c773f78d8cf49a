use closet_configurator::{
    Vector3,
    config::{ROOT_PART, Settings},
    data_structures::{instance::Instance, mesh::Color, scene_graph::SceneGraph},
    error::ConfiguratorError,
    registry::ModelRegistry,
};

use crate::common::test_utils::{node, wardrobe_graph};

mod common;

fn registry() -> ModelRegistry {
    ModelRegistry::new(Settings::default().parts)
}

fn mesh_color(scene: &SceneGraph, name: &str) -> Color {
    scene
        .get(node(scene, name))
        .and_then(|n| n.mesh.as_ref())
        .map(|mesh| mesh.material.color)
        .unwrap()
}

#[test]
fn parts_resolve_by_node_name() {
    let mut registry = registry();
    let missing = registry.load(wardrobe_graph());
    let scene = registry.scene().unwrap();

    assert_eq!(registry.part(ROOT_PART), Some(scene.root()));
    assert_eq!(registry.part("door-1"), Some(node(scene, "Wardrobe_door_1")));
    assert_eq!(registry.part("door-2"), Some(node(scene, "Wardrobe_door_2")));
    assert_eq!(registry.part("shelves"), Some(node(scene, "Wardrobe_shelves")));
    assert_eq!(registry.part("safe-box"), None);
    assert_eq!(missing.len(), 1);
    assert!(matches!(
        &missing[0],
        ConfiguratorError::PartNotFound { part_id, node_name }
            if part_id == "safe-box" && node_name == "Wardrobe_safe_box"
    ));
}

#[test]
fn every_load_replaces_the_model() {
    let mut registry = registry();
    assert!(!registry.is_loaded());
    assert_eq!(registry.generation(), 0);

    registry.load(wardrobe_graph());
    registry.load(wardrobe_graph());

    assert!(registry.is_loaded());
    assert_eq!(registry.generation(), 2);

    registry.clear();
    assert!(!registry.is_loaded());
    assert_eq!(registry.part("door-1"), None);
}

#[test]
fn operations_before_load_are_no_ops() {
    let mut registry = registry();
    registry.apply_dimensions(Vector3::new(2.0, 2.0, 2.0));
    registry.apply_color("door-1", Color::WHITE);
    registry.apply_visibility("drawers", false);
    registry.apply_placement(&Instance::new());
    assert!(registry.scene().is_none());
}

#[test]
fn dimensions_set_the_root_scale() {
    let mut registry = registry();
    registry.load(wardrobe_graph());

    registry.apply_dimensions(Vector3::new(2.0, 2.0, 2.0));

    let scene = registry.scene().unwrap();
    assert_eq!(
        scene.get(scene.root()).unwrap().local.scale,
        Vector3::new(2.0, 2.0, 2.0)
    );
}

#[test]
fn placement_replaces_the_root_transform() {
    let mut registry = registry();
    registry.load(wardrobe_graph());
    let placement = Settings::default().placement;

    registry.apply_placement(&placement);

    let scene = registry.scene().unwrap();
    let root = scene.get(scene.root()).unwrap();
    assert_eq!(root.local.position, Vector3::new(0.0, -10.0, 0.0));
    assert_eq!(root.local.scale, Vector3::new(5.0, 5.0, 5.0));
}

#[test]
fn color_reaches_every_mesh_of_the_part() {
    let mut registry = registry();
    registry.load(wardrobe_graph());
    let red = Color::from_hex("#FF0000").unwrap();

    registry.apply_color("door-1", red);

    let scene = registry.scene().unwrap();
    assert_eq!(mesh_color(scene, "Wardrobe_door_1_panel"), red);
    assert_ne!(mesh_color(scene, "Wardrobe_door_2_panel"), red);
}

#[test]
fn applying_the_same_color_twice_changes_nothing() {
    let mut registry = registry();
    registry.load(wardrobe_graph());
    let color = Color::from_hex("#DEB887").unwrap();

    registry.apply_color(ROOT_PART, color);
    let once: Vec<Color> = ["Wardrobe_body", "Wardrobe_shelves", "Wardrobe_door_3_panel"]
        .iter()
        .map(|name| mesh_color(registry.scene().unwrap(), name))
        .collect();
    registry.apply_color(ROOT_PART, color);
    let twice: Vec<Color> = ["Wardrobe_body", "Wardrobe_shelves", "Wardrobe_door_3_panel"]
        .iter()
        .map(|name| mesh_color(registry.scene().unwrap(), name))
        .collect();

    assert_eq!(once, twice);
    assert!(once.iter().all(|c| *c == color));
}

#[test]
fn missing_part_color_is_ignored() {
    let mut registry = registry();
    registry.load(wardrobe_graph());
    let before: Vec<_> = registry
        .scene()
        .unwrap()
        .names()
        .map(|name| name.to_string())
        .collect();

    registry.apply_color("safe-box", Color::WHITE);
    registry.apply_visibility("safe-box", false);

    let scene = registry.scene().unwrap();
    assert_eq!(scene.names().count(), before.len());
    assert!(scene.is_visible(scene.root()));
}

#[test]
fn visibility_hides_the_subtree() {
    let mut registry = registry();
    registry.load(wardrobe_graph());

    registry.apply_visibility("door-2", false);

    let scene = registry.scene().unwrap();
    assert!(!scene.is_visible(node(scene, "Wardrobe_door_2_panel")));
    assert!(scene.is_visible(node(scene, "Wardrobe_door_1_panel")));

    registry.apply_visibility("door-2", true);
    let scene = registry.scene().unwrap();
    assert!(scene.is_visible(node(scene, "Wardrobe_door_2_panel")));
}

#[test]
fn transformed_roots_get_a_container() {
    let mut registry = registry();
    let mut graph = wardrobe_graph();
    let root = graph.root();
    graph.get_mut(root).unwrap().local.scale = Vector3::new(0.01, 0.01, 0.01);

    registry.load(graph);
    registry.apply_placement(&Settings::default().placement);

    let scene = registry.scene().unwrap();
    assert_eq!(scene.len(), 11);
    assert_eq!(scene.get(scene.root()).unwrap().name, "Wardrobe_container");
    assert_eq!(scene.get(scene.root()).unwrap().local.scale, Vector3::new(5.0, 5.0, 5.0));
    let wardrobe = scene.get(node(scene, "Wardrobe")).unwrap();
    assert_eq!(wardrobe.local.scale, Vector3::new(0.01, 0.01, 0.01));
    assert_eq!(registry.part(ROOT_PART), Some(scene.root()));
    let door = node(scene, "Wardrobe_door_2");
    assert!(scene.is_within(door, scene.root()));
    assert_eq!(scene.depth(door), 2);
}

#[test]
fn plain_roots_are_used_as_they_are() {
    let mut registry = registry();
    registry.load(wardrobe_graph());

    let scene = registry.scene().unwrap();
    assert_eq!(scene.len(), 10);
    assert_eq!(scene.get(scene.root()).unwrap().name, "Wardrobe");
}
