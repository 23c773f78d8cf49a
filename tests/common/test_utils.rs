use closet_configurator::{
    Point3, Vector3,
    context::Context,
    data_structures::{
        instance::Instance,
        mesh::Mesh,
        scene_graph::{NodeId, SceneGraph, SceneGraphNode},
    },
    pick::Intersection,
    render::RenderSurface,
};

pub(crate) const WIDTH: u32 = 800;
pub(crate) const HEIGHT: u32 = 600;

/// Same layout as `tests/fixtures/wardrobe.glb`, built in code.
///
/// Three doors hang on hinge nodes with their panels as child meshes, the
/// body, drawers and shelves carry their mesh directly. There is no safe box.
pub(crate) fn wardrobe_graph() -> SceneGraph {
    let mut graph = SceneGraph::new(SceneGraphNode::new("Wardrobe"));
    let root = graph.root();
    let cuboid = |name: &str, min: [f32; 3], max: [f32; 3]| {
        SceneGraphNode::new(name).with_mesh(Mesh::cuboid(name, min.into(), max.into()))
    };

    graph.add_child(root, cuboid("Wardrobe_body", [-1.5, 0.0, -0.5], [1.5, 4.0, -0.4]));
    for (index, hinge, min_x) in [(1, -1.5, 0.0), (2, 0.5, -1.0), (3, 0.5, 0.0)] {
        let door = SceneGraphNode::new(format!("Wardrobe_door_{}", index))
            .with_transform(Instance::from(Vector3::new(hinge, 0.0, 0.5)));
        let door = graph.add_child(root, door).expect("root exists");
        graph.add_child(
            door,
            cuboid(
                &format!("Wardrobe_door_{}_panel", index),
                [min_x, 0.0, 0.0],
                [min_x + 1.0, 4.0, 0.05],
            ),
        );
    }
    graph.add_child(root, cuboid("Wardrobe_drawers", [-1.4, 0.1, -0.4], [1.4, 0.8, 0.3]));
    graph.add_child(root, cuboid("Wardrobe_shelves", [-1.4, 2.0, -0.4], [1.4, 2.1, 0.3]));
    graph
}

pub(crate) fn fixture_bytes() -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/wardrobe.glb");
    std::fs::read(&path).expect("fixture is checked in")
}

pub(crate) fn node(graph: &SceneGraph, name: &str) -> NodeId {
    graph
        .find_by_name(name)
        .unwrap_or_else(|| panic!("no node named {}", name))
}

/// A hit on `node` as the hit test would report it.
pub(crate) fn hit(node: NodeId) -> Intersection {
    Intersection {
        node,
        distance: 10.0,
        point: Point3::new(0.0, 0.0, 0.0),
    }
}

/// Client pixel coordinates at which `world` appears on the context's surface.
pub(crate) fn client_point_for(ctx: &Context, world: Point3<f32>) -> (f32, f32) {
    let view_proj = ctx.projection.calc_matrix() * ctx.camera.calc_matrix();
    let clip = view_proj * world.to_homogeneous();
    let (ndc_x, ndc_y) = (clip.x / clip.w, clip.y / clip.w);
    let surface = ctx.surface();
    (
        surface.left + (ndc_x + 1.0) * 0.5 * surface.width,
        surface.top + (1.0 - ndc_y) * 0.5 * surface.height,
    )
}

/// Render surface that remembers what it was asked to draw.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    pub frames: u32,
    pub frames_with_model: u32,
    pub last_node_count: Option<usize>,
    pub fail: bool,
}

impl RenderSurface for RecordingSurface {
    fn render_frame(&mut self, _: &Context, scene: Option<&SceneGraph>) -> anyhow::Result<()> {
        self.frames += 1;
        if scene.is_some() {
            self.frames_with_model += 1;
        }
        self.last_node_count = scene.map(SceneGraph::len);
        if self.fail {
            anyhow::bail!("surface lost");
        }
        Ok(())
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
