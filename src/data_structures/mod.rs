//! Engine data structures: transforms, geometry and the scene graph.
//!
//! - `instance` holds per-node local transformation data
//! - `mesh` contains triangle geometry, materials and colours
//! - `ray` provides rays and the primitive intersection tests
//! - `scene_graph` enables hierarchical scene organization

pub mod instance;
pub mod mesh;
pub mod ray;
pub mod scene_graph;
