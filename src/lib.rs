//! closet-configurator
//!
//! Interactive core of a 3D closet configurator, usable natively and on the
//! web. It keeps track of the pointer over the render surface, ray casts it
//! into the loaded model, swings wardrobe doors open while they are hovered
//! and applies dimension, colour and feature edits to the model. Drawing
//! itself is left to the embedding application.
//!
//! High-level modules
//! - `camera`: perspective camera, projection and pointer ray generation
//! - `config`: configuration state edited by the UI and engine settings
//! - `context`: explicitly owned camera, surface and pointer state
//! - `data_structures`: scene graph, transforms, meshes and rays
//! - `door`: hover-driven door animation
//! - `error`: error taxonomy
//! - `flow`: the per-frame scheduler and UI-facing API
//! - `pick`: ray cast hit testing
//! - `pointer`: pointer tracking in normalized device coordinates
//! - `registry`: the loaded model and its named parts
//! - `resources`: model fetching, glTF decoding and background loading
//! - `render`: seam to the host's renderer
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod door;
pub mod error;
pub mod flow;
pub mod pick;
pub mod pointer;
pub mod registry;
pub mod resources;
pub mod render;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;
