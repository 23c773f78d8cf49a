//! Seam to the host's renderer.
//!
//! Drawing is done by the embedding application (camera/light/viewport setup,
//! GPU resources). Once per tick the configurator hands it the context and the
//! current model so it can draw the mutated graph.

use crate::{context::Context, data_structures::scene_graph::SceneGraph};

pub trait RenderSurface {
    /// Draws one frame. `scene` is `None` while no model is loaded.
    fn render_frame(&mut self, ctx: &Context, scene: Option<&SceneGraph>) -> anyhow::Result<()>;
}

/// Renders nothing; useful for headless hosts.
#[derive(Debug, Default)]
pub struct Headless;

impl RenderSurface for Headless {
    fn render_frame(&mut self, _: &Context, _: Option<&SceneGraph>) -> anyhow::Result<()> {
        Ok(())
    }
}
