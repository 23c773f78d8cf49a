//! Central context owning the view state shared by all components.
//!
//! The context replaces module-level camera, surface and pointer singletons:
//! it is created once with [`Context::new`], handed to whoever needs it, and
//! torn down with [`Context::dispose`].

use cgmath::Point2;
use winit::event::WindowEvent;

use crate::{
    camera::{Camera, Projection},
    config::CameraSettings,
    error::ConfiguratorError,
    pointer::{PointerState, PointerTracker, SurfaceRect},
};

#[derive(Debug)]
pub struct Context {
    pub camera: Camera,
    pub projection: Projection,
    surface: SurfaceRect,
    pointer: PointerTracker,
}

impl Context {
    pub fn new(settings: &CameraSettings, width: u32, height: u32) -> Self {
        let camera = Camera::new(settings.position, settings.yaw, settings.pitch);
        let projection = Projection::new(
            width,
            height,
            settings.fovy,
            settings.znear,
            settings.zfar,
            settings.aspect_factor,
        );
        log::info!("Context created for a {}x{} surface", width, height);
        Self {
            camera,
            projection,
            surface: SurfaceRect::sized(width, height),
            pointer: PointerTracker::new(),
        }
    }

    pub fn surface(&self) -> SurfaceRect {
        self.surface
    }

    /// Places the render surface inside the window, e.g. next to a settings panel.
    pub fn set_surface(&mut self, surface: SurfaceRect) {
        self.surface = surface;
        if !surface.is_degenerate() {
            self.projection
                .resize(surface.width.round() as u32, surface.height.round() as u32);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let surface = SurfaceRect::new(self.surface.left, self.surface.top, width as f32, height as f32);
        self.set_surface(surface);
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer.state()
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) -> Result<PointerState, ConfiguratorError> {
        self.pointer.on_pointer_move(client_x, client_y, &self.surface)
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer.clear();
    }

    /// Pointer in normalized device coordinates, if it is usable for hit testing this frame.
    pub fn pointer_ndc(&self) -> Option<Point2<f32>> {
        if self.surface.is_degenerate() {
            return None;
        }
        self.pointer.state().ndc()
    }

    /**
     * Feeds window events of the host's event loop into the context.
     *
     * Handles cursor movement, the cursor leaving the window and resizes.
     * Returns whether the event was consumed.
     */
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                if let Err(e) = self.on_pointer_move(position.x as f32, position.y as f32) {
                    log::debug!("Ignoring cursor movement: {}", e);
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.on_pointer_leave();
                true
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
                true
            }
            _ => false,
        }
    }

    pub fn dispose(mut self) {
        self.pointer.clear();
        log::info!("Context disposed");
    }
}
