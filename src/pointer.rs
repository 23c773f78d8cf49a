//! Pointer tracking in normalized device coordinates.
//!
//! Pointer events arrive independently of the frame loop. They only update
//! the stored [`PointerState`]; the frame loop samples the latest state once
//! per tick.

use cgmath::Point2;

use crate::error::ConfiguratorError;

/// Screen-space rectangle of the render surface, in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A surface at the window origin.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }
}

/// Last known pointer position, `None` until the first pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState(Option<Point2<f32>>);

impl PointerState {
    pub fn at(x: f32, y: f32) -> Self {
        Self(Some(Point2::new(x, y)))
    }

    pub fn ndc(&self) -> Option<Point2<f32>> {
        self.0
    }

    /// Whether the pointer lies on the render surface.
    pub fn is_inside(&self) -> bool {
        self.0
            .is_some_and(|p| (-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y))
    }
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /**
     * Maps client coordinates into normalized device coordinates of `surface`.
     *
     * x grows to the right and y grows upwards, both spanning -1..1 across the
     * surface. A degenerate surface leaves the previous state untouched.
     */
    pub fn on_pointer_move(
        &mut self,
        client_x: f32,
        client_y: f32,
        surface: &SurfaceRect,
    ) -> Result<PointerState, ConfiguratorError> {
        if surface.is_degenerate() {
            return Err(ConfiguratorError::DegenerateSurface {
                width: surface.width,
                height: surface.height,
            });
        }
        let x = ((client_x - surface.left) / surface.width) * 2.0 - 1.0;
        let y = -((client_y - surface.top) / surface.height) * 2.0 + 1.0;
        self.state = PointerState::at(x, y);
        Ok(self.state)
    }

    /// Forgets the pointer, e.g. when the cursor leaves the window.
    pub fn clear(&mut self) {
        self.state = PointerState::default();
    }
}
