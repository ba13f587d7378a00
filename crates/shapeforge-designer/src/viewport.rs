//! Viewport and coordinate transformation for the canvas.
//!
//! Maps between screen coordinates and canvas units with
//! `screen = canvas * zoom + pan`. Zoom is clamped to the configured limits
//! and every zoom operation keeps a chosen screen point fixed.

use std::fmt;

use serde::{Deserialize, Serialize};
use shapeforge_core::constants::{CANVAS_SIZE, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

use crate::geometry::{Bounds, Point};

/// Viewport transformation state (zoom and pan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    #[serde(skip, default = "default_limits")]
    limits: ZoomLimits,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomLimits {
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
    canvas_size: f64,
}

fn default_limits() -> ZoomLimits {
    ZoomLimits {
        min_zoom: MIN_ZOOM,
        max_zoom: MAX_ZOOM,
        zoom_step: ZOOM_STEP,
        canvas_size: CANVAS_SIZE,
    }
}

impl Viewport {
    /// Creates a viewport at zoom 1 with no pan.
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            limits: default_limits(),
        }
    }

    /// Creates a viewport with custom zoom limits, step and canvas size.
    pub fn with_limits(min_zoom: f64, max_zoom: f64, zoom_step: f64, canvas_size: f64) -> Self {
        Self {
            limits: ZoomLimits {
                min_zoom,
                max_zoom,
                zoom_step,
                canvas_size,
            },
            ..Self::new()
        }
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Gets the pan offset (X coordinate).
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    /// Gets the pan offset (Y coordinate).
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    pub fn min_zoom(&self) -> f64 {
        self.limits.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.limits.max_zoom
    }

    pub fn zoom_step(&self) -> f64 {
        self.limits.zoom_step
    }

    pub fn canvas_size(&self) -> f64 {
        self.limits.canvas_size
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.limits.min_zoom, self.limits.max_zoom)
    }

    /// Sets the zoom level, clamped to the limits. Returns true if it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let zoom = self.clamp_zoom(zoom);
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a relative offset in screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zooms by `delta` steps keeping the screen point (`px`, `py`) fixed.
    ///
    /// Returns false, leaving the state untouched, when the clamped zoom
    /// equals the current zoom.
    pub fn zoom_at_point(&mut self, delta: f64, px: f64, py: f64) -> bool {
        let old_zoom = self.zoom;
        let new_zoom = self.clamp_zoom(old_zoom + delta * self.limits.zoom_step);
        if new_zoom == old_zoom {
            return false;
        }
        let ratio = new_zoom / old_zoom;
        self.pan_x = px - (px - self.pan_x) * ratio;
        self.pan_y = py - (py - self.pan_y) * ratio;
        self.zoom = new_zoom;
        true
    }

    /// Sets zoom to `start_zoom * scale` keeping the screen point (`cx`, `cy`)
    /// fixed, computed from the pan recorded when the gesture started.
    ///
    /// Returns false when neither zoom nor pan changes.
    pub fn set_zoom_at_point(
        &mut self,
        start_zoom: f64,
        scale: f64,
        cx: f64,
        cy: f64,
        start_pan_x: f64,
        start_pan_y: f64,
    ) -> bool {
        if start_zoom <= 0.0 || !scale.is_finite() {
            return false;
        }
        let new_zoom = self.clamp_zoom(start_zoom * scale);
        let ratio = new_zoom / start_zoom;
        let pan_x = cx - (cx - start_pan_x) * ratio;
        let pan_y = cy - (cy - start_pan_y) * ratio;
        if new_zoom == self.zoom && pan_x == self.pan_x && pan_y == self.pan_y {
            return false;
        }
        self.zoom = new_zoom;
        self.pan_x = pan_x;
        self.pan_y = pan_y;
        true
    }

    /// Zooms in one step about the canvas center.
    pub fn zoom_in(&mut self) -> bool {
        let c = self.canvas_to_screen(self.canvas_center());
        self.zoom_at_point(1.0, c.x, c.y)
    }

    /// Zooms out one step about the canvas center.
    pub fn zoom_out(&mut self) -> bool {
        let c = self.canvas_to_screen(self.canvas_center());
        self.zoom_at_point(-1.0, c.x, c.y)
    }

    /// Resets to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Converts a screen point to canvas units.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    /// Converts a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan_x,
            canvas.y * self.zoom + self.pan_y,
        )
    }

    /// Converts a screen-pixel length to canvas units.
    pub fn screen_to_canvas_len(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Part of the canvas currently visible, in canvas units.
    pub fn visible_region(&self) -> Bounds {
        let size = self.limits.canvas_size / self.zoom;
        let min_x = -self.pan_x / self.zoom;
        let min_y = -self.pan_y / self.zoom;
        Bounds::new(min_x, min_y, min_x + size, min_y + size)
    }

    fn canvas_center(&self) -> Point {
        let half = self.limits.canvas_size / 2.0;
        Point::new(half, half)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport(zoom: {:.2}x, pan: ({:.1}, {:.1}))",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}
