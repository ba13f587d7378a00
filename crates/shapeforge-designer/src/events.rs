//! Input events consumed by the editor and effects produced by the
//! interaction controllers.
//!
//! Pointer, touch and wheel positions are screen coordinates. Timestamps are
//! milliseconds on a host-supplied monotonic clock.

use serde::{Deserialize, Serialize};
use shapeforge_core::Modifiers;

use crate::geometry::Point;
use crate::model::ShapeUpdates;
use crate::selection_manager::SelectRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
            button: PointerButton::Primary,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// A touch frame. `touches` lists every touch still on the surface after
/// the event, so a touch-end with an empty list means all fingers lifted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub touches: Vec<TouchPoint>,
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl TouchEvent {
    pub fn new(touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            touches,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Focus is in a text input; key bindings are not consulted.
    #[serde(default)]
    pub in_text_field: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
            in_text_field: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default)]
    pub delta_y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

/// Every input the editor dispatches, one variant per handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    TouchStart(TouchEvent),
    TouchMove(TouchEvent),
    TouchEnd(TouchEvent),
    KeyDown(KeyEvent),
    Wheel(WheelEvent),
    Tick { timestamp_ms: u64 },
}

/// Outcome of a controller step, applied by the editor in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Patches for the shape store. `label` names the gesture for the
    /// history checkpoint recorded when it ends.
    UpdateShapes {
        updates: ShapeUpdates,
        label: &'static str,
    },
    Select(SelectRequest),
    /// Step zoom by `delta` keeping the screen point fixed.
    ZoomAtPoint { delta: f64, x: f64, y: f64 },
    /// Absolute zoom from a gesture baseline.
    SetZoomAtPoint {
        start_zoom: f64,
        scale: f64,
        center: Point,
        start_pan: Point,
    },
    /// Pan by a screen-pixel offset.
    Pan { dx: f64, dy: f64 },
    /// Open the context menu at a screen point.
    ContextMenu(Point),
    Haptic,
}
