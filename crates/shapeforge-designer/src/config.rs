//! Tunable interaction parameters for [`crate::CanvasEditor`].

use serde::{Deserialize, Serialize};
use shapeforge_core::constants::*;
use shapeforge_core::KeyBindings;

use crate::drag::DragConfig;
use crate::gesture::GestureConfig;
use crate::keyboard::StepConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub min_shape_size: f64,
    pub min_group_scale: f64,
    pub long_press_ms: u64,
    pub tap_threshold: f64,
    pub snap_angle_deg: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    pub rotate_step_deg: f64,
    pub rotate_step_large_deg: f64,
    pub duplicate_offset: f64,
    pub history_depth: usize,
    pub handle_radius_px: f64,
    pub rotate_handle_offset_px: f64,
    pub key_bindings: KeyBindings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            min_shape_size: MIN_SHAPE_SIZE,
            min_group_scale: MIN_GROUP_SCALE,
            long_press_ms: LONG_PRESS_MS,
            tap_threshold: TAP_MOVE_THRESHOLD,
            snap_angle_deg: SNAP_ANGLE_DEG,
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
            rotate_step_deg: ROTATE_STEP_DEG,
            rotate_step_large_deg: ROTATE_STEP_LARGE_DEG,
            duplicate_offset: DUPLICATE_OFFSET,
            history_depth: HISTORY_DEPTH,
            handle_radius_px: HANDLE_RADIUS_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl EditorConfig {
    pub fn drag_config(&self) -> DragConfig {
        DragConfig {
            min_size: self.min_shape_size,
            min_group_scale: self.min_group_scale,
            snap_angle: self.snap_angle_deg,
            min_direction: MIN_DIRECTION_LENGTH,
        }
    }

    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            long_press_ms: self.long_press_ms,
            tap_threshold: self.tap_threshold,
            min_size: self.min_shape_size,
            min_direction: MIN_DIRECTION_LENGTH,
        }
    }

    pub fn step_config(&self) -> StepConfig {
        StepConfig {
            nudge: self.nudge_step,
            nudge_large: self.nudge_step_large,
            rotate: self.rotate_step_deg,
            rotate_large: self.rotate_step_large_deg,
        }
    }
}
