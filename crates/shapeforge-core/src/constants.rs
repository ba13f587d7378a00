//! Interaction constants.
//!
//! All lengths are canvas units unless the name ends in `_PX` (screen pixels).

/// Logical side length of the square canvas.
pub const CANVAS_SIZE: f64 = 800.0;

/// Hard floor for any shape size.
pub const MIN_SHAPE_SIZE: f64 = 20.0;

/// Size given to newly placed shapes.
pub const DEFAULT_SHAPE_SIZE: f64 = 100.0;

/// Lower bound of the uniform scale applied by a multi-select resize.
pub const MIN_GROUP_SCALE: f64 = 0.1;

/// Direction vectors shorter than this are treated as degenerate.
pub const MIN_DIRECTION_LENGTH: f64 = 1.0;

/// Distances below this are treated as zero when normalizing.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;

/// Zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

pub const LONG_PRESS_MS: u64 = 500;

/// Touch movement at or below this distance still counts as a tap.
pub const TAP_MOVE_THRESHOLD: f64 = 10.0;

/// Rotation snapping increment in degrees.
pub const SNAP_ANGLE_DEG: f64 = 15.0;

pub const NUDGE_STEP: f64 = 1.0;
pub const NUDGE_STEP_LARGE: f64 = 10.0;
pub const ROTATE_STEP_DEG: f64 = 1.0;
pub const ROTATE_STEP_LARGE_DEG: f64 = 15.0;

/// Offset applied to duplicated shapes so the copy does not hide the original.
pub const DUPLICATE_OFFSET: f64 = 20.0;

pub const HISTORY_DEPTH: usize = 100;

/// Hit radius of resize and rotate handles.
pub const HANDLE_RADIUS_PX: f64 = 12.0;

/// Distance of the rotate handle above the top edge of the frame.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 30.0;
