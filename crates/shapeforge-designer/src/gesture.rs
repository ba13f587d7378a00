//! Touch gesture state machine.
//!
//! One finger: tap, drag or long-press. A drag that starts on a shape moves
//! it (with the selection when it is selected) by the per-frame delta
//! between consecutive touch points; a drag on empty canvas pans the
//! viewport. Two fingers: pinch-scale and twist the selected shapes about
//! the moving centroid, or pinch-zoom the viewport when nothing is selected.

use std::collections::BTreeMap;

use shapeforge_core::constants::{
    LONG_PRESS_MS, MIN_DIRECTION_LENGTH, MIN_SHAPE_SIZE, TAP_MOVE_THRESHOLD,
};

use crate::events::{Effect, TouchEvent, TouchPoint};
use crate::geometry::{angle_between, flip_compensated, wrap_degrees, Point};
use crate::model::{ShapeId, ShapePatch, ShapeSnapshot, ShapeUpdates};
use crate::selection_manager::{find_shape_at_point, SelectRequest, SelectionManager};
use crate::shape_store::ShapeStore;
use crate::viewport::Viewport;

const MOVE_LABEL: &str = "Move";
const PINCH_LABEL: &str = "Pinch";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub long_press_ms: u64,
    /// Movement in canvas units a touch may make and still count as a tap.
    pub tap_threshold: f64,
    pub min_size: f64,
    pub min_direction: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            tap_threshold: TAP_MOVE_THRESHOLD,
            min_size: MIN_SHAPE_SIZE,
            min_direction: MIN_DIRECTION_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleTouch {
    pub touch_id: u64,
    pub start_screen: Point,
    /// Start point in canvas units.
    pub start: Point,
    pub last_screen: Point,
    pub touched: Option<ShapeId>,
    pub long_press_deadline: Option<u64>,
    pub start_zoom: f64,
    pub moved: bool,
    pub long_press_fired: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PinchTarget {
    Shapes(BTreeMap<ShapeId, ShapeSnapshot>),
    Viewport { start_zoom: f64, start_pan: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinchTouch {
    pub touch_ids: [u64; 2],
    pub start_distance: f64,
    pub start_angle: f64,
    /// Midpoint of the two touches at pinch start, canvas units.
    pub start_center: Point,
    pub target: PinchTarget,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TouchState {
    #[default]
    Idle,
    Single(SingleTouch),
    Pinch(PinchTouch),
}

/// Read-only view of the document a gesture step works against.
#[derive(Clone, Copy)]
pub struct GestureContext<'a> {
    pub store: &'a ShapeStore,
    pub selection: &'a SelectionManager,
    pub viewport: &'a Viewport,
}

#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: TouchState,
    config: GestureConfig,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            state: TouchState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &TouchState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != TouchState::Idle
    }

    /// Drops any gesture in progress.
    pub fn cancel(&mut self) {
        if self.is_active() {
            tracing::debug!("Touch gesture cancelled");
        }
        self.state = TouchState::Idle;
    }

    pub fn touch_start(&mut self, event: &TouchEvent, ctx: GestureContext<'_>) -> Vec<Effect> {
        match event.touches.as_slice() {
            [] => {
                self.state = TouchState::Idle;
                Vec::new()
            }
            [touch] => {
                if matches!(&self.state, TouchState::Single(s) if s.touch_id == touch.id) {
                    return Vec::new();
                }
                self.start_single(touch, event.timestamp_ms, ctx)
            }
            [a, b, ..] => {
                if let TouchState::Pinch(p) = &self.state {
                    if p.touch_ids == [a.id, b.id] {
                        return Vec::new();
                    }
                }
                self.start_pinch(a, b, ctx);
                Vec::new()
            }
        }
    }

    pub fn touch_move(&mut self, event: &TouchEvent, ctx: GestureContext<'_>) -> Vec<Effect> {
        let config = self.config;
        match &mut self.state {
            TouchState::Idle => Vec::new(),
            TouchState::Single(single) => {
                let Some(touch) = find_touch(&event.touches, single.touch_id) else {
                    return Vec::new();
                };
                let mut effects = check_long_press(single, event.timestamp_ms);
                if single.long_press_fired {
                    return effects;
                }
                if !single.moved {
                    let travelled = (touch.position - single.start_screen).length() / single.start_zoom;
                    if travelled <= config.tap_threshold {
                        return effects;
                    }
                    single.moved = true;
                    single.long_press_deadline = None;
                    tracing::debug!("Touch became a drag");
                }
                let screen_delta = touch.position - single.last_screen;
                single.last_screen = touch.position;
                effects.extend(drag_effects(single.touched, screen_delta, ctx));
                effects
            }
            TouchState::Pinch(pinch) => pinch_effects(pinch, &event.touches, ctx, &config)
                .into_iter()
                .collect(),
        }
    }

    pub fn touch_end(&mut self, event: &TouchEvent, ctx: GestureContext<'_>) -> Vec<Effect> {
        let remaining = event.touches.as_slice();
        match std::mem::take(&mut self.state) {
            TouchState::Idle => match remaining {
                [touch] => self.start_single(touch, event.timestamp_ms, ctx),
                _ => Vec::new(),
            },
            TouchState::Single(mut single) => {
                if find_touch(remaining, single.touch_id).is_some() {
                    self.state = TouchState::Single(single);
                    return Vec::new();
                }
                // A long-press only fires from `tick` or a move; lifting
                // before either saw the deadline is a tap.
                let mut effects = Vec::new();
                if !single.moved && !single.long_press_fired {
                    tracing::debug!("Tap at {}", single.start);
                    if single.touched.is_none() {
                        effects.push(Effect::Select(SelectRequest::clear()));
                    }
                }
                if let Some(touch) = remaining.first() {
                    effects.extend(self.start_single(touch, event.timestamp_ms, ctx));
                }
                effects
            }
            TouchState::Pinch(pinch) => match remaining {
                [] => {
                    tracing::debug!("Pinch ended");
                    Vec::new()
                }
                [touch] => {
                    tracing::debug!("Pinch ended, touch {} continues", touch.id);
                    self.start_single(touch, event.timestamp_ms, ctx)
                }
                [a, b, ..] => {
                    if pinch.touch_ids == [a.id, b.id] {
                        self.state = TouchState::Pinch(pinch);
                    } else {
                        self.start_pinch(a, b, ctx);
                    }
                    Vec::new()
                }
            },
        }
    }

    /// Fires a pending long-press whose deadline has passed.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        match &mut self.state {
            TouchState::Single(single) => check_long_press(single, now_ms),
            _ => Vec::new(),
        }
    }

    fn start_single(&mut self, touch: &TouchPoint, now_ms: u64, ctx: GestureContext<'_>) -> Vec<Effect> {
        let start = ctx.viewport.screen_to_canvas(touch.position);
        let touched = find_shape_at_point(ctx.store, start);
        let mut effects = Vec::new();
        if let Some(id) = touched {
            if !ctx.selection.contains(id) {
                effects.push(Effect::Select(SelectRequest::only(id)));
            }
        }
        tracing::debug!("Touch start at {} on {:?}", start, touched);
        self.state = TouchState::Single(SingleTouch {
            touch_id: touch.id,
            start_screen: touch.position,
            start,
            last_screen: touch.position,
            touched,
            long_press_deadline: Some(now_ms + self.config.long_press_ms),
            start_zoom: ctx.viewport.zoom(),
            moved: false,
            long_press_fired: false,
        });
        effects
    }

    fn start_pinch(&mut self, a: &TouchPoint, b: &TouchPoint, ctx: GestureContext<'_>) {
        let mid = a.position.midpoint(b.position);
        let snapshots: BTreeMap<ShapeId, ShapeSnapshot> = ctx
            .selection
            .selected_shapes(ctx.store)
            .into_iter()
            .map(|s| (s.id, s.snapshot()))
            .collect();
        let target = if snapshots.is_empty() {
            PinchTarget::Viewport {
                start_zoom: ctx.viewport.zoom(),
                start_pan: ctx.viewport.pan(),
            }
        } else {
            PinchTarget::Shapes(snapshots)
        };
        tracing::debug!(
            "Pinch start ({})",
            match target {
                PinchTarget::Shapes(ref s) => format!("{} shape(s)", s.len()),
                PinchTarget::Viewport { .. } => "viewport".to_string(),
            }
        );
        self.state = TouchState::Pinch(PinchTouch {
            touch_ids: [a.id, b.id],
            start_distance: a.position.distance_to(b.position),
            start_angle: angle_between(a.position, b.position),
            start_center: ctx.viewport.screen_to_canvas(mid),
            target,
        });
    }
}

fn find_touch(touches: &[TouchPoint], id: u64) -> Option<&TouchPoint> {
    touches.iter().find(|t| t.id == id)
}

fn check_long_press(single: &mut SingleTouch, now_ms: u64) -> Vec<Effect> {
    let due = single.long_press_deadline.is_some_and(|deadline| now_ms >= deadline);
    if !due || single.moved || single.long_press_fired {
        return Vec::new();
    }
    single.long_press_fired = true;
    single.long_press_deadline = None;
    tracing::debug!("Long press at {}", single.start);
    vec![Effect::Haptic, Effect::ContextMenu(single.start_screen)]
}

/// One frame of a single-finger drag: move shapes or pan.
fn drag_effects(touched: Option<ShapeId>, screen_delta: Point, ctx: GestureContext<'_>) -> Vec<Effect> {
    let Some(id) = touched else {
        return vec![Effect::Pan {
            dx: screen_delta.x,
            dy: screen_delta.y,
        }];
    };
    let ids = if ctx.selection.contains(id) {
        ctx.selection.ids()
    } else {
        vec![id]
    };
    let delta = screen_delta * (1.0 / ctx.viewport.zoom());
    let updates: ShapeUpdates = ids
        .into_iter()
        .filter_map(|id| ctx.store.get(id))
        .map(|shape| (shape.id, ShapePatch::position(Point::new(shape.x, shape.y) + delta)))
        .collect();
    if updates.is_empty() {
        return Vec::new();
    }
    tracing::trace!("Touch drag {} shape(s) by {}", updates.len(), delta);
    vec![Effect::UpdateShapes {
        updates,
        label: MOVE_LABEL,
    }]
}

fn pinch_effects(
    pinch: &PinchTouch,
    touches: &[TouchPoint],
    ctx: GestureContext<'_>,
    config: &GestureConfig,
) -> Option<Effect> {
    let a = find_touch(touches, pinch.touch_ids[0])?;
    let b = find_touch(touches, pinch.touch_ids[1])?;
    if pinch.start_distance < config.min_direction {
        tracing::warn!("Skipping pinch frame: touches started on the same point");
        return None;
    }
    let scale = a.position.distance_to(b.position) / pinch.start_distance;
    let rotation_delta = wrap_degrees(angle_between(a.position, b.position) - pinch.start_angle);
    let mid = a.position.midpoint(b.position);

    match &pinch.target {
        PinchTarget::Viewport {
            start_zoom,
            start_pan,
        } => Some(Effect::SetZoomAtPoint {
            start_zoom: *start_zoom,
            scale,
            center: mid,
            start_pan: *start_pan,
        }),
        PinchTarget::Shapes(snapshots) => {
            let center = ctx.viewport.screen_to_canvas(mid);
            let updates: ShapeUpdates = snapshots
                .iter()
                .map(|(id, snap)| {
                    let offset = (snap.center() - pinch.start_center).rotated(rotation_delta) * scale;
                    let new_size = (snap.size * scale).max(config.min_size);
                    let pos = center + offset - Point::new(new_size / 2.0, new_size / 2.0);
                    let rotation =
                        snap.rotation + flip_compensated(rotation_delta, snap.flip_x, snap.flip_y);
                    (*id, ShapePatch::transform(pos, new_size, rotation))
                })
                .collect();
            tracing::trace!("Pinch scale {:.3} rotate {:.1}", scale, rotation_delta);
            Some(Effect::UpdateShapes {
                updates,
                label: PINCH_LABEL,
            })
        }
    }
}
