//! Input dispatch: one handler per input class.

use super::CanvasEditor;
use crate::drag::DragTarget;
use crate::events::{
    Effect, InputEvent, KeyEvent, PointerButton, PointerEvent, TouchEvent, WheelEvent,
};
use crate::geometry::{Corner, Point};
use crate::gesture::GestureContext;
use crate::keyboard::KeyCommand;
use crate::model::ShapeId;
use crate::selection_manager::{find_shape_at_point, SelectRequest};

/// What lies under a screen point, checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle(DragTarget),
    Shape(ShapeId),
    Empty,
}

/// Handle positions of the selection frame, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleSet {
    pub corners: [(Corner, Point); 4],
    pub rotate: Point,
}

impl CanvasEditor {
    /// Dispatches any input event to its handler.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown(e) => self.pointer_down(e),
            InputEvent::PointerMove(e) => self.pointer_move(e),
            InputEvent::PointerUp(e) => self.pointer_up(e),
            InputEvent::TouchStart(e) => self.touch_start(e),
            InputEvent::TouchMove(e) => self.touch_move(e),
            InputEvent::TouchEnd(e) => self.touch_end(e),
            InputEvent::KeyDown(e) => {
                self.key_down(e);
            }
            InputEvent::Wheel(e) => self.wheel(e),
            InputEvent::Tick { timestamp_ms } => self.tick(*timestamp_ms),
        }
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) {
        if self.gestures.is_active() {
            self.gestures.cancel();
            self.finish_gesture();
        }
        if self.drag.end().is_some() {
            self.finish_gesture();
        }
        self.pan_anchor = None;

        if self.pan_mode || event.button == PointerButton::Middle {
            self.pan_anchor = Some(event.position);
            return;
        }

        let point = self.viewport.screen_to_canvas(event.position);
        let hit = self.hit_test(event.position);

        if event.button == PointerButton::Secondary {
            if let HitTarget::Shape(id) = hit {
                if !self.selection.contains(id) {
                    self.apply_effect(Effect::Select(SelectRequest::only(id)));
                }
            }
            self.apply_effect(Effect::ContextMenu(event.position));
            return;
        }

        match hit {
            HitTarget::Handle(target) => {
                self.drag.begin(target, point, &self.store, &self.selection);
            }
            HitTarget::Shape(id) => {
                if event.modifiers.shift {
                    self.apply_effect(Effect::Select(SelectRequest::toggle(id)));
                    if !self.selection.contains(id) {
                        return;
                    }
                } else if !self.selection.contains(id) {
                    self.apply_effect(Effect::Select(SelectRequest::only(id)));
                }
                self.drag
                    .begin(DragTarget::Shape(id), point, &self.store, &self.selection);
            }
            HitTarget::Empty => {
                if !event.modifiers.shift {
                    self.apply_effect(Effect::Select(SelectRequest::clear()));
                }
            }
        }
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        if let Some(last) = self.pan_anchor {
            let delta = event.position - last;
            self.pan_anchor = Some(event.position);
            self.apply_effect(Effect::Pan {
                dx: delta.x,
                dy: delta.y,
            });
            return;
        }
        let Some(mode) = self.drag.mode() else {
            return;
        };
        let point = self.viewport.screen_to_canvas(event.position);
        if let Some(updates) = self.drag.update(point, event.modifiers, &self.store) {
            self.apply_effect(Effect::UpdateShapes {
                updates,
                label: mode.label(),
            });
        }
    }

    pub fn pointer_up(&mut self, _event: &PointerEvent) {
        self.pan_anchor = None;
        if self.drag.end().is_some() {
            self.finish_gesture();
        }
    }

    pub fn touch_start(&mut self, event: &TouchEvent) {
        self.pan_anchor = None;
        if self.drag.end().is_some() {
            self.finish_gesture();
        }
        let ctx = GestureContext {
            store: &self.store,
            selection: &self.selection,
            viewport: &self.viewport,
        };
        let effects = self.gestures.touch_start(event, ctx);
        self.apply_effects(effects);
    }

    pub fn touch_move(&mut self, event: &TouchEvent) {
        let ctx = GestureContext {
            store: &self.store,
            selection: &self.selection,
            viewport: &self.viewport,
        };
        let effects = self.gestures.touch_move(event, ctx);
        self.apply_effects(effects);
    }

    pub fn touch_end(&mut self, event: &TouchEvent) {
        let ctx = GestureContext {
            store: &self.store,
            selection: &self.selection,
            viewport: &self.viewport,
        };
        let effects = self.gestures.touch_end(event, ctx);
        self.apply_effects(effects);
        if event.touches.is_empty() {
            self.finish_gesture();
        }
    }

    /// Handles a key press. Returns true if it was routed to a command.
    /// While a drag or touch gesture is active only Escape is routed; the
    /// gesture owns the shapes until it ends.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        let Some(command) = self.keyboard.route(event) else {
            return false;
        };
        if command != KeyCommand::Cancel && self.is_gesture_active() {
            tracing::debug!("Ignoring {:?} during an active gesture", command);
            return false;
        }
        match command {
            KeyCommand::Cancel => self.cancel_gesture(),
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
            KeyCommand::Duplicate => {
                self.duplicate_selected();
            }
            KeyCommand::Delete => {
                self.delete_selected();
            }
            KeyCommand::Mirror(axis) => {
                self.mirror_selected(axis);
            }
            KeyCommand::Nudge { dx, dy } => {
                self.nudge_selected(dx, dy);
            }
            KeyCommand::Rotate { degrees } => {
                self.rotate_selected(degrees);
            }
            KeyCommand::TogglePanMode => {
                self.toggle_pan_mode();
            }
        }
        true
    }

    /// Ctrl/Cmd + wheel zooms one step at the cursor; a plain wheel pans.
    pub fn wheel(&mut self, event: &WheelEvent) {
        if event.modifiers.command() {
            if event.delta_y != 0.0 {
                self.apply_effect(Effect::ZoomAtPoint {
                    delta: -event.delta_y.signum(),
                    x: event.position.x,
                    y: event.position.y,
                });
            }
        } else {
            self.apply_effect(Effect::Pan {
                dx: -event.delta_x,
                dy: -event.delta_y,
            });
        }
    }

    /// True while a pointer drag or a touch gesture is in progress.
    pub fn is_gesture_active(&self) -> bool {
        self.drag.is_active() || self.gestures.is_active()
    }

    /// Host clock tick; fires a due long-press.
    pub fn tick(&mut self, now_ms: u64) {
        let effects = self.gestures.tick(now_ms);
        self.apply_effects(effects);
    }

    /// Abandons the active gesture. A pointer drag is rolled back to its
    /// start snapshots and leaves no history entry; a touch gesture keeps
    /// what it already applied.
    pub fn cancel_gesture(&mut self) {
        self.pan_anchor = None;
        if let Some(restore) = self.drag.cancel() {
            self.store.apply_updates(&restore);
            self.coordinator.discard_gesture();
            self.notify_shapes(&restore);
        }
        if self.gestures.is_active() {
            self.gestures.cancel();
            self.finish_gesture();
        }
    }

    /// Resize and rotate handle positions for the current selection.
    pub fn handle_positions(&self) -> Option<HandleSet> {
        let shapes = self.selection.selected_shapes(&self.store);
        let offset = self
            .viewport
            .screen_to_canvas_len(self.config.rotate_handle_offset_px);
        match shapes.as_slice() {
            [] => None,
            [shape] => {
                let corners = shape.corners();
                let (_, h) = shape.dimensions();
                let up = Point::new(0.0, -1.0).rotated(shape.rotation);
                let top_mid = shape.center() + up * (h / 2.0);
                Some(HandleSet {
                    corners: [
                        (Corner::Nw, corners[0]),
                        (Corner::Ne, corners[1]),
                        (Corner::Se, corners[2]),
                        (Corner::Sw, corners[3]),
                    ],
                    rotate: top_mid + up * offset,
                })
            }
            _ => {
                let bounds = self.selection.bounds(&self.store)?;
                Some(HandleSet {
                    corners: Corner::ALL.map(|c| (c, bounds.corner(c))),
                    rotate: Point::new(bounds.center().x, bounds.min_y - offset),
                })
            }
        }
    }

    /// Finds what lies under a screen point: a handle of the selection
    /// frame first, then the topmost shape.
    pub fn hit_test(&self, screen: Point) -> HitTarget {
        let point = self.viewport.screen_to_canvas(screen);
        if let Some(handles) = self.handle_positions() {
            let radius = self.viewport.screen_to_canvas_len(self.config.handle_radius_px);
            if handles.rotate.distance_to(point) <= radius {
                return HitTarget::Handle(DragTarget::Rotate);
            }
            if let Some((corner, _)) = handles
                .corners
                .iter()
                .find(|(_, p)| p.distance_to(point) <= radius)
            {
                return HitTarget::Handle(DragTarget::Resize(*corner));
            }
        }
        match find_shape_at_point(&self.store, point) {
            Some(id) => HitTarget::Shape(id),
            None => HitTarget::Empty,
        }
    }

    /// Topmost visible shape at a canvas point.
    pub fn shape_at(&self, canvas: Point) -> Option<ShapeId> {
        find_shape_at_point(&self.store, canvas)
    }
}
