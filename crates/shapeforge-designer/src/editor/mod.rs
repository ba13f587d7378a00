//! Canvas editor.
//!
//! `CanvasEditor` owns the document (shapes, groups, selection), the
//! viewport and the interaction controllers. Each input class has one
//! dispatch method (see `input.rs`); controllers answer with [`Effect`]s
//! which the editor applies and reports to an optional [`EditorListener`].

mod actions;
mod input;

pub use input::{HandleSet, HitTarget};

use crate::config::EditorConfig;
use crate::drag::{DragController, DragMode};
use crate::events::Effect;
use crate::geometry::Point;
use crate::gesture::{GestureController, TouchState};
use crate::history::{CanvasSnapshot, History, HistoryCoordinator};
use crate::keyboard::KeyboardRouter;
use crate::model::{Shape, ShapeId, ShapeUpdates};
use crate::selection_manager::SelectionManager;
use crate::shape_store::ShapeStore;
use crate::viewport::Viewport;

/// Receives notifications of editor state changes.
///
/// Every method has an empty default so hosts implement only what they
/// render or forward.
pub trait EditorListener {
    /// Called after patches were written to the shape store
    fn on_shapes_updated(&mut self, _updates: &ShapeUpdates) {}

    /// Called when a history checkpoint is recorded
    fn on_commit(&mut self, _label: &str) {}

    /// Called when the selected set changes
    fn on_selection_changed(&mut self, _selected: &[ShapeId]) {}

    /// Called when zoom or pan changes
    fn on_viewport_changed(&mut self, _viewport: &Viewport) {}

    /// Called when undo or redo replaced the document
    fn on_history_restored(&mut self, _label: &str) {}

    /// Called when a context menu should open at a screen point
    fn on_context_menu(&mut self, _screen: Point) {}

    /// Called when the device should give haptic feedback
    fn on_haptic(&mut self) {}
}

pub struct CanvasEditor {
    store: ShapeStore,
    selection: SelectionManager,
    viewport: Viewport,
    drag: DragController,
    gestures: GestureController,
    keyboard: KeyboardRouter,
    history: History,
    coordinator: HistoryCoordinator,
    pan_mode: bool,
    /// Last screen point of a pointer pan in progress.
    pan_anchor: Option<Point>,
    config: EditorConfig,
    listener: Option<Box<dyn EditorListener>>,
}

impl CanvasEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(config, ShapeStore::new())
    }

    /// Creates an editor over existing shapes. The initial shapes are the
    /// history baseline.
    pub fn with_shapes(config: EditorConfig, shapes: impl IntoIterator<Item = Shape>) -> Self {
        Self::with_store(config, ShapeStore::from_shapes(shapes))
    }

    fn with_store(config: EditorConfig, store: ShapeStore) -> Self {
        let selection = SelectionManager::new();
        let history = History::with_depth(
            CanvasSnapshot {
                store: store.clone(),
                selection: selection.clone(),
            },
            config.history_depth,
        );
        Self {
            store,
            selection,
            viewport: Viewport::with_limits(
                config.min_zoom,
                config.max_zoom,
                config.zoom_step,
                config.canvas_size,
            ),
            drag: DragController::new(config.drag_config()),
            gestures: GestureController::new(config.gesture_config()),
            keyboard: KeyboardRouter::new(config.key_bindings.clone(), config.step_config()),
            history,
            coordinator: HistoryCoordinator::new(),
            pan_mode: false,
            pan_anchor: None,
            config,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: Box<dyn EditorListener>) {
        self.listener = Some(listener);
    }

    pub fn take_listener(&mut self) -> Option<Box<dyn EditorListener>> {
        self.listener.take()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.store.get(id)
    }

    /// Shapes in draw order, bottom first.
    pub fn shapes(&self) -> Vec<&Shape> {
        self.store
            .draw_order()
            .into_iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn coordinator(&self) -> &HistoryCoordinator {
        &self.coordinator
    }

    pub fn is_pan_mode(&self) -> bool {
        self.pan_mode
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.mode()
    }

    pub fn touch_state(&self) -> &TouchState {
        self.gestures.state()
    }

    fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            store: self.store.clone(),
            selection: self.selection.clone(),
        }
    }

    /// Records a history checkpoint of the current document.
    fn commit(&mut self, label: &str) {
        let snapshot = self.snapshot();
        self.history.commit(label, snapshot);
        tracing::info!("Committed '{}' ({} undo step(s))", label, self.history.undo_count());
        if let Some(listener) = self.listener.as_mut() {
            listener.on_commit(label);
        }
    }

    /// Closes the active continuous gesture, committing it if it changed
    /// anything.
    fn finish_gesture(&mut self) {
        if let Some(label) = self.coordinator.finish_gesture() {
            self.commit(label);
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::UpdateShapes { updates, label } => {
                if self.store.apply_updates(&updates) > 0 {
                    self.coordinator.record_update(label);
                    self.notify_shapes(&updates);
                }
            }
            Effect::Select(request) => {
                if self.selection.apply(&request) {
                    self.notify_selection();
                }
            }
            Effect::ZoomAtPoint { delta, x, y } => {
                if self.viewport.zoom_at_point(delta, x, y) {
                    self.notify_viewport();
                }
            }
            Effect::SetZoomAtPoint {
                start_zoom,
                scale,
                center,
                start_pan,
            } => {
                if self.viewport.set_zoom_at_point(
                    start_zoom,
                    scale,
                    center.x,
                    center.y,
                    start_pan.x,
                    start_pan.y,
                ) {
                    self.notify_viewport();
                }
            }
            Effect::Pan { dx, dy } => {
                if dx != 0.0 || dy != 0.0 {
                    self.viewport.pan_by(dx, dy);
                    self.notify_viewport();
                }
            }
            Effect::ContextMenu(point) => {
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_context_menu(point);
                }
            }
            Effect::Haptic => {
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_haptic();
                }
            }
        }
    }

    fn notify_shapes(&mut self, updates: &ShapeUpdates) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_shapes_updated(updates);
        }
    }

    fn notify_selection(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_selection_changed(&self.selection.ids());
        }
    }

    fn notify_viewport(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_viewport_changed(&self.viewport);
        }
    }
}

impl Default for CanvasEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
