//! Pointer drag state machine: move, resize and rotate.
//!
//! A drag captures snapshots of every affected shape when it begins and
//! computes each frame from those snapshots plus the current pointer
//! position, so the result never depends on how many frames were delivered.

use std::collections::BTreeMap;
use std::f64::consts::SQRT_2;

use shapeforge_core::constants::{
    MIN_DIRECTION_LENGTH, MIN_GROUP_SCALE, MIN_SHAPE_SIZE, SNAP_ANGLE_DEG,
};
use shapeforge_core::Modifiers;

use crate::geometry::{
    angle_between, flip_compensated, rotate_point, snap_angle, wrap_degrees, Bounds, Corner, Point,
};
use crate::model::{ShapeId, ShapePatch, ShapeSnapshot, ShapeUpdates};
use crate::selection_manager::{selection_bounds, SelectionManager};
use crate::shape_store::ShapeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize,
    Rotate,
}

impl DragMode {
    /// History label recorded when a drag in this mode completes.
    pub fn label(&self) -> &'static str {
        match self {
            DragMode::Move => "Move",
            DragMode::Resize => "Resize",
            DragMode::Rotate => "Rotate",
        }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// Body of a shape: moves it, or the whole selection if it is selected.
    Shape(ShapeId),
    /// Corner handle of the selection frame.
    Resize(Corner),
    /// Rotate handle of the selection frame.
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    pub min_size: f64,
    pub min_group_scale: f64,
    pub snap_angle: f64,
    pub min_direction: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SHAPE_SIZE,
            min_group_scale: MIN_GROUP_SCALE,
            snap_angle: SNAP_ANGLE_DEG,
            min_direction: MIN_DIRECTION_LENGTH,
        }
    }
}

/// Transient state of an active drag. Built once by
/// [`DragController::begin`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub mode: DragMode,
    /// Pointer position at drag start, canvas units.
    pub start: Point,
    pub snapshots: BTreeMap<ShapeId, ShapeSnapshot>,
    pub resize_corner: Option<Corner>,
    /// Selection bounds at drag start.
    pub start_bounds: Option<Bounds>,
}

impl DragState {
    /// The only shape of a single-shape drag.
    pub fn single(&self) -> Option<(ShapeId, &ShapeSnapshot)> {
        if self.snapshots.len() == 1 {
            self.snapshots.iter().next().map(|(id, snap)| (*id, snap))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: Option<DragState>,
    config: DragConfig,
}

impl DragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            state: None,
            config,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.state.as_ref().map(|s| s.mode)
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    /// Starts a drag at canvas point `point`, replacing any previous state.
    ///
    /// Returns the mode entered, or `None` if there is nothing to drag.
    pub fn begin(
        &mut self,
        target: DragTarget,
        point: Point,
        store: &ShapeStore,
        selection: &SelectionManager,
    ) -> Option<DragMode> {
        self.state = None;

        let (mode, ids, resize_corner) = match target {
            DragTarget::Shape(id) => {
                if !store.contains(id) {
                    return None;
                }
                let ids = if selection.contains(id) {
                    selection.ids()
                } else {
                    vec![id]
                };
                (DragMode::Move, ids, None)
            }
            DragTarget::Resize(corner) => (DragMode::Resize, selection.ids(), Some(corner)),
            DragTarget::Rotate => (DragMode::Rotate, selection.ids(), None),
        };

        let shapes: Vec<_> = ids.iter().filter_map(|id| store.get(*id)).collect();
        if shapes.is_empty() {
            return None;
        }
        let snapshots = shapes.iter().map(|s| (s.id, s.snapshot())).collect();
        let start_bounds = selection_bounds(shapes.iter().copied());

        tracing::debug!(
            "Drag begin: {:?} on {} shape(s) at {}",
            mode,
            shapes.len(),
            point
        );
        self.state = Some(DragState {
            mode,
            start: point,
            snapshots,
            resize_corner,
            start_bounds,
        });
        Some(mode)
    }

    /// Computes the updates for the pointer at canvas point `point`.
    ///
    /// Shift locks a move to its dominant axis and snaps rotation.
    /// Returns `None` when no drag is active or the frame is degenerate.
    pub fn update(
        &self,
        point: Point,
        modifiers: Modifiers,
        store: &ShapeStore,
    ) -> Option<ShapeUpdates> {
        let state = self.state.as_ref()?;
        let updates = match state.mode {
            DragMode::Move => self.move_updates(state, point, modifiers.shift),
            DragMode::Resize => self.resize_updates(state, point)?,
            DragMode::Rotate => self.rotate_updates(state, point, modifiers.shift, store)?,
        };
        tracing::trace!("Drag update: {:?} {} patch(es)", state.mode, updates.len());
        Some(updates)
    }

    /// Ends the drag and hands back its state.
    pub fn end(&mut self) -> Option<DragState> {
        let state = self.state.take();
        if let Some(state) = &state {
            tracing::debug!("Drag end: {:?}", state.mode);
        }
        state
    }

    /// Abandons the drag. Returns patches restoring every dragged shape to
    /// its start snapshot.
    pub fn cancel(&mut self) -> Option<ShapeUpdates> {
        let state = self.state.take()?;
        tracing::debug!("Drag cancelled: {:?}", state.mode);
        Some(
            state
                .snapshots
                .iter()
                .map(|(id, snap)| {
                    (
                        *id,
                        ShapePatch::transform(snap.position(), snap.size, snap.rotation),
                    )
                })
                .collect(),
        )
    }

    fn move_updates(&self, state: &DragState, point: Point, axis_lock: bool) -> ShapeUpdates {
        let mut delta = point - state.start;
        if axis_lock {
            if delta.x.abs() > delta.y.abs() {
                delta.y = 0.0;
            } else {
                delta.x = 0.0;
            }
        }
        state
            .snapshots
            .iter()
            .map(|(id, snap)| (*id, ShapePatch::position(snap.position() + delta)))
            .collect()
    }

    fn resize_updates(&self, state: &DragState, point: Point) -> Option<ShapeUpdates> {
        let corner = state.resize_corner?;
        let pointer_delta = point - state.start;

        if let Some((id, snap)) = state.single() {
            let patch = self.resize_single(snap, corner, pointer_delta)?;
            return Some(ShapeUpdates::from([(id, patch)]));
        }

        let bounds = state.start_bounds?;
        let center = bounds.center();
        let out = bounds.corner(corner) - center;
        let size_delta = self.diagonal_delta(out, pointer_delta)?;
        let max_dim = bounds.max_dimension();
        if max_dim < self.config.min_direction {
            tracing::warn!("Skipping resize frame: selection bounds are degenerate");
            return None;
        }
        let scale = ((max_dim + size_delta) / max_dim).max(self.config.min_group_scale);
        let anchor = center - out;

        Some(
            state
                .snapshots
                .iter()
                .map(|(id, snap)| {
                    let new_center = anchor + (snap.center() - anchor) * scale;
                    let new_size = (snap.size * scale).max(self.config.min_size);
                    let pos = new_center - Point::new(new_size / 2.0, new_size / 2.0);
                    (*id, ShapePatch::position(pos).with_size(new_size))
                })
                .collect(),
        )
    }

    /// Resizes one shape so the corner opposite `corner` stays fixed.
    fn resize_single(
        &self,
        snap: &ShapeSnapshot,
        corner: Corner,
        pointer_delta: Point,
    ) -> Option<ShapePatch> {
        if snap.size <= 0.0 {
            return None;
        }
        let center = snap.center();
        let out = snap.corner(corner) - center;
        let size_delta = self.diagonal_delta(out, pointer_delta)?;
        let anchor = center - out;
        let new_size = (snap.size + size_delta).max(self.config.min_size);
        let ratio = new_size / snap.size;
        let new_center = anchor + (center - anchor) * ratio;
        let pos = new_center - Point::new(new_size / 2.0, new_size / 2.0);
        Some(ShapePatch::position(pos).with_size(new_size))
    }

    /// Pointer movement projected on the center-to-corner direction, scaled
    /// to a change of box side.
    fn diagonal_delta(&self, out: Point, pointer_delta: Point) -> Option<f64> {
        if out.length() < self.config.min_direction {
            tracing::warn!("Skipping resize frame: corner direction is degenerate");
            return None;
        }
        let dir = out.normalized()?;
        Some(pointer_delta.dot(dir) * SQRT_2)
    }

    fn rotate_updates(
        &self,
        state: &DragState,
        point: Point,
        snap_to_grid: bool,
        store: &ShapeStore,
    ) -> Option<ShapeUpdates> {
        if let Some((id, snap)) = state.single() {
            let center = store.get(id)?.center();
            let delta = self.pointer_angle(center, state.start, point)?;
            let mut rotation = snap.rotation + flip_compensated(delta, snap.flip_x, snap.flip_y);
            if snap_to_grid {
                rotation = snap_angle(rotation, self.config.snap_angle);
            }
            return Some(ShapeUpdates::from([(id, ShapePatch::rotation(rotation))]));
        }

        let pivot = state.start_bounds?.center();
        let mut delta = self.pointer_angle(pivot, state.start, point)?;
        if snap_to_grid {
            delta = snap_angle(delta, self.config.snap_angle);
        }
        Some(
            state
                .snapshots
                .iter()
                .map(|(id, snap)| {
                    let new_center = rotate_point(snap.center(), pivot, delta);
                    let pos = new_center - Point::new(snap.size / 2.0, snap.size / 2.0);
                    let rotation = snap.rotation + flip_compensated(delta, snap.flip_x, snap.flip_y);
                    (*id, ShapePatch::position(pos).with_rotation(rotation))
                })
                .collect(),
        )
    }

    /// Signed angle swept by the pointer around `center` since the start.
    fn pointer_angle(&self, center: Point, start: Point, point: Point) -> Option<f64> {
        if (start - center).length() < self.config.min_direction
            || (point - center).length() < self.config.min_direction
        {
            tracing::warn!("Skipping rotate frame: pointer is on the pivot");
            return None;
        }
        Some(wrap_degrees(
            angle_between(center, point) - angle_between(center, start),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShapeKind;

    fn setup(n: usize) -> (ShapeStore, SelectionManager, Vec<ShapeId>) {
        let mut store = ShapeStore::new();
        let ids: Vec<ShapeId> = (0..n)
            .map(|i| store.add(ShapeKind::Square, Point::new(100.0 + i as f64 * 150.0, 100.0), 100.0))
            .collect();
        let mut selection = SelectionManager::new();
        for id in &ids {
            selection.add(*id);
        }
        (store, selection, ids)
    }

    #[test]
    fn test_begin_on_unselected_shape_moves_only_it() {
        let (store, mut selection, ids) = setup(2);
        selection.select_only(ids[1]);
        let mut drag = DragController::default();
        assert_eq!(
            drag.begin(DragTarget::Shape(ids[0]), Point::new(150.0, 150.0), &store, &selection),
            Some(DragMode::Move)
        );
        assert_eq!(drag.state().unwrap().snapshots.len(), 1);
    }

    #[test]
    fn test_resize_needs_selection() {
        let store = ShapeStore::new();
        let mut drag = DragController::default();
        let begun = drag.begin(
            DragTarget::Resize(Corner::Se),
            Point::ZERO,
            &store,
            &SelectionManager::new(),
        );
        assert!(begun.is_none());
        assert!(!drag.is_active());
    }

    #[test]
    fn test_move_axis_lock() {
        let (store, selection, ids) = setup(1);
        let mut drag = DragController::default();
        drag.begin(DragTarget::Shape(ids[0]), Point::new(150.0, 150.0), &store, &selection);
        let updates = drag
            .update(Point::new(180.0, 160.0), Modifiers::shift(), &store)
            .unwrap();
        let patch = &updates[&ids[0]];
        assert_eq!(patch.x, Some(130.0));
        assert_eq!(patch.y, Some(100.0));
    }

    #[test]
    fn test_rotate_on_pivot_is_skipped() {
        let (store, selection, _) = setup(1);
        let mut drag = DragController::default();
        drag.begin(DragTarget::Rotate, Point::new(150.0, 50.0), &store, &selection);
        assert!(drag
            .update(Point::new(150.0, 150.0), Modifiers::NONE, &store)
            .is_none());
    }

    #[test]
    fn test_cancel_restores_snapshots() {
        let (store, selection, ids) = setup(1);
        let mut drag = DragController::default();
        drag.begin(DragTarget::Resize(Corner::Se), Point::new(200.0, 200.0), &store, &selection);
        let restore = drag.cancel().unwrap();
        assert_eq!(
            restore[&ids[0]],
            ShapePatch::transform(Point::new(100.0, 100.0), 100.0, 0.0)
        );
        assert!(!drag.is_active());
    }
}
