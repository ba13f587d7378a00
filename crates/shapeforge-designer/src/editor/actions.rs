//! Discrete editing actions. Each one that changes the document records
//! exactly one history checkpoint.

use std::collections::BTreeMap;

use shapeforge_core::{BindingError, KeyBindings};

use super::CanvasEditor;
use crate::geometry::{flip_compensated, Point};
use crate::keyboard::MirrorAxis;
use crate::model::{GroupId, Shape, ShapeId, ShapeKind, ShapePatch, ShapeUpdates};
use crate::selection_manager::SelectRequest;
use crate::shape_store::LayerMove;

impl CanvasEditor {
    /// Writes `updates` and commits them under `label`. Returns false if no
    /// shape was touched.
    fn apply_discrete(&mut self, updates: ShapeUpdates, label: &'static str) -> bool {
        if updates.is_empty() || self.store.apply_updates(&updates) == 0 {
            return false;
        }
        self.notify_shapes(&updates);
        let label = self.coordinator.discrete(label);
        self.commit(label);
        true
    }

    /// Builds one patch per selected shape.
    fn patch_selected(&self, patch: impl Fn(&Shape) -> ShapePatch) -> ShapeUpdates {
        self.selection
            .selected_shapes(&self.store)
            .into_iter()
            .map(|shape| (shape.id, patch(shape)))
            .collect()
    }

    /// Places a new shape on top of the stack and selects it.
    pub fn add_shape(&mut self, kind: ShapeKind, position: Point, size: f64) -> ShapeId {
        let size = size.max(self.config.min_shape_size);
        let id = self.store.add(kind, position, size);
        self.selection.select_only(id);
        self.notify_selection();
        tracing::info!("Added {} {}", kind, id);
        let label = self.coordinator.discrete("Add");
        self.commit(label);
        id
    }

    pub fn select(&mut self, request: SelectRequest) -> bool {
        let changed = self.selection.apply(&request);
        if changed {
            self.notify_selection();
        }
        changed
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.store);
        self.notify_selection();
    }

    pub fn select_group(&mut self, group: GroupId) {
        self.selection.select_group(&self.store, group);
        self.notify_selection();
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify_selection();
        }
    }

    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        let updates =
            self.patch_selected(|s| ShapePatch::position(Point::new(s.x + dx, s.y + dy)));
        self.apply_discrete(updates, "Nudge")
    }

    /// Turns every selected shape about its own center. The stored angle
    /// moves the opposite way for shapes with an odd mirror parity so the
    /// visible turn matches `degrees`.
    pub fn rotate_selected(&mut self, degrees: f64) -> bool {
        let updates = self.patch_selected(|s| {
            ShapePatch::rotation(s.rotation + flip_compensated(degrees, s.flip_x, s.flip_y))
        });
        self.apply_discrete(updates, "Rotate")
    }

    /// Toggles the mirror flag of each selected shape in place.
    pub fn mirror_selected(&mut self, axis: MirrorAxis) -> bool {
        let updates = self.patch_selected(|s| match axis {
            MirrorAxis::Horizontal => ShapePatch {
                flip_x: Some(!s.flip_x),
                ..ShapePatch::default()
            },
            MirrorAxis::Vertical => ShapePatch {
                flip_y: Some(!s.flip_y),
                ..ShapePatch::default()
            },
        });
        self.apply_discrete(updates, "Mirror")
    }

    pub fn set_color(&mut self, color_index: u8) -> bool {
        let updates = self.patch_selected(|s| {
            if s.color_index == color_index {
                ShapePatch::default()
            } else {
                ShapePatch {
                    color_index: Some(color_index),
                    ..ShapePatch::default()
                }
            }
        });
        let updates = updates.into_iter().filter(|(_, p)| !p.is_empty()).collect();
        self.apply_discrete(updates, "Color")
    }

    /// Copies the selected shapes, offset so they do not hide the
    /// originals, on top of the stack. The copies become the selection.
    /// Groups among the originals are recreated for the copies.
    pub fn duplicate_selected(&mut self) -> Vec<ShapeId> {
        let originals: Vec<_> = self
            .selection
            .selected_shapes(&self.store)
            .into_iter()
            .cloned()
            .collect();
        if originals.is_empty() {
            return Vec::new();
        }

        let offset = self.config.duplicate_offset;
        let mut copies = Vec::with_capacity(originals.len());
        let mut copied_groups: BTreeMap<GroupId, Vec<ShapeId>> = BTreeMap::new();
        for original in originals {
            let mut copy = original.clone();
            copy.id = ShapeId(self.store.generate_id());
            copy.x += offset;
            copy.y += offset;
            copy.group_id = None;
            if let Some(gid) = original.group_id {
                copied_groups.entry(gid).or_default().push(copy.id);
            }
            copies.push(copy.id);
            self.store.insert(copy);
        }
        for (gid, members) in copied_groups {
            let name = self
                .store
                .group(gid)
                .map(|g| format!("{} copy", g.name))
                .unwrap_or_else(|| "Group copy".to_string());
            self.store.create_group(name, &members);
        }

        self.selection.select_only(copies[0]);
        for id in &copies[1..] {
            self.selection.add(*id);
        }
        self.notify_selection();
        tracing::info!("Duplicated {} shape(s)", copies.len());
        let label = self.coordinator.discrete("Duplicate");
        self.commit(label);
        copies
    }

    /// Removes the selected shapes. Groups left without members go too.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.ids();
        let removed = ids
            .into_iter()
            .filter(|id| self.store.remove(*id).is_some())
            .count();
        self.selection.clear();
        self.notify_selection();
        if removed == 0 {
            return 0;
        }
        self.store.prune_groups();
        tracing::info!("Deleted {} shape(s)", removed);
        let label = self.coordinator.discrete("Delete");
        self.commit(label);
        removed
    }

    /// Groups the selection. Needs at least two selected shapes.
    pub fn group_selected(&mut self, name: Option<&str>) -> Option<GroupId> {
        let ids = self.selection.ids();
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Group {}", self.store.groups().count() + 1));
        let gid = self.store.create_group(name, &ids)?;
        let label = self.coordinator.discrete("Group");
        self.commit(label);
        Some(gid)
    }

    /// Dissolves every group that has a selected member.
    pub fn ungroup_selected(&mut self) -> usize {
        let groups: Vec<GroupId> = self
            .selection
            .selected_shapes(&self.store)
            .iter()
            .filter_map(|s| s.group_id)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        let released: usize = groups
            .into_iter()
            .map(|gid| self.store.ungroup(gid).len())
            .sum();
        if released > 0 {
            let label = self.coordinator.discrete("Ungroup");
            self.commit(label);
        }
        released
    }

    /// Deletes a group. Its members stay on the canvas.
    pub fn delete_group(&mut self, group: GroupId) -> bool {
        if self.store.group(group).is_none() {
            return false;
        }
        self.store.ungroup(group);
        let label = self.coordinator.discrete("Delete Group");
        self.commit(label);
        true
    }

    pub fn reorder_selected(&mut self, movement: LayerMove) -> bool {
        let ids = self.selection.ids();
        if !self.store.reorder_many(&ids, movement) {
            return false;
        }
        let label = self.coordinator.discrete("Reorder");
        self.commit(label);
        true
    }

    /// Restores the state before the last commit. Any gesture in progress
    /// is dropped.
    pub fn undo(&mut self) -> bool {
        self.drop_gestures();
        let label = self.history.undo_label().map(str::to_string);
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.store = snapshot.store.clone();
        self.selection = snapshot.selection.clone();
        self.after_restore(label.as_deref().unwrap_or_default(), "Undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        self.drop_gestures();
        let label = self.history.redo_label().map(str::to_string);
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.store = snapshot.store.clone();
        self.selection = snapshot.selection.clone();
        self.after_restore(label.as_deref().unwrap_or_default(), "Redo");
        true
    }

    fn drop_gestures(&mut self) {
        self.drag.end();
        self.gestures.cancel();
        self.pan_anchor = None;
        self.coordinator.discard_gesture();
    }

    fn after_restore(&mut self, label: &str, direction: &str) {
        self.selection.prune(&self.store);
        tracing::info!("{} '{}'", direction, label);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_history_restored(label);
            listener.on_selection_changed(&self.selection.ids());
        }
    }

    pub fn toggle_pan_mode(&mut self) -> bool {
        self.set_pan_mode(!self.pan_mode);
        self.pan_mode
    }

    pub fn set_pan_mode(&mut self, enabled: bool) {
        if self.pan_mode != enabled {
            tracing::debug!("Pan mode {}", if enabled { "on" } else { "off" });
        }
        self.pan_mode = enabled;
        if !enabled {
            self.pan_anchor = None;
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.viewport.zoom_in();
        if changed {
            self.notify_viewport();
        }
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.viewport.zoom_out();
        if changed {
            self.notify_viewport();
        }
        changed
    }

    pub fn reset_viewport(&mut self) {
        self.viewport.reset();
        self.notify_viewport();
    }

    /// Replaces the key binding table after validating it.
    pub fn set_key_bindings(&mut self, bindings: KeyBindings) -> Result<(), BindingError> {
        bindings.validate()?;
        self.config.key_bindings = bindings.clone();
        self.keyboard.set_bindings(bindings);
        Ok(())
    }
}
