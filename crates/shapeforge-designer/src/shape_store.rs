//! Shape storage.
//!
//! Shapes live in slots of a vector; a side table maps each stable
//! [`ShapeId`] to its slot so lookups stay O(1) while removed slots are
//! recycled. Z-indices are kept dense (`0..len`) and unique.

use crate::geometry::Point;
use crate::model::{Group, GroupId, Shape, ShapeId, ShapeKind, ShapeUpdates};
use std::collections::{BTreeMap, HashMap};

/// Layer reorder request for a single shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    ToFront,
    ToBack,
    Forward,
    Backward,
    /// Place at this position in draw order (0 = bottom), clamped.
    ToIndex(usize),
}

#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    slots: Vec<Option<Shape>>,
    index: HashMap<ShapeId, usize>,
    free: Vec<usize>,
    groups: BTreeMap<GroupId, Group>,
    next_id: u64,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Builds a store from existing shapes, keeping their ids and relative
    /// z-order. Shapes with duplicate ids after the first are dropped.
    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut store = Self::new();
        let mut shapes: Vec<Shape> = shapes.into_iter().collect();
        shapes.sort_by_key(|s| s.z_index);
        for shape in shapes {
            if store.contains(shape.id) {
                tracing::warn!("Dropping duplicate shape id {}", shape.id);
                continue;
            }
            store.next_id = store.next_id.max(shape.id.0 + 1);
            if let Some(gid) = shape.group_id {
                store.next_id = store.next_id.max(gid.0 + 1);
                store
                    .groups
                    .entry(gid)
                    .or_insert_with(|| Group::new(gid, format!("Group {}", gid.0)));
            }
            store.place(shape);
        }
        store.renumber(store.draw_order());
        store
    }

    /// Allocates a fresh id shared by shapes and groups.
    pub fn generate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    pub fn set_next_id(&mut self, id: u64) {
        self.next_id = id;
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.index
            .get(&id)
            .and_then(|&slot| self.slots.get(slot))
            .and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        let slot = *self.index.get(&id)?;
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Creates a shape of `kind` on top of the stack and returns its id.
    pub fn add(&mut self, kind: ShapeKind, position: Point, size: f64) -> ShapeId {
        let id = ShapeId(self.generate_id());
        self.insert(Shape::new(id, kind, position.x, position.y, size));
        id
    }

    /// Inserts a shape on top of the stack. An existing shape with the same
    /// id is replaced.
    pub fn insert(&mut self, mut shape: Shape) {
        self.remove(shape.id);
        self.next_id = self.next_id.max(shape.id.0 + 1);
        shape.z_index = self.len() as i32;
        self.place(shape);
    }

    fn place(&mut self, shape: Shape) {
        let id = shape.id;
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(shape);
                slot
            }
            None => {
                self.slots.push(Some(shape));
                self.slots.len() - 1
            }
        };
        self.index.insert(id, slot);
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let slot = self.index.remove(&id)?;
        let shape = self.slots.get_mut(slot).and_then(Option::take);
        self.free.push(slot);
        self.renumber(self.draw_order());
        shape
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.free.clear();
        self.groups.clear();
    }

    /// Applies a batch of patches. Ids no longer in the store are skipped.
    /// Returns the number of shapes updated.
    pub fn apply_updates(&mut self, updates: &ShapeUpdates) -> usize {
        let mut applied = 0;
        for (id, patch) in updates {
            match self.get_mut(*id) {
                Some(shape) => {
                    shape.apply(patch);
                    applied += 1;
                }
                None => tracing::debug!("Skipping update for missing {}", id),
            }
        }
        applied
    }

    /// Shape ids from bottom to top.
    pub fn draw_order(&self) -> Vec<ShapeId> {
        let mut shapes: Vec<&Shape> = self.iter().collect();
        shapes.sort_by_key(|s| (s.z_index, s.id));
        shapes.into_iter().map(|s| s.id).collect()
    }

    /// Shape ids from top to bottom, the order hit testing walks.
    pub fn hit_order(&self) -> Vec<ShapeId> {
        let mut order = self.draw_order();
        order.reverse();
        order
    }

    fn renumber(&mut self, order: Vec<ShapeId>) {
        for (z, id) in order.iter().enumerate() {
            if let Some(shape) = self.get_mut(*id) {
                shape.z_index = z as i32;
            }
        }
        self.refresh_group_slots();
    }

    fn refresh_group_slots(&mut self) {
        let mut lowest: BTreeMap<GroupId, i32> = BTreeMap::new();
        for shape in self.slots.iter().flatten() {
            if let Some(gid) = shape.group_id {
                let z = lowest.entry(gid).or_insert(shape.z_index);
                *z = (*z).min(shape.z_index);
            }
        }
        for (gid, group) in self.groups.iter_mut() {
            if let Some(z) = lowest.get(gid) {
                group.z_index = *z;
            }
        }
    }

    /// Moves one shape in the draw order, together with the rest of its
    /// group. Returns false when the shape is missing or already in place.
    pub fn reorder(&mut self, id: ShapeId, movement: LayerMove) -> bool {
        self.reorder_many(&[id], movement)
    }

    /// Moves a set of shapes together, keeping their relative order. A
    /// grouped shape brings its whole group, and steps skip over other
    /// groups as a unit so every group stays contiguous.
    pub fn reorder_many(&mut self, ids: &[ShapeId], movement: LayerMove) -> bool {
        let moving_groups: Vec<GroupId> = ids
            .iter()
            .filter_map(|id| self.get(*id).and_then(|s| s.group_id))
            .collect();
        let order = self.draw_order();
        let (moving, rest): (Vec<ShapeId>, Vec<ShapeId>) =
            order.iter().copied().partition(|id| {
                ids.contains(id)
                    || self
                        .get(*id)
                        .and_then(|s| s.group_id)
                        .is_some_and(|gid| moving_groups.contains(&gid))
            });
        if moving.is_empty() {
            return false;
        }

        let units = self.layer_units(&rest);
        let first = order.iter().position(|id| moving.contains(id)).unwrap_or(0);
        let starts: Vec<usize> = units
            .iter()
            .scan(0, |next, unit| {
                let start = *next;
                *next += unit.len();
                Some(start)
            })
            .collect();
        // Items below the moving block are exactly the first `first` of `rest`.
        let current = starts.iter().take_while(|&&start| start < first).count();
        let at = match movement {
            LayerMove::ToFront => units.len(),
            LayerMove::ToBack => 0,
            LayerMove::Forward => (current + 1).min(units.len()),
            LayerMove::Backward => current.saturating_sub(1),
            LayerMove::ToIndex(index) => starts.iter().take_while(|&&start| start < index).count(),
        };

        let mut reordered: Vec<ShapeId> = units[..at].concat();
        reordered.extend(moving);
        reordered.extend(units[at..].concat());
        if reordered == order {
            return false;
        }
        self.renumber(reordered);
        true
    }

    /// Splits a draw order into layer units: each group's run of members
    /// is one unit, every ungrouped shape is its own.
    fn layer_units(&self, order: &[ShapeId]) -> Vec<Vec<ShapeId>> {
        let mut units: Vec<Vec<ShapeId>> = Vec::new();
        let mut last_group = None;
        for id in order {
            let group = self.get(*id).and_then(|s| s.group_id);
            match units.last_mut() {
                Some(unit) if group.is_some() && group == last_group => unit.push(*id),
                _ => units.push(vec![*id]),
            }
            last_group = group;
        }
        units
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    /// Members of a group in draw order.
    pub fn group_members(&self, id: GroupId) -> Vec<ShapeId> {
        self.draw_order()
            .into_iter()
            .filter(|sid| self.get(*sid).and_then(|s| s.group_id) == Some(id))
            .collect()
    }

    /// Groups the given shapes. Members are pulled out of any previous
    /// group and stacked contiguously below the topmost member so the group
    /// occupies a single z slot. Needs at least two existing shapes.
    pub fn create_group(&mut self, name: impl Into<String>, ids: &[ShapeId]) -> Option<GroupId> {
        let members: Vec<ShapeId> = ids.iter().copied().filter(|id| self.contains(*id)).collect();
        if members.len() < 2 {
            return None;
        }
        let gid = GroupId(self.generate_id());
        self.groups.insert(gid, Group::new(gid, name));
        for id in &members {
            if let Some(shape) = self.get_mut(*id) {
                shape.group_id = Some(gid);
            }
        }

        let order = self.draw_order();
        let top = order.iter().rposition(|id| members.contains(id)).unwrap_or(0);
        let below_top = order[..top].iter().filter(|id| !members.contains(id)).count();
        let (grouped, mut rest): (Vec<ShapeId>, Vec<ShapeId>) =
            order.iter().copied().partition(|id| members.contains(id));
        rest.splice(below_top..below_top, grouped);
        self.renumber(rest);
        self.prune_groups();
        tracing::debug!("Created {} with {} members", gid, members.len());
        Some(gid)
    }

    /// Removes a group, clearing `group_id` on its members. Members survive.
    pub fn ungroup(&mut self, id: GroupId) -> Vec<ShapeId> {
        if self.groups.remove(&id).is_none() {
            return Vec::new();
        }
        let mut released = Vec::new();
        for shape in self.iter_mut() {
            if shape.group_id == Some(id) {
                shape.group_id = None;
                released.push(shape.id);
            }
        }
        released
    }

    /// Drops groups that no longer have members.
    pub fn prune_groups(&mut self) -> usize {
        let live: Vec<GroupId> = self.iter().filter_map(|s| s.group_id).collect();
        let before = self.groups.len();
        self.groups.retain(|gid, _| live.contains(gid));
        before - self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> (ShapeStore, Vec<ShapeId>) {
        let mut store = ShapeStore::new();
        let ids = (0..n)
            .map(|i| store.add(ShapeKind::Square, Point::new(i as f64 * 10.0, 0.0), 50.0))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_add_places_on_top() {
        let (store, ids) = store_with(3);
        assert_eq!(store.draw_order(), ids);
        assert_eq!(store.get(ids[2]).unwrap().z_index, 2);
    }

    #[test]
    fn test_remove_recycles_slot_and_keeps_ids_unique() {
        let (mut store, ids) = store_with(3);
        assert!(store.remove(ids[1]).is_some());
        assert_eq!(store.len(), 2);
        let new_id = store.add(ShapeKind::Circle, Point::ZERO, 10.0);
        assert!(!ids.contains(&new_id));
        assert_eq!(store.get(ids[2]).unwrap().z_index, 1);
        assert_eq!(store.get(new_id).unwrap().z_index, 2);
    }

    #[test]
    fn test_reorder() {
        let (mut store, ids) = store_with(3);
        assert!(store.reorder(ids[0], LayerMove::ToFront));
        assert_eq!(store.draw_order(), vec![ids[1], ids[2], ids[0]]);
        assert!(!store.reorder(ids[0], LayerMove::Forward));
        assert!(store.reorder(ids[0], LayerMove::Backward));
        assert_eq!(store.draw_order(), vec![ids[1], ids[0], ids[2]]);
        assert!(store.reorder(ids[2], LayerMove::ToIndex(0)));
        assert_eq!(store.draw_order(), vec![ids[2], ids[1], ids[0]]);
        assert!(store.reorder(ids[2], LayerMove::ToIndex(99)));
        assert_eq!(store.get(ids[2]).unwrap().z_index, 2);
    }

    #[test]
    fn test_reorder_many_keeps_relative_order() {
        let (mut store, ids) = store_with(4);
        assert!(store.reorder_many(&[ids[0], ids[2]], LayerMove::ToFront));
        assert_eq!(store.draw_order(), vec![ids[1], ids[3], ids[0], ids[2]]);
    }

    #[test]
    fn test_group_members_become_contiguous() {
        let (mut store, ids) = store_with(4);
        let gid = store.create_group("Pair", &[ids[0], ids[2]]).unwrap();
        assert_eq!(store.draw_order(), vec![ids[1], ids[0], ids[2], ids[3]]);
        assert_eq!(store.group_members(gid), vec![ids[0], ids[2]]);
        assert_eq!(store.group(gid).unwrap().z_index, 1);
    }

    #[test]
    fn test_reorder_moves_groups_as_a_block() {
        let (mut store, ids) = store_with(4);
        let gid = store.create_group("Pair", &[ids[0], ids[1]]).unwrap();
        let member_z = |store: &ShapeStore| -> Vec<i32> {
            store
                .group_members(gid)
                .iter()
                .map(|id| store.get(*id).unwrap().z_index)
                .collect()
        };

        assert!(store.reorder(ids[0], LayerMove::ToFront));
        assert_eq!(store.draw_order(), vec![ids[2], ids[3], ids[0], ids[1]]);
        assert_eq!(member_z(&store), vec![2, 3]);
        assert_eq!(store.group(gid).unwrap().z_index, 2);

        // Stepping past a group skips the whole group.
        assert!(store.reorder(ids[3], LayerMove::Forward));
        assert_eq!(store.draw_order(), vec![ids[2], ids[0], ids[1], ids[3]]);
        assert!(store.reorder(ids[3], LayerMove::Backward));
        assert_eq!(store.draw_order(), vec![ids[2], ids[3], ids[0], ids[1]]);

        assert!(store.reorder(ids[1], LayerMove::Backward));
        assert_eq!(member_z(&store), vec![1, 2]);
        assert!(store.reorder(ids[1], LayerMove::ToBack));
        assert_eq!(member_z(&store), vec![0, 1]);
        assert!(!store.reorder(ids[0], LayerMove::ToBack));
    }

    #[test]
    fn test_ungroup_keeps_members() {
        let (mut store, ids) = store_with(2);
        let gid = store.create_group("Pair", &ids).unwrap();
        let released = store.ungroup(gid);
        assert_eq!(released.len(), 2);
        assert_eq!(store.len(), 2);
        assert!(store.iter().all(|s| s.group_id.is_none()));
        assert!(store.group(gid).is_none());
    }

    #[test]
    fn test_apply_updates_skips_missing() {
        let (mut store, ids) = store_with(1);
        let mut updates = ShapeUpdates::new();
        updates.insert(ids[0], crate::model::ShapePatch::position(Point::new(5.0, 5.0)));
        updates.insert(ShapeId(999), crate::model::ShapePatch::position(Point::ZERO));
        assert_eq!(store.apply_updates(&updates), 1);
        assert_eq!(store.get(ids[0]).unwrap().x, 5.0);
    }

    #[test]
    fn test_from_shapes_keeps_ids_and_order() {
        let mut a = Shape::new(ShapeId(10), ShapeKind::Star, 0.0, 0.0, 40.0);
        a.z_index = 5;
        let mut b = Shape::new(ShapeId(3), ShapeKind::Heart, 0.0, 0.0, 40.0);
        b.z_index = 1;
        let mut store = ShapeStore::from_shapes(vec![a, b]);
        assert_eq!(store.draw_order(), vec![ShapeId(3), ShapeId(10)]);
        assert_eq!(store.get(ShapeId(10)).unwrap().z_index, 1);
        assert!(store.generate_id() > 10);
    }
}
