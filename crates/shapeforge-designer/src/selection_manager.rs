use crate::geometry::{Bounds, Point};
use crate::model::{GroupId, Shape, ShapeId};
use crate::shape_store::ShapeStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A request to change the selection, as produced by input controllers.
///
/// - `id: None` clears the selection.
/// - `toggle` flips membership of `id` and keeps the rest.
/// - `range` selects every id between the range anchor and `id` in
///   `ordered_ids` (a host-supplied order such as a layer list).
/// - Otherwise `id` becomes the only selected shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectRequest {
    pub id: Option<ShapeId>,
    #[serde(default)]
    pub toggle: bool,
    #[serde(default)]
    pub range: bool,
    #[serde(default)]
    pub ordered_ids: Vec<ShapeId>,
}

impl SelectRequest {
    /// Select only `id`.
    pub fn only(id: ShapeId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Toggle `id` in the current selection.
    pub fn toggle(id: ShapeId) -> Self {
        Self {
            id: Some(id),
            toggle: true,
            ..Self::default()
        }
    }

    /// Select the range from the anchor to `id` within `ordered_ids`.
    pub fn range(id: ShapeId, ordered_ids: Vec<ShapeId>) -> Self {
        Self {
            id: Some(id),
            range: true,
            ordered_ids,
            ..Self::default()
        }
    }

    /// Clear the selection.
    pub fn clear() -> Self {
        Self::default()
    }
}

/// Manages the set of selected shapes.
///
/// `SelectionManager` is responsible for:
/// - Tracking which shapes are selected
/// - Remembering the anchor used by range selection
/// - Applying [`SelectRequest`]s coming from pointer, touch and keyboard input
/// - Dropping ids whose shapes no longer exist
///
/// # Selection Model
///
/// - **Set semantics**: each shape id is selected at most once
/// - **Anchor**: the last shape selected by a plain or toggle request; range
///   requests extend from it without moving it
/// - **Weak ids**: the selection may briefly hold ids removed from the store;
///   readers skip them and [`SelectionManager::prune`] removes them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionManager {
    selected: BTreeSet<ShapeId>,
    anchor: Option<ShapeId>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use shapeforge_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert!(manager.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected ids in ascending order.
    pub fn ids(&self) -> Vec<ShapeId> {
        self.selected.iter().copied().collect()
    }

    /// Returns true if `id` is selected.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns the range anchor, if any.
    pub fn anchor(&self) -> Option<ShapeId> {
        self.anchor
    }

    /// Clears the selection and the range anchor.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Makes `id` the only selected shape.
    pub fn select_only(&mut self, id: ShapeId) {
        self.selected.clear();
        self.selected.insert(id);
        self.anchor = Some(id);
    }

    /// Adds `id` to the selection without touching the anchor.
    pub fn add(&mut self, id: ShapeId) {
        self.selected.insert(id);
    }

    /// Flips membership of `id`.
    ///
    /// # Returns
    ///
    /// `true` if `id` is selected afterwards.
    pub fn toggle(&mut self, id: ShapeId) -> bool {
        if self.selected.remove(&id) {
            if self.anchor == Some(id) {
                self.anchor = None;
            }
            false
        } else {
            self.selected.insert(id);
            self.anchor = Some(id);
            true
        }
    }

    /// Selects every id between the anchor and `id` in `ordered_ids`,
    /// inclusive, replacing the current selection.
    ///
    /// Falls back to [`SelectionManager::select_only`] when there is no
    /// anchor or either end is missing from `ordered_ids`.
    pub fn select_range(&mut self, id: ShapeId, ordered_ids: &[ShapeId]) {
        let ends = self.anchor.and_then(|anchor| {
            let a = ordered_ids.iter().position(|x| *x == anchor)?;
            let b = ordered_ids.iter().position(|x| *x == id)?;
            Some((a.min(b), a.max(b)))
        });
        match ends {
            Some((start, end)) => {
                self.selected = ordered_ids[start..=end].iter().copied().collect();
            }
            None => self.select_only(id),
        }
    }

    /// Selects every shape in the store.
    pub fn select_all(&mut self, store: &ShapeStore) {
        self.selected = store.iter().map(|s| s.id).collect();
    }

    /// Selects every member of a group, replacing the selection.
    pub fn select_group(&mut self, store: &ShapeStore, group: GroupId) {
        let members = store.group_members(group);
        self.anchor = members.first().copied();
        self.selected = members.into_iter().collect();
    }

    /// Applies a selection request.
    ///
    /// # Returns
    ///
    /// `true` if the selected set changed.
    pub fn apply(&mut self, request: &SelectRequest) -> bool {
        let before = self.selected.clone();
        match request.id {
            None => self.clear(),
            Some(id) if request.range => self.select_range(id, &request.ordered_ids),
            Some(id) if request.toggle => {
                self.toggle(id);
            }
            Some(id) => self.select_only(id),
        }
        before != self.selected
    }

    /// Removes ids whose shapes are no longer in the store.
    ///
    /// # Returns
    ///
    /// The number of ids removed.
    pub fn prune(&mut self, store: &ShapeStore) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| store.contains(*id));
        if self.anchor.is_some_and(|a| !store.contains(a)) {
            self.anchor = None;
        }
        before - self.selected.len()
    }

    /// Selected shapes that still exist, in draw order.
    pub fn selected_shapes<'a>(&self, store: &'a ShapeStore) -> Vec<&'a Shape> {
        store
            .draw_order()
            .into_iter()
            .filter(|id| self.selected.contains(id))
            .filter_map(|id| store.get(id))
            .collect()
    }

    /// Rotation-aware bounds of the current selection.
    pub fn bounds(&self, store: &ShapeStore) -> Option<Bounds> {
        selection_bounds(self.selected.iter().filter_map(|id| store.get(*id)))
    }
}

/// Axis-aligned box enclosing every shape's rotated frame.
///
/// # Returns
///
/// `None` when `shapes` is empty.
pub fn selection_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Bounds> {
    shapes
        .into_iter()
        .map(Shape::bounds)
        .reduce(|acc, b| acc.union(&b))
}

/// Finds the topmost visible shape whose rotated frame contains `point`.
///
/// # Arguments
///
/// * `store` - The shapes to test
/// * `point` - Query point in canvas units
pub fn find_shape_at_point(store: &ShapeStore, point: Point) -> Option<ShapeId> {
    store
        .hit_order()
        .into_iter()
        .filter_map(|id| store.get(id))
        .find(|shape| shape.visible && shape.contains_point(point))
        .map(|shape| shape.id)
}
