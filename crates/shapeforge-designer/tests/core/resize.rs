use proptest::prelude::*;
use shapeforge_designer::drag::{DragController, DragTarget};
use shapeforge_designer::geometry::{Corner, Point};
use shapeforge_designer::model::{ShapeId, ShapeKind};
use shapeforge_designer::selection_manager::SelectionManager;
use shapeforge_designer::shape_store::ShapeStore;
use shapeforge_designer::Modifiers;

fn setup_single(
    kind: ShapeKind,
    size: f64,
    rotation: f64,
    flip_x: bool,
    flip_y: bool,
) -> (ShapeStore, SelectionManager, ShapeId) {
    let mut store = ShapeStore::new();
    let id = store.add(kind, Point::new(300.0, 300.0), size);
    if let Some(shape) = store.get_mut(id) {
        shape.rotation = rotation;
        shape.flip_x = flip_x;
        shape.flip_y = flip_y;
    }
    let mut selection = SelectionManager::new();
    selection.select_only(id);
    (store, selection, id)
}

/// Drags `corner` by `delta` and returns the shape after the frame.
fn resize_by(
    store: &mut ShapeStore,
    selection: &SelectionManager,
    id: ShapeId,
    corner: Corner,
    delta: Point,
) {
    let start = store.get(id).unwrap().corner(corner);
    let mut drag = DragController::default();
    drag.begin(DragTarget::Resize(corner), start, store, selection)
        .unwrap();
    let updates = drag.update(start + delta, Modifiers::NONE, store).unwrap();
    store.apply_updates(&updates);
}

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6,
        "{} != {}",
        a,
        b
    );
}

#[test]
fn test_resize_se_corner_of_unrotated_square() {
    let (mut store, selection, id) = setup_single(ShapeKind::Square, 100.0, 0.0, false, false);
    resize_by(&mut store, &selection, id, Corner::Se, Point::new(20.0, 20.0));
    let shape = store.get(id).unwrap();
    // Projection of (20, 20) on the diagonal, scaled back to a side change.
    assert!((shape.size - 140.0).abs() < 1e-9);
    assert!((shape.x - 300.0).abs() < 1e-9);
    assert!((shape.y - 300.0).abs() < 1e-9);
}

#[test]
fn test_resize_floors_at_minimum_size() {
    let (mut store, selection, id) = setup_single(ShapeKind::Square, 100.0, 0.0, false, false);
    let anchor = store.get(id).unwrap().corner(Corner::Nw);
    resize_by(&mut store, &selection, id, Corner::Se, Point::new(-500.0, -500.0));
    let shape = store.get(id).unwrap();
    assert_eq!(shape.size, 20.0);
    assert_close(shape.corner(Corner::Nw), anchor);
}

#[test]
fn test_resize_perpendicular_drag_keeps_size() {
    let (mut store, selection, id) = setup_single(ShapeKind::Square, 100.0, 0.0, false, false);
    resize_by(&mut store, &selection, id, Corner::Se, Point::new(30.0, -30.0));
    assert!((store.get(id).unwrap().size - 100.0).abs() < 1e-9);
}

#[test]
fn test_resize_anchor_fixed_at_fixed_rotations() {
    for rotation in [0.0, 45.0, 90.0, 137.0] {
        for (flip_x, flip_y) in [(false, false), (true, false), (false, true), (true, true)] {
            for corner in Corner::ALL {
                let (mut store, selection, id) =
                    setup_single(ShapeKind::Ellipse, 120.0, rotation, flip_x, flip_y);
                let anchor = store.get(id).unwrap().corner(corner.opposite());
                resize_by(&mut store, &selection, id, corner, Point::new(35.0, -12.0));
                assert_close(store.get(id).unwrap().corner(corner.opposite()), anchor);
            }
        }
    }
}

#[test]
fn test_multi_resize_scales_about_opposite_bounds_corner() {
    let mut store = ShapeStore::new();
    let a = store.add(ShapeKind::Square, Point::new(100.0, 100.0), 100.0);
    let b = store.add(ShapeKind::Square, Point::new(300.0, 100.0), 100.0);
    let mut selection = SelectionManager::new();
    selection.select_only(a);
    selection.add(b);
    let before = selection.bounds(&store).unwrap();

    let mut drag = DragController::default();
    let start = before.corner(Corner::Se);
    drag.begin(DragTarget::Resize(Corner::Se), start, &store, &selection)
        .unwrap();
    let updates = drag
        .update(start + Point::new(30.0, 10.0), Modifiers::NONE, &store)
        .unwrap();
    store.apply_updates(&updates);

    let after = selection.bounds(&store).unwrap();
    assert!((after.min_x - before.min_x).abs() < 1e-6);
    assert!((after.min_y - before.min_y).abs() < 1e-6);
    let scale = store.get(a).unwrap().size / 100.0;
    assert!(scale > 1.0);
    assert!((store.get(b).unwrap().size / 100.0 - scale).abs() < 1e-9);
    assert!((after.width() - before.width() * scale).abs() < 1e-6);
    assert!((after.height() - before.height() * scale).abs() < 1e-6);
}

#[test]
fn test_multi_resize_scale_has_floor() {
    let mut store = ShapeStore::new();
    let a = store.add(ShapeKind::Square, Point::new(0.0, 0.0), 400.0);
    let b = store.add(ShapeKind::Square, Point::new(400.0, 0.0), 400.0);
    let mut selection = SelectionManager::new();
    selection.select_only(a);
    selection.add(b);
    let start = selection.bounds(&store).unwrap().corner(Corner::Se);

    let mut drag = DragController::default();
    drag.begin(DragTarget::Resize(Corner::Se), start, &store, &selection)
        .unwrap();
    let updates = drag
        .update(start - Point::new(5000.0, 5000.0), Modifiers::NONE, &store)
        .unwrap();
    store.apply_updates(&updates);
    assert!((store.get(a).unwrap().size - 40.0).abs() < 1e-9);
    assert!((store.get(b).unwrap().size - 40.0).abs() < 1e-9);
}

fn rotation_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(45.0),
        Just(90.0),
        Just(137.0),
        -360.0f64..360.0,
    ]
}

proptest! {
    #[test]
    fn test_resize_keeps_opposite_corner_fixed(
        kind_index in 0usize..ShapeKind::ALL.len(),
        corner_index in 0usize..4,
        rotation in rotation_strategy(),
        flip_x in any::<bool>(),
        flip_y in any::<bool>(),
        size in 20.0f64..300.0,
        dx in -200.0f64..200.0,
        dy in -200.0f64..200.0,
    ) {
        let kind = ShapeKind::ALL[kind_index];
        let corner = Corner::ALL[corner_index];
        let (mut store, selection, id) = setup_single(kind, size, rotation, flip_x, flip_y);
        let anchor = store.get(id).unwrap().corner(corner.opposite());

        resize_by(&mut store, &selection, id, corner, Point::new(dx, dy));

        let shape = store.get(id).unwrap();
        let moved = shape.corner(corner.opposite());
        prop_assert!((moved.x - anchor.x).abs() < 1e-6, "x drift {} vs {}", moved.x, anchor.x);
        prop_assert!((moved.y - anchor.y).abs() < 1e-6, "y drift {} vs {}", moved.y, anchor.y);
        prop_assert!(shape.size >= 20.0);
        prop_assert_eq!(shape.rotation, rotation);
    }
}
