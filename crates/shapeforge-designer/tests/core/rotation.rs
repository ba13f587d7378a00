use proptest::prelude::*;
use shapeforge_designer::drag::{DragController, DragTarget};
use shapeforge_designer::geometry::Point;
use shapeforge_designer::model::{ShapeId, ShapeKind};
use shapeforge_designer::selection_manager::SelectionManager;
use shapeforge_designer::shape_store::ShapeStore;
use shapeforge_designer::Modifiers;

/// Point on the circle of radius 100 around `center` at `degrees`
/// (screen convention: positive is clockwise).
fn on_circle(center: Point, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    Point::new(center.x + 100.0 * rad.cos(), center.y + 100.0 * rad.sin())
}

fn rotate_single(flip_x: bool, flip_y: bool, sweep: f64, modifiers: Modifiers) -> f64 {
    let mut store = ShapeStore::new();
    let id = store.add(ShapeKind::Triangle, Point::new(100.0, 100.0), 100.0);
    if let Some(shape) = store.get_mut(id) {
        shape.flip_x = flip_x;
        shape.flip_y = flip_y;
    }
    let mut selection = SelectionManager::new();
    selection.select_only(id);
    let center = store.get(id).unwrap().center();

    let mut drag = DragController::default();
    drag.begin(DragTarget::Rotate, on_circle(center, 0.0), &store, &selection);
    let updates = drag
        .update(on_circle(center, sweep), modifiers, &store)
        .unwrap();
    store.apply_updates(&updates);
    store.get(id).unwrap().rotation
}

#[test]
fn test_rotate_follows_pointer() {
    assert!((rotate_single(false, false, 30.0, Modifiers::NONE) - 30.0).abs() < 1e-9);
    assert!((rotate_single(false, false, -75.0, Modifiers::NONE) + 75.0).abs() < 1e-9);
}

#[test]
fn test_rotate_with_single_flip_is_inverted() {
    assert!((rotate_single(true, false, 30.0, Modifiers::NONE) + 30.0).abs() < 1e-9);
    assert!((rotate_single(false, true, 30.0, Modifiers::NONE) + 30.0).abs() < 1e-9);
}

#[test]
fn test_rotate_with_double_flip_is_not_inverted() {
    assert!((rotate_single(true, true, 30.0, Modifiers::NONE) - 30.0).abs() < 1e-9);
}

#[test]
fn test_rotate_snaps_with_shift() {
    assert_eq!(rotate_single(false, false, 7.4, Modifiers::shift()), 0.0);
    assert_eq!(rotate_single(false, false, 7.6, Modifiers::shift()), 15.0);
    assert_eq!(rotate_single(false, false, 52.0, Modifiers::shift()), 45.0);
}

#[test]
fn test_rotate_across_half_turn_does_not_jump() {
    // Sweeping from 0 to 190 degrees is a -170 turn, not +190.
    let rotation = rotate_single(false, false, 190.0, Modifiers::NONE);
    assert!((rotation + 170.0).abs() < 1e-9);
}

fn setup_multi(positions: &[(f64, f64)]) -> (ShapeStore, SelectionManager, Vec<ShapeId>) {
    let mut store = ShapeStore::new();
    let mut selection = SelectionManager::new();
    let ids: Vec<ShapeId> = positions
        .iter()
        .map(|&(x, y)| store.add(ShapeKind::Square, Point::new(x, y), 60.0))
        .collect();
    for id in &ids {
        selection.add(*id);
    }
    (store, selection, ids)
}

#[test]
fn test_multi_rotate_orbits_selection_center() {
    let (mut store, selection, ids) = setup_multi(&[(0.0, 0.0), (200.0, 0.0)]);
    let pivot = selection.bounds(&store).unwrap().center();
    assert_eq!(pivot, Point::new(130.0, 30.0));

    let mut drag = DragController::default();
    drag.begin(DragTarget::Rotate, on_circle(pivot, 0.0), &store, &selection);
    let updates = drag
        .update(on_circle(pivot, 90.0), Modifiers::NONE, &store)
        .unwrap();
    store.apply_updates(&updates);

    let left = store.get(ids[0]).unwrap();
    let right = store.get(ids[1]).unwrap();
    assert!((left.center().x - 130.0).abs() < 1e-9);
    assert!((left.center().y - (30.0 - 100.0)).abs() < 1e-9);
    assert!((right.center().x - 130.0).abs() < 1e-9);
    assert!((right.center().y - (30.0 + 100.0)).abs() < 1e-9);
    assert!((left.rotation - 90.0).abs() < 1e-9);
    assert!((right.rotation - 90.0).abs() < 1e-9);
}

#[test]
fn test_multi_rotate_flipped_member_turns_same_way_visually() {
    let (mut store, selection, ids) = setup_multi(&[(0.0, 0.0), (200.0, 0.0)]);
    if let Some(shape) = store.get_mut(ids[1]) {
        shape.flip_y = true;
    }
    let pivot = selection.bounds(&store).unwrap().center();
    let mut drag = DragController::default();
    drag.begin(DragTarget::Rotate, on_circle(pivot, 0.0), &store, &selection);
    let updates = drag
        .update(on_circle(pivot, 40.0), Modifiers::NONE, &store)
        .unwrap();
    store.apply_updates(&updates);
    assert!((store.get(ids[0]).unwrap().rotation - 40.0).abs() < 1e-9);
    assert!((store.get(ids[1]).unwrap().rotation + 40.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn test_multi_rotate_is_rigid(
        positions in prop::collection::vec((0.0f64..700.0, 0.0f64..700.0), 2..6),
        sweep in -179.0f64..179.0,
    ) {
        let (mut store, selection, ids) = setup_multi(&positions);
        let pivot = selection.bounds(&store).unwrap().center();
        let before: Vec<Point> = ids.iter().map(|id| store.get(*id).unwrap().center()).collect();

        let mut drag = DragController::default();
        drag.begin(DragTarget::Rotate, on_circle(pivot, 0.0), &store, &selection);
        let updates = drag.update(on_circle(pivot, sweep), Modifiers::NONE, &store).unwrap();
        store.apply_updates(&updates);

        let after: Vec<Point> = ids.iter().map(|id| store.get(*id).unwrap().center()).collect();
        for i in 0..ids.len() {
            prop_assert!((before[i].distance_to(pivot) - after[i].distance_to(pivot)).abs() < 1e-6);
            for j in (i + 1)..ids.len() {
                let d0 = before[i].distance_to(before[j]);
                let d1 = after[i].distance_to(after[j]);
                prop_assert!((d0 - d1).abs() < 1e-6, "pair {}-{}: {} vs {}", i, j, d0, d1);
            }
            let rotation = store.get(ids[i]).unwrap().rotation;
            prop_assert!((rotation - sweep).abs() < 1e-6);
        }
    }
}
