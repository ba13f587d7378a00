use shapeforge_designer::drag::{DragController, DragMode, DragTarget};
use shapeforge_designer::geometry::Point;
use shapeforge_designer::model::{ShapeId, ShapeKind};
use shapeforge_designer::selection_manager::SelectionManager;
use shapeforge_designer::shape_store::ShapeStore;
use shapeforge_designer::Modifiers;

fn setup() -> (ShapeStore, SelectionManager, Vec<ShapeId>) {
    let mut store = ShapeStore::new();
    let ids = vec![
        store.add(ShapeKind::Circle, Point::new(50.0, 50.0), 80.0),
        store.add(ShapeKind::Hexagon, Point::new(300.0, 120.0), 100.0),
        store.add(ShapeKind::Arrow, Point::new(500.0, 400.0), 120.0),
    ];
    let mut selection = SelectionManager::new();
    for id in &ids {
        selection.add(*id);
    }
    (store, selection, ids)
}

#[test]
fn test_multi_move_applies_same_offset() {
    let (mut store, selection, ids) = setup();
    let before: Vec<Point> = ids
        .iter()
        .map(|id| {
            let s = store.get(*id).unwrap();
            Point::new(s.x, s.y)
        })
        .collect();

    let mut drag = DragController::default();
    let mode = drag.begin(
        DragTarget::Shape(ids[1]),
        Point::new(350.0, 170.0),
        &store,
        &selection,
    );
    assert_eq!(mode, Some(DragMode::Move));

    for step in 1..=10 {
        let p = Point::new(350.0 + 2.5 * step as f64, 170.0 - step as f64);
        let updates = drag.update(p, Modifiers::NONE, &store).unwrap();
        store.apply_updates(&updates);
    }

    for (id, start) in ids.iter().zip(before) {
        let s = store.get(*id).unwrap();
        assert!((s.x - (start.x + 25.0)).abs() < 1e-9);
        assert!((s.y - (start.y - 10.0)).abs() < 1e-9);
    }
}

#[test]
fn test_move_result_independent_of_frame_count() {
    let (mut a, selection, ids) = setup();
    let mut b = a.clone();

    let mut drag = DragController::default();
    drag.begin(DragTarget::Shape(ids[0]), Point::new(90.0, 90.0), &a, &selection);
    let updates = drag
        .update(Point::new(140.0, 60.0), Modifiers::NONE, &a)
        .unwrap();
    a.apply_updates(&updates);

    drag.begin(DragTarget::Shape(ids[0]), Point::new(90.0, 90.0), &b, &selection);
    for x in [95.0, 120.0, 200.0, 140.0] {
        let updates = drag.update(Point::new(x, 60.0), Modifiers::NONE, &b).unwrap();
        b.apply_updates(&updates);
    }

    for id in &ids {
        assert_eq!(a.get(*id), b.get(*id));
    }
}

#[test]
fn test_move_preserves_size_and_rotation() {
    let (mut store, selection, ids) = setup();
    if let Some(shape) = store.get_mut(ids[2]) {
        shape.rotation = 33.0;
    }
    let mut drag = DragController::default();
    drag.begin(DragTarget::Shape(ids[2]), Point::new(560.0, 460.0), &store, &selection);
    let updates = drag
        .update(Point::new(500.0, 500.0), Modifiers::NONE, &store)
        .unwrap();
    store.apply_updates(&updates);
    let shape = store.get(ids[2]).unwrap();
    assert_eq!(shape.size, 120.0);
    assert_eq!(shape.rotation, 33.0);
}

#[test]
fn test_cancel_restores_start_state() {
    let (mut store, selection, ids) = setup();
    let original = store.clone();
    let mut drag = DragController::default();
    drag.begin(DragTarget::Shape(ids[0]), Point::new(90.0, 90.0), &store, &selection);
    let updates = drag
        .update(Point::new(300.0, 10.0), Modifiers::NONE, &store)
        .unwrap();
    store.apply_updates(&updates);

    let restore = drag.cancel().unwrap();
    store.apply_updates(&restore);
    assert!(!drag.is_active());
    for id in &ids {
        assert_eq!(store.get(*id), original.get(*id));
    }
}
