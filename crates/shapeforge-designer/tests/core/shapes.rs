use shapeforge_designer::geometry::{Corner, Point};
use shapeforge_designer::model::{ShapeKind, ShapePatch, ShapeUpdates};
use shapeforge_designer::selection_manager::{find_shape_at_point, SelectionManager};
use shapeforge_designer::shape_store::{LayerMove, ShapeStore};

#[test]
fn test_non_square_kinds_fit_inside_box() {
    for kind in ShapeKind::ALL {
        let (w, h) = kind.dimensions(100.0);
        assert!(w <= 100.0 + 1e-9 && h <= 100.0 + 1e-9, "{:?}", kind);
        assert!((w.max(h) - 100.0).abs() < 1e-9, "{:?}", kind);
    }
    assert_eq!(ShapeKind::Rectangle.dimensions(100.0), (100.0, 50.0));
    assert_eq!(ShapeKind::Diamond.dimensions(100.0), (75.0, 100.0));
}

#[test]
fn test_rotated_corners_of_rectangle() {
    let mut store = ShapeStore::new();
    let id = store.add(ShapeKind::Rectangle, Point::new(0.0, 0.0), 100.0);
    store.get_mut(id).unwrap().rotation = 90.0;
    let shape = store.get(id).unwrap();
    // 100 x 50 frame turned a quarter clockwise about (50, 50).
    let nw = shape.corner(Corner::Nw);
    assert!((nw.x - 75.0).abs() < 1e-9);
    assert!((nw.y - 0.0).abs() < 1e-9);
    let bounds = shape.bounds();
    assert!((bounds.width() - 50.0).abs() < 1e-9);
    assert!((bounds.height() - 100.0).abs() < 1e-9);
}

#[test]
fn test_hit_test_respects_rotation_and_z_order() {
    let mut store = ShapeStore::new();
    let bottom = store.add(ShapeKind::Square, Point::new(0.0, 0.0), 100.0);
    let top = store.add(ShapeKind::Rectangle, Point::new(0.0, 0.0), 100.0);
    assert_eq!(find_shape_at_point(&store, Point::new(50.0, 50.0)), Some(top));
    // Outside the 100 x 50 rectangle but inside the square below it.
    assert_eq!(find_shape_at_point(&store, Point::new(50.0, 10.0)), Some(bottom));

    store.get_mut(top).unwrap().rotation = 90.0;
    assert_eq!(find_shape_at_point(&store, Point::new(50.0, 10.0)), Some(top));
    assert_eq!(find_shape_at_point(&store, Point::new(10.0, 50.0)), Some(bottom));

    store.get_mut(bottom).unwrap().visible = false;
    assert_eq!(find_shape_at_point(&store, Point::new(10.0, 50.0)), None);
}

#[test]
fn test_apply_updates_skips_missing_ids() {
    let mut store = ShapeStore::new();
    let id = store.add(ShapeKind::Star, Point::new(0.0, 0.0), 100.0);
    let gone = store.add(ShapeKind::Star, Point::new(0.0, 0.0), 100.0);
    store.remove(gone);
    let updates = ShapeUpdates::from([
        (id, ShapePatch::position(Point::new(5.0, 6.0))),
        (gone, ShapePatch::position(Point::new(7.0, 8.0))),
    ]);
    assert_eq!(store.apply_updates(&updates), 1);
    assert_eq!(store.get(id).unwrap().x, 5.0);
    assert!(!store.contains(gone));
}

#[test]
fn test_z_indices_stay_dense() {
    let mut store = ShapeStore::new();
    let ids: Vec<_> = (0..4)
        .map(|i| store.add(ShapeKind::Circle, Point::new(i as f64 * 10.0, 0.0), 50.0))
        .collect();
    store.remove(ids[1]);
    store.reorder(ids[0], LayerMove::ToFront);
    let mut z: Vec<i32> = store.iter().map(|s| s.z_index).collect();
    z.sort();
    assert_eq!(z, vec![0, 1, 2]);
    assert_eq!(store.draw_order(), vec![ids[2], ids[3], ids[0]]);
    assert_eq!(store.hit_order(), vec![ids[0], ids[3], ids[2]]);
}

#[test]
fn test_group_members_are_contiguous() {
    let mut store = ShapeStore::new();
    let ids: Vec<_> = (0..4)
        .map(|i| store.add(ShapeKind::Square, Point::new(i as f64 * 120.0, 0.0), 100.0))
        .collect();
    let gid = store.create_group("Pair", &[ids[0], ids[2]]).unwrap();
    assert_eq!(store.draw_order(), vec![ids[1], ids[0], ids[2], ids[3]]);
    assert_eq!(store.group_members(gid), vec![ids[0], ids[2]]);
    assert_eq!(store.group(gid).unwrap().z_index, 1);

    let mut selection = SelectionManager::new();
    selection.select_group(&store, gid);
    assert_eq!(selection.len(), 2);

    assert_eq!(store.ungroup(gid).len(), 2);
    assert!(store.group(gid).is_none());
    assert!(store.iter().all(|s| s.group_id.is_none()));
}

#[test]
fn test_group_needs_two_members() {
    let mut store = ShapeStore::new();
    let id = store.add(ShapeKind::Square, Point::ZERO, 100.0);
    assert!(store.create_group("Solo", &[id]).is_none());
    assert_eq!(store.groups().count(), 0);
}
