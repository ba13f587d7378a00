use shapeforge_designer::geometry::Point;
use shapeforge_designer::history::{CanvasSnapshot, History, HistoryCoordinator};
use shapeforge_designer::model::ShapeKind;
use shapeforge_designer::selection_manager::SelectionManager;
use shapeforge_designer::shape_store::ShapeStore;

fn snapshot_with(count: usize) -> CanvasSnapshot {
    let mut store = ShapeStore::new();
    for i in 0..count {
        store.add(ShapeKind::Square, Point::new(i as f64 * 10.0, 0.0), 50.0);
    }
    CanvasSnapshot {
        store,
        selection: SelectionManager::new(),
    }
}

#[test]
fn test_history_creation() {
    let history = History::new(snapshot_with(0));
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.undo_count(), 0);
    assert!(history.labels().is_empty());
}

#[test]
fn test_undo_redo_roundtrip() {
    let mut history = History::new(snapshot_with(0));
    history.commit("Add", snapshot_with(1));
    history.commit("Add", snapshot_with(2));
    assert_eq!(history.undo_count(), 2);

    assert_eq!(history.undo().unwrap().store.len(), 1);
    assert_eq!(history.undo().unwrap().store.len(), 0);
    assert!(history.undo().is_none());
    assert_eq!(history.redo_count(), 2);

    assert_eq!(history.redo().unwrap().store.len(), 1);
    assert_eq!(history.current().store.len(), 1);
    assert_eq!(history.redo_label(), Some("Add"));
}

#[test]
fn test_commit_clears_redo() {
    let mut history = History::new(snapshot_with(0));
    history.commit("Add", snapshot_with(1));
    history.undo();
    assert!(history.can_redo());
    history.commit("Delete", snapshot_with(0));
    assert!(!history.can_redo());
    assert_eq!(history.labels(), vec!["Delete"]);
}

#[test]
fn test_depth_limit_drops_oldest() {
    let mut history = History::with_depth(snapshot_with(0), 3);
    for i in 1..=5 {
        history.commit(format!("Step {}", i), snapshot_with(i));
    }
    assert_eq!(history.undo_count(), 3);
    assert_eq!(history.labels(), vec!["Step 3", "Step 4", "Step 5"]);
    while history.undo().is_some() {}
    assert_eq!(history.current().store.len(), 2);
}

#[test]
fn test_clear_resets_baseline() {
    let mut history = History::new(snapshot_with(0));
    history.commit("Add", snapshot_with(1));
    history.clear(snapshot_with(3));
    assert!(!history.can_undo());
    assert_eq!(history.current().store.len(), 3);
}

#[test]
fn test_coordinator_commits_gesture_once() {
    let mut coordinator = HistoryCoordinator::new();
    assert_eq!(coordinator.finish_gesture(), None);
    for _ in 0..50 {
        coordinator.record_update("Move");
    }
    assert!(coordinator.is_pending());
    assert_eq!(coordinator.finish_gesture(), Some("Move"));
    assert_eq!(coordinator.finish_gesture(), None);
    assert_eq!(coordinator.commit_count(), 1);
}

#[test]
fn test_coordinator_discard_and_discrete() {
    let mut coordinator = HistoryCoordinator::new();
    coordinator.record_update("Resize");
    coordinator.discard_gesture();
    assert!(!coordinator.is_pending());
    assert_eq!(coordinator.finish_gesture(), None);
    assert_eq!(coordinator.discrete("Nudge"), "Nudge");
    assert_eq!(coordinator.commit_count(), 1);
}
