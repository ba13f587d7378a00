//! Undo/redo history for the canvas.
//!
//! [`History`] stores whole-canvas snapshots. [`HistoryCoordinator`] decides
//! when a snapshot is taken: once per discrete action, and once at the end
//! of a continuous gesture that changed something.

use std::mem;

use shapeforge_core::constants::HISTORY_DEPTH;

use crate::selection_manager::SelectionManager;
use crate::shape_store::ShapeStore;

/// Everything undo restores.
#[derive(Debug, Clone, Default)]
pub struct CanvasSnapshot {
    pub store: ShapeStore,
    pub selection: SelectionManager,
}

/// A labelled state on one of the stacks.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub label: String,
    pub snapshot: CanvasSnapshot,
}

/// Bounded undo/redo stacks of canvas snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// State as of the most recent commit, undo or redo.
    current: CanvasSnapshot,
    max_depth: usize,
}

impl History {
    /// Create with the default depth
    pub fn new(initial: CanvasSnapshot) -> Self {
        Self::with_depth(initial, HISTORY_DEPTH)
    }

    /// Create with custom maximum undo depth
    pub fn with_depth(initial: CanvasSnapshot, max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            current: initial,
            max_depth: max_depth.max(1),
        }
    }

    /// Record `state` as the result of the change named `label`
    pub fn commit(&mut self, label: impl Into<String>, state: CanvasSnapshot) {
        let label = label.into();
        let before = mem::replace(&mut self.current, state);
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry {
            label,
            snapshot: before,
        });
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Step back one change and return the state to restore
    pub fn undo(&mut self) -> Option<&CanvasSnapshot> {
        let entry = self.undo_stack.pop()?;
        let after = mem::replace(&mut self.current, entry.snapshot);
        self.redo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: after,
        });
        Some(&self.current)
    }

    /// Re-apply the last undone change and return the state to restore
    pub fn redo(&mut self) -> Option<&CanvasSnapshot> {
        let entry = self.redo_stack.pop()?;
        let before = mem::replace(&mut self.current, entry.snapshot);
        self.undo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: before,
        });
        Some(&self.current)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the change undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.label.as_str())
    }

    /// Label of the change redo would re-apply
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    /// Labels of every undoable change, oldest first
    pub fn labels(&self) -> Vec<&str> {
        self.undo_stack.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn current(&self) -> &CanvasSnapshot {
        &self.current
    }

    /// Forget all history and start again from `state`
    pub fn clear(&mut self, state: CanvasSnapshot) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current = state;
    }
}

/// Tracks whether the gesture in progress has changed the canvas.
///
/// Intermediate frames only mark the gesture dirty; the single commit
/// happens when the gesture finishes.
#[derive(Debug, Clone, Default)]
pub struct HistoryCoordinator {
    pending: Option<&'static str>,
    commits: usize,
}

impl HistoryCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that the active gesture applied an update.
    pub fn record_update(&mut self, label: &'static str) {
        if self.pending != Some(label) {
            tracing::trace!("Gesture now pending as '{}'", label);
        }
        self.pending = Some(label);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Closes the active gesture. Returns the label to commit, if the
    /// gesture changed anything.
    pub fn finish_gesture(&mut self) -> Option<&'static str> {
        let label = self.pending.take()?;
        self.commits += 1;
        Some(label)
    }

    /// Closes the active gesture without a commit.
    pub fn discard_gesture(&mut self) {
        self.pending = None;
    }

    /// Counts a discrete action's commit.
    pub fn discrete(&mut self, label: &'static str) -> &'static str {
        self.commits += 1;
        label
    }

    /// Number of commits this coordinator has requested.
    pub fn commit_count(&self) -> usize {
        self.commits
    }
}
