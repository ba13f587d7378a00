//! # ShapeForge Designer
//!
//! Interactive transform and gesture engine for the ShapeForge canvas. It
//! turns raw pointer, touch, keyboard and wheel input into shape mutations,
//! viewport changes and undo checkpoints.
//!
//! ## Core Components
//!
//! ### Document
//! - **Shapes**: ten primitive kinds in square boxes with rotation and mirroring
//! - **Shape Store**: slot arena with stable ids, z-ordering and flat groups
//! - **Selection**: selected set, range anchor and rotation-aware bounds
//!
//! ### Interaction
//! - **Drag**: pointer move / resize / rotate of one shape or a selection
//! - **Gestures**: tap, drag, long-press and two-finger pinch
//! - **Keyboard**: configurable bindings for discrete actions
//! - **Viewport**: point-anchored zoom and pan
//!
//! ### History
//! - **Snapshots**: bounded undo/redo of whole-canvas snapshots
//! - **Coordinator**: one checkpoint per action or completed gesture
//!
//! ## Architecture
//!
//! ```text
//! Input events
//!   └── CanvasEditor (one handler per input class)
//!         ├── DragController / GestureController / KeyboardRouter
//!         │     └── Effects (shape patches, selection, viewport, menus)
//!         ├── ShapeStore + SelectionManager
//!         ├── Viewport
//!         └── History + HistoryCoordinator
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use shapeforge_designer::{CanvasEditor, PointerEvent, Point, ShapeKind};
//!
//! let mut editor = CanvasEditor::default();
//! let id = editor.add_shape(ShapeKind::Star, Point::new(100.0, 100.0), 100.0);
//!
//! editor.pointer_down(&PointerEvent::new(150.0, 150.0));
//! editor.pointer_move(&PointerEvent::new(180.0, 170.0));
//! editor.pointer_up(&PointerEvent::new(180.0, 170.0));
//!
//! let shape = editor.shape(id).unwrap();
//! assert_eq!((shape.x, shape.y), (130.0, 120.0));
//! assert_eq!(editor.history().labels(), vec!["Add", "Move"]);
//! ```

pub mod config;
pub mod drag;
pub mod editor;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod keyboard;
pub mod model;
pub mod selection_manager;
pub mod shape_store;
pub mod viewport;

pub use config::EditorConfig;
pub use drag::{DragConfig, DragController, DragMode, DragState, DragTarget};
pub use editor::{CanvasEditor, EditorListener, HandleSet, HitTarget};
pub use events::{
    Effect, InputEvent, KeyEvent, PointerButton, PointerEvent, TouchEvent, TouchPoint, WheelEvent,
};
pub use geometry::{Bounds, Corner, Point};
pub use gesture::{GestureConfig, GestureContext, GestureController, PinchTarget, TouchState};
pub use history::{CanvasSnapshot, History, HistoryCoordinator, HistoryEntry};
pub use keyboard::{KeyCommand, KeyboardRouter, MirrorAxis, StepConfig};
pub use model::{Group, GroupId, Shape, ShapeId, ShapeKind, ShapePatch, ShapeSnapshot, ShapeUpdates};
pub use selection_manager::{find_shape_at_point, selection_bounds, SelectRequest, SelectionManager};
pub use shape_store::{LayerMove, ShapeStore};
pub use viewport::Viewport;

pub use shapeforge_core::{KeyAction, KeyBinding, KeyBindings, Modifiers};
