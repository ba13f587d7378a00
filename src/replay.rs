//! Scripted replay of input events through a [`CanvasEditor`].
//!
//! A script lists the starting shapes and a sequence of input events in the
//! same JSON form the designer crate serializes them in:
//!
//! ```json
//! {
//!   "shapes": [{ "id": 1, "kind": "square", "x": 100, "y": 100, "size": 100 }],
//!   "events": [
//!     { "type": "pointer_down", "position": { "x": 150, "y": 150 } },
//!     { "type": "pointer_move", "position": { "x": 180, "y": 170 } },
//!     { "type": "pointer_up", "position": { "x": 180, "y": 170 } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use shapeforge_core::{Error, KeyBindings, Result};
use shapeforge_designer::{
    CanvasEditor, EditorConfig, InputEvent, SelectRequest, Shape, ShapeId, Viewport,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub shapes: Vec<Shape>,
    /// Shapes selected before the first event.
    pub selection: Vec<ShapeId>,
    /// Replaces the configured key bindings for this run.
    pub key_bindings: Option<KeyBindings>,
    pub events: Vec<InputEvent>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Editor state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Shapes in draw order, bottom first.
    pub shapes: Vec<Shape>,
    pub selection: Vec<ShapeId>,
    pub viewport: Viewport,
    /// Labels of every undoable change, oldest first.
    pub history: Vec<String>,
}

impl ReplayReport {
    fn from_editor(editor: &CanvasEditor) -> Self {
        Self {
            shapes: editor.shapes().into_iter().cloned().collect(),
            selection: editor.selection().ids(),
            viewport: editor.viewport().clone(),
            history: editor
                .history()
                .labels()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs `script` through a fresh editor and reports the final state.
pub fn replay(config: EditorConfig, script: &ReplayScript) -> Result<ReplayReport> {
    let mut editor = CanvasEditor::with_shapes(config, script.shapes.iter().cloned());
    if let Some(bindings) = &script.key_bindings {
        editor.set_key_bindings(bindings.clone())?;
    }
    for id in &script.selection {
        if editor.shape(*id).is_none() {
            return Err(Error::config(format!("selected {} is not in the script", id)));
        }
        if !editor.selection().contains(*id) {
            editor.select(SelectRequest::toggle(*id));
        }
    }
    tracing::info!(
        "Replaying {} event(s) over {} shape(s)",
        script.events.len(),
        editor.store().len()
    );
    for event in &script.events {
        editor.handle_event(event);
    }
    Ok(ReplayReport::from_editor(&editor))
}
