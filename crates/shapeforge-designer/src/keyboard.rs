//! Keyboard action routing.

use shapeforge_core::constants::{
    NUDGE_STEP, NUDGE_STEP_LARGE, ROTATE_STEP_DEG, ROTATE_STEP_LARGE_DEG,
};
use shapeforge_core::{KeyAction, KeyBindings};

use crate::events::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorAxis {
    /// Flip left to right (toggles `flip_x`).
    Horizontal,
    /// Flip top to bottom (toggles `flip_y`).
    Vertical,
}

/// A routed key press, ready for the editor to execute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    Undo,
    Redo,
    Duplicate,
    Delete,
    Mirror(MirrorAxis),
    Nudge { dx: f64, dy: f64 },
    Rotate { degrees: f64 },
    TogglePanMode,
    /// Escape: abandon the active gesture.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    pub nudge: f64,
    pub nudge_large: f64,
    pub rotate: f64,
    pub rotate_large: f64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            nudge: NUDGE_STEP,
            nudge_large: NUDGE_STEP_LARGE,
            rotate: ROTATE_STEP_DEG,
            rotate_large: ROTATE_STEP_LARGE_DEG,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardRouter {
    bindings: KeyBindings,
    steps: StepConfig,
}

impl KeyboardRouter {
    pub fn new(bindings: KeyBindings, steps: StepConfig) -> Self {
        Self { bindings, steps }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Maps a key press to a command. Keys typed into a text field are
    /// never routed. Shift selects the large step for nudges and rotation.
    pub fn route(&self, event: &KeyEvent) -> Option<KeyCommand> {
        if event.in_text_field {
            return None;
        }
        if event.key == "Escape" {
            return Some(KeyCommand::Cancel);
        }
        let action = self.bindings.resolve(&event.key, event.modifiers)?;
        let large = event.modifiers.shift;
        let nudge = if large {
            self.steps.nudge_large
        } else {
            self.steps.nudge
        };
        let rotate = if large {
            self.steps.rotate_large
        } else {
            self.steps.rotate
        };

        let command = match action {
            KeyAction::Undo => KeyCommand::Undo,
            KeyAction::Redo => KeyCommand::Redo,
            KeyAction::Duplicate => KeyCommand::Duplicate,
            KeyAction::Delete => KeyCommand::Delete,
            KeyAction::MirrorHorizontal => KeyCommand::Mirror(MirrorAxis::Horizontal),
            KeyAction::MirrorVertical => KeyCommand::Mirror(MirrorAxis::Vertical),
            KeyAction::MoveUp => KeyCommand::Nudge { dx: 0.0, dy: -nudge },
            KeyAction::MoveDown => KeyCommand::Nudge { dx: 0.0, dy: nudge },
            KeyAction::MoveLeft => KeyCommand::Nudge { dx: -nudge, dy: 0.0 },
            KeyAction::MoveRight => KeyCommand::Nudge { dx: nudge, dy: 0.0 },
            KeyAction::RotateClockwise => KeyCommand::Rotate { degrees: rotate },
            KeyAction::RotateCounterClockwise => KeyCommand::Rotate { degrees: -rotate },
            KeyAction::TogglePanMode => KeyCommand::TogglePanMode,
        };
        tracing::debug!("Key '{}' routed to {}", event.key, action);
        Some(command)
    }
}
