//! Key binding table.
//!
//! Maps each [`KeyAction`] to a [`KeyBinding`] (key plus modifier flags).
//! Movement and rotation actions match on the key alone because their
//! modifier selects the step size; every other action matches its
//! modifiers exactly.

use crate::error::BindingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Discrete actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Undo,
    Redo,
    Duplicate,
    Delete,
    MirrorHorizontal,
    MirrorVertical,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    RotateClockwise,
    RotateCounterClockwise,
    TogglePanMode,
}

impl KeyAction {
    pub const ALL: [KeyAction; 13] = [
        KeyAction::Undo,
        KeyAction::Redo,
        KeyAction::Duplicate,
        KeyAction::Delete,
        KeyAction::MirrorHorizontal,
        KeyAction::MirrorVertical,
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::MoveLeft,
        KeyAction::MoveRight,
        KeyAction::RotateClockwise,
        KeyAction::RotateCounterClockwise,
        KeyAction::TogglePanMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::Undo => "undo",
            KeyAction::Redo => "redo",
            KeyAction::Duplicate => "duplicate",
            KeyAction::Delete => "delete",
            KeyAction::MirrorHorizontal => "mirror_horizontal",
            KeyAction::MirrorVertical => "mirror_vertical",
            KeyAction::MoveUp => "move_up",
            KeyAction::MoveDown => "move_down",
            KeyAction::MoveLeft => "move_left",
            KeyAction::MoveRight => "move_right",
            KeyAction::RotateClockwise => "rotate_clockwise",
            KeyAction::RotateCounterClockwise => "rotate_counter_clockwise",
            KeyAction::TogglePanMode => "toggle_pan_mode",
        }
    }

    /// True for actions whose modifier selects a step size instead of
    /// being part of the binding.
    pub fn matches_key_only(&self) -> bool {
        matches!(
            self,
            KeyAction::MoveUp
                | KeyAction::MoveDown
                | KeyAction::MoveLeft
                | KeyAction::MoveRight
                | KeyAction::RotateClockwise
                | KeyAction::RotateCounterClockwise
        )
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAction {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| BindingError::UnknownAction(s.to_string()))
    }
}

/// A key plus the modifiers that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyBinding {
    /// Binding for a bare key.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Key comparison ignores ASCII case so Shift+z and Shift+Z agree.
    pub fn key_matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    /// Key and all four modifier flags match.
    pub fn matches_exact(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key_matches(key)
            && self.shift == modifiers.shift
            && self.ctrl == modifiers.ctrl
            && self.alt == modifiers.alt
            && self.meta == modifiers.meta
    }

    fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.shift,
            ctrl: self.ctrl,
            alt: self.alt,
            meta: self.meta,
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.meta {
            f.write_str("Meta+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.key.chars().count() == 1 {
            write!(f, "{}", self.key.to_uppercase())
        } else {
            f.write_str(&self.key)
        }
    }
}

/// The full action → binding table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<KeyAction, KeyBinding>);

impl KeyBindings {
    /// An empty table; every action is unbound.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, action: KeyAction) -> Option<&KeyBinding> {
        self.0.get(&action)
    }

    pub fn set(&mut self, action: KeyAction, binding: KeyBinding) {
        self.0.insert(action, binding);
    }

    pub fn unbind(&mut self, action: KeyAction) -> Option<KeyBinding> {
        self.0.remove(&action)
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyAction, &KeyBinding)> {
        self.0.iter().map(|(action, binding)| (*action, binding))
    }

    /// Finds the action bound to `key` under `modifiers`.
    ///
    /// Exact-match actions are checked first so that Ctrl+D resolves to
    /// duplicate even if a key-only action were bound to plain D.
    pub fn resolve(&self, key: &str, modifiers: Modifiers) -> Option<KeyAction> {
        let exact = self
            .iter()
            .filter(|(action, _)| !action.matches_key_only())
            .find(|(_, binding)| binding.matches_exact(key, modifiers))
            .map(|(action, _)| action);
        if exact.is_some() {
            return exact;
        }
        self.iter()
            .filter(|(action, _)| action.matches_key_only())
            .find(|(_, binding)| binding.key_matches(key))
            .map(|(action, _)| action)
    }

    /// Rejects empty keys and ambiguous bindings.
    pub fn validate(&self) -> Result<(), BindingError> {
        let entries: Vec<(KeyAction, &KeyBinding)> = self.iter().collect();
        for (action, binding) in &entries {
            if binding.key.trim().is_empty() {
                return Err(BindingError::EmptyKey {
                    action: action.to_string(),
                });
            }
        }
        for (i, (first, a)) in entries.iter().enumerate() {
            for (second, b) in entries.iter().skip(i + 1) {
                let key_only = first.matches_key_only() || second.matches_key_only();
                let clash = if key_only {
                    first.matches_key_only() == second.matches_key_only()
                        && a.key.eq_ignore_ascii_case(&b.key)
                } else {
                    a.key.eq_ignore_ascii_case(&b.key) && a.modifiers() == b.modifiers()
                };
                if clash {
                    return Err(BindingError::Conflict {
                        binding: a.to_string(),
                        first: first.to_string(),
                        second: second.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut table = Self::empty();
        table.set(KeyAction::Undo, KeyBinding::key("z").with_ctrl());
        table.set(KeyAction::Redo, KeyBinding::key("z").with_ctrl().with_shift());
        table.set(KeyAction::Duplicate, KeyBinding::key("d").with_ctrl());
        table.set(KeyAction::Delete, KeyBinding::key("Delete"));
        table.set(KeyAction::MirrorHorizontal, KeyBinding::key("h"));
        table.set(KeyAction::MirrorVertical, KeyBinding::key("v"));
        table.set(KeyAction::MoveUp, KeyBinding::key("ArrowUp"));
        table.set(KeyAction::MoveDown, KeyBinding::key("ArrowDown"));
        table.set(KeyAction::MoveLeft, KeyBinding::key("ArrowLeft"));
        table.set(KeyAction::MoveRight, KeyBinding::key("ArrowRight"));
        table.set(KeyAction::RotateClockwise, KeyBinding::key("e"));
        table.set(KeyAction::RotateCounterClockwise, KeyBinding::key("q"));
        table.set(KeyAction::TogglePanMode, KeyBinding::key("p"));
        table
    }
}
