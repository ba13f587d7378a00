//! # ShapeForge Core
//!
//! Core types shared by every ShapeForge crate:
//! - Interaction constants (canvas size, size floor, zoom limits, timings)
//! - Key binding table types used by the keyboard router and the settings file
//! - The unified error type

pub mod bindings;
pub mod constants;
pub mod error;

pub use bindings::{KeyAction, KeyBinding, KeyBindings, Modifiers};
pub use error::{BindingError, Error, Result};
