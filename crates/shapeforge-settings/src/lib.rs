//! ShapeForge Settings Crate
//!
//! Loads, validates and saves the editor settings file and turns it into the
//! designer crate's [`shapeforge_designer::EditorConfig`].

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, InteractionSettings, ViewportSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::{default_path, SettingsPersistence};
