//! Settings Persistence
//!
//! Locates the settings file and keeps the loaded [`Config`] together with
//! the path it came from.

use std::path::{Path, PathBuf};

use shapeforge_designer::EditorConfig;

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};

const APP_DIR: &str = "shapeforge";
const SETTINGS_FILE: &str = "settings.toml";

/// Default settings file: `<config dir>/shapeforge/settings.toml`
pub fn default_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
        })
}

/// Settings persistence layer
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
    config: Config,
}

impl SettingsPersistence {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist yet. A file that exists but fails to parse or
    /// validate is an error.
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            Config::load_from_file(&path)?
        } else {
            tracing::info!("No settings at {}, using defaults", path.display());
            Config::default()
        };
        Ok(Self { path, config })
    }

    /// Load settings from the default location
    pub fn load_default() -> SettingsResult<Self> {
        Self::load_or_default(default_path()?)
    }

    /// Save settings, creating the parent directory if needed
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.config.save_to_file(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Interaction parameters for a new editor
    pub fn editor_config(&self) -> EditorConfig {
        self.config.editor_config()
    }
}
