//! Editor settings file.
//!
//! Settings are grouped into sections:
//! - Interaction (size floor, touch timings, snapping, step sizes, history)
//! - Viewport (canvas size, zoom limits and step)
//! - Key bindings (action → key and modifiers)
//!
//! Files are JSON or TOML, chosen by extension.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shapeforge_core::constants::*;
use shapeforge_core::KeyBindings;
use shapeforge_designer::EditorConfig;

use crate::error::{ConfigError, ConfigResult, SettingsResult};

/// Settings for pointer, touch and keyboard interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Smallest side a shape may be resized to, canvas units
    pub min_shape_size: f64,
    /// Smallest scale factor of a multi-shape resize
    pub min_group_scale: f64,
    /// Touch hold time before a long-press fires
    pub long_press_ms: u64,
    /// Touch travel still counted as a tap, canvas units
    pub tap_threshold: f64,
    /// Rotation snap increment with shift held, degrees
    pub snap_angle_deg: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    pub rotate_step_deg: f64,
    pub rotate_step_large_deg: f64,
    /// Offset of duplicated shapes from their originals
    pub duplicate_offset: f64,
    /// Number of undo steps kept
    pub history_depth: usize,
    /// Handle grab radius, screen pixels
    pub handle_radius_px: f64,
    /// Distance of the rotate handle above the frame, screen pixels
    pub rotate_handle_offset_px: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            min_shape_size: MIN_SHAPE_SIZE,
            min_group_scale: MIN_GROUP_SCALE,
            long_press_ms: LONG_PRESS_MS,
            tap_threshold: TAP_MOVE_THRESHOLD,
            snap_angle_deg: SNAP_ANGLE_DEG,
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
            rotate_step_deg: ROTATE_STEP_DEG,
            rotate_step_large_deg: ROTATE_STEP_LARGE_DEG,
            duplicate_offset: DUPLICATE_OFFSET,
            history_depth: HISTORY_DEPTH,
            handle_radius_px: HANDLE_RADIUS_PX,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
        }
    }
}

/// Canvas and zoom settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub canvas_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }
}

/// Complete settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub interaction: InteractionSettings,
    pub viewport: ViewportSettings,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or_default().to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a `.json` or `.toml` file and validate it
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Validate and save config to a `.json` or `.toml` file
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, content)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let vp = &self.viewport;
        if vp.canvas_size <= 0.0 {
            return Err(ConfigError::out_of_range("viewport.canvas_size", vp.canvas_size));
        }
        if vp.min_zoom <= 0.0 {
            return Err(ConfigError::out_of_range("viewport.min_zoom", vp.min_zoom));
        }
        if vp.max_zoom < vp.min_zoom {
            return Err(ConfigError::out_of_range("viewport.max_zoom", vp.max_zoom));
        }
        if vp.zoom_step <= 0.0 {
            return Err(ConfigError::out_of_range("viewport.zoom_step", vp.zoom_step));
        }

        let ix = &self.interaction;
        let positive = [
            ("interaction.min_shape_size", ix.min_shape_size),
            ("interaction.min_group_scale", ix.min_group_scale),
            ("interaction.nudge_step", ix.nudge_step),
            ("interaction.nudge_step_large", ix.nudge_step_large),
            ("interaction.rotate_step_deg", ix.rotate_step_deg),
            ("interaction.rotate_step_large_deg", ix.rotate_step_large_deg),
            ("interaction.snap_angle_deg", ix.snap_angle_deg),
            ("interaction.handle_radius_px", ix.handle_radius_px),
        ];
        if let Some((key, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ConfigError::out_of_range(key, value));
        }
        if ix.tap_threshold < 0.0 {
            return Err(ConfigError::out_of_range("interaction.tap_threshold", ix.tap_threshold));
        }
        if ix.history_depth == 0 {
            return Err(ConfigError::out_of_range("interaction.history_depth", 0));
        }

        self.key_bindings.validate()?;
        Ok(())
    }

    /// Interaction parameters for a new `CanvasEditor`
    pub fn editor_config(&self) -> EditorConfig {
        let ix = &self.interaction;
        let vp = &self.viewport;
        EditorConfig {
            canvas_size: vp.canvas_size,
            min_zoom: vp.min_zoom,
            max_zoom: vp.max_zoom,
            zoom_step: vp.zoom_step,
            min_shape_size: ix.min_shape_size,
            min_group_scale: ix.min_group_scale,
            long_press_ms: ix.long_press_ms,
            tap_threshold: ix.tap_threshold,
            snap_angle_deg: ix.snap_angle_deg,
            nudge_step: ix.nudge_step,
            nudge_step_large: ix.nudge_step_large,
            rotate_step_deg: ix.rotate_step_deg,
            rotate_step_large_deg: ix.rotate_step_large_deg,
            duplicate_offset: ix.duplicate_offset,
            history_depth: ix.history_depth,
            handle_radius_px: ix.handle_radius_px,
            rotate_handle_offset_px: ix.rotate_handle_offset_px,
            key_bindings: self.key_bindings.clone(),
        }
    }
}
