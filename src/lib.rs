//! # ShapeForge
//!
//! Interactive transform and gesture engine for a square canvas of
//! primitive shapes.
//!
//! ## Architecture
//!
//! ShapeForge is organized as a workspace with multiple crates:
//!
//! 1. **shapeforge-core** - Interaction constants, key binding table, errors
//! 2. **shapeforge-designer** - Shapes, selection, drag and touch gestures,
//!    keyboard routing, viewport, undo history
//! 3. **shapeforge-settings** - Settings file loading, validation and saving
//! 4. **shapeforge** - Replay harness that drives the editor from a script
//!
//! ## Features
//!
//! - **Pointer**: move, corner resize with a fixed opposite corner, rotate
//!   with shift snapping, for one shape or a whole selection
//! - **Touch**: tap, drag, long-press, two-finger pinch and twist
//! - **Keyboard**: remappable bindings for nudge, rotate, mirror, duplicate,
//!   delete, undo and redo
//! - **History**: one undo step per discrete action or completed gesture

pub mod replay;

pub use shapeforge_core as core;
pub use shapeforge_designer as designer;
pub use shapeforge_settings as settings;

pub use replay::{replay, ReplayReport, ReplayScript};
pub use shapeforge_core::{Error, Result};
pub use shapeforge_designer::{CanvasEditor, EditorConfig, InputEvent, Shape, ShapeKind};
pub use shapeforge_settings::{Config, SettingsPersistence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr, leaving stdout for reports
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging with one JSON object per line on stderr
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).json())
        .try_init()?;

    Ok(())
}
