//! Error handling for ShapeForge
//!
//! Interaction code never fails: degenerate input is clamped or skipped.
//! Errors only arise at the edges, when binding tables are validated and
//! when configuration or replay scripts are read from disk.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Key binding table error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// Action name is not part of the binding table
    #[error("Unknown key action: {0}")]
    UnknownAction(String),

    /// Binding with an empty key
    #[error("Empty key for action '{action}'")]
    EmptyKey {
        /// The action whose binding is empty.
        action: String,
    },

    /// Two exact-match actions share the same key and modifiers
    #[error("Binding '{binding}' is assigned to both '{first}' and '{second}'")]
    Conflict {
        /// Display form of the shared binding.
        binding: String,
        /// The first action using it.
        first: String,
        /// The second action using it.
        second: String,
    },
}

/// Main error type for ShapeForge
#[derive(Error, Debug)]
pub enum Error {
    /// Key binding error
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a binding error
    pub fn is_binding_error(&self) -> bool {
        matches!(self, Error::Binding(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
