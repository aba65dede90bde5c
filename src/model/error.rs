//! Error types for the masonry application shell.
//!
//! The layout core has no failure surface: incomplete measurements are deferred, not
//! reported (see [`crate::layout::engine::DeferReason`]). Errors here come from the
//! impure shell around it: reading scenes, loading configuration, logging and the
//! terminal.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error wrapping all shell failures
//!   - [`SceneError`] - Scene file reading and validation failures
//!   - [`crate::config::ConfigError`] - Config file read/parse failures
//!   - [`crate::logging::LoggingError`] - Tracing subscriber setup failures
//!   - [`crate::view::TuiError`] - Terminal preview failures
//!   - `serde_json::Error` - Frame serialization failures
//!   - `std::io::Error` - Output failures

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all shell failure modes.
///
/// Domain-specific errors convert via `From`, so `?` works throughout `main`.
///
/// # Examples
///
/// ```
/// use masonry_layout::model::error::{AppError, SceneError};
///
/// fn run() -> Result<(), AppError> {
///     let scene: Result<(), SceneError> = Err(SceneError::Empty);
///     scene?;
///     Ok(())
/// }
/// assert!(run().unwrap_err().to_string().contains("no items"));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// The scene could not be loaded. Fatal: there is nothing to lay out.
    #[error("Failed to load scene: {0}")]
    Scene(#[from] SceneError),

    /// A config file exists but is unreadable or invalid.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// The terminal preview failed.
    #[error("Terminal error: {0}")]
    Tui(#[from] crate::view::TuiError),

    /// The settled frame could not be serialized.
    #[error("Failed to serialize frame: {0}")]
    Output(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when reading a scene description.
///
/// A scene is the item sequence plus optional props. The item sequence is
/// required and must be non-empty, so an empty scene is rejected up front rather
/// than producing a layout that can never be measured.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The scene file could not be read.
    #[error("Failed to read scene file at {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The scene file is not valid scene JSON.
    #[error("Invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The scene has no items.
    #[error("Scene has no items; at least one item is required")]
    Empty,

    /// An item carries an unusable value.
    ///
    /// Heights must be finite and non-negative; ids must be non-empty and unique.
    #[error("Invalid item at position {position}: {reason}")]
    InvalidItem {
        /// 1-based document position of the item.
        position: usize,
        /// What is wrong with it.
        reason: String,
    },
}
