//! Error types for tartan.
//!
//! Thread and warp editing is infallible (bounds are clamped), so errors
//! only come from the edges of the library: loading and saving designs,
//! validating imported data and rendering preview images.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tartan operations.
#[derive(Error, Debug)]
pub enum TartanError {
    /// I/O failures while reading or writing a design directory
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed settings file
    #[error("settings error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data that parses but breaks a design constraint
    #[error("invalid design: {message}")]
    InvalidDesign { message: String },

    /// Design names become directory names
    #[error("invalid design name: {name:?}")]
    InvalidName { name: String },

    /// No design saved under this path
    #[error("design not found: {path}")]
    NotFound { path: PathBuf },

    /// Colour strings must be `#rrggbb` or `#rrggbbaa`
    #[error("invalid colour: {value:?}")]
    InvalidColour { value: String },

    /// SVG parse or rasterisation failures
    #[error("render error: {message}")]
    Render { message: String },
}

/// Type alias for Results using TartanError
pub type Result<T> = std::result::Result<T, TartanError>;

impl TartanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_design(message: impl Into<String>) -> Self {
        Self::InvalidDesign {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}
