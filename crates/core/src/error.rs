//! Error types for the field-studio core.
//!
//! Numeric evaluation never fails; these errors only come from the
//! fallible surfaces around it (grid construction, source registry
//! lookups, scene construction, export).

use thiserror::Error;

/// Errors produced by field-studio operations.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Width or height was zero (or overflowed) when building a grid or scene.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A scene name was not recognized by the registry.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// A source id was not present in the registry.
    #[error("unknown source id: {0}")]
    UnknownSource(String),

    /// A source list in scene params could not be decoded.
    #[error("invalid sources: {0}")]
    InvalidSources(String),

    /// An I/O failure while exporting a frame.
    #[error("i/o error: {0}")]
    Io(String),
}
