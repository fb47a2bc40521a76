//! Error types for file I/O and presets.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Preset YAML could not be parsed or written.
    #[error("preset YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Decoded samples did not form a valid buffer.
    #[error(transparent)]
    Core(#[from] mirage_core::Error),

    /// Preset values rejected by the engine.
    #[error("invalid preset: {0}")]
    Preset(#[from] mirage_ops::OpsError),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
