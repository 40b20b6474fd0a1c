//! Error types for viewer operations.

use thiserror::Error;

/// Errors that can occur during explicit viewer operations (crop, export,
/// config import).
///
/// Event handlers never return these; a missing image or surface during
/// routine pointer/wheel handling is a silent no-op instead.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// No image has been loaded into the viewer
    #[error("no image loaded")]
    NoImage,

    /// The viewer surface has not reported its size yet
    #[error("viewer surface not ready")]
    SurfaceNotReady,

    /// Image decode/encode error from the raster backend
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Crop region is degenerate or lies outside the image
    #[error("invalid crop region: {message}")]
    InvalidCrop {
        /// Description of the crop error
        message: String,
    },

    /// Flatten/export failure
    #[error("export failed: {message}")]
    Export {
        /// Description of the export error
        message: String,
    },

    /// Config file version mismatch
    #[error("config version mismatch: expected {expected}, found {found}")]
    ConfigVersion {
        /// Version this build understands
        expected: u32,
        /// Version found in the file
        found: u32,
    },
}

impl ViewerError {
    /// Create an invalid crop error with a message.
    pub fn invalid_crop(message: impl Into<String>) -> Self {
        Self::InvalidCrop {
            message: message.into(),
        }
    }

    /// Create an export error with a message.
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}
