//! Error type shared by the camera, tracer and renderer.

use thiserror::Error;

/// Errors that can occur while setting up or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid camera parameters: {reason}")]
    InvalidCameraParameters { reason: String },

    #[error("Ray batch is empty")]
    EmptyRayBatch,

    #[error("Invalid spawn depth {depth} (expected 0..={max})")]
    InvalidDepth { depth: i64, max: u32 },

    #[error("Image size {width}x{height} is too large")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("Invalid object {index}: {reason}")]
    InvalidObject { index: usize, reason: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene description error: {0}")]
    Description(#[from] serde_json::Error),
}

impl RenderError {
    pub(crate) fn camera(reason: impl Into<String>) -> Self {
        Self::InvalidCameraParameters {
            reason: reason.into(),
        }
    }
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
