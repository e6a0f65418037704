//! Renderer error types.

use std::time::Duration;

use compositor_core::{CompositorError, RequestId};
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while compositing or exporting a design.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Request or state-machine error from the core crate.
    #[error(transparent)]
    Core(#[from] CompositorError),

    /// Background image bytes could not be decoded.
    #[error("Failed to decode background image: {0}")]
    Decode(String),

    /// Background image did not decode within the configured bound.
    #[error("Background image decode timed out after {0:?}")]
    DecodeTimeout(Duration),

    /// A newer request was issued while this one was decoding.
    #[error("Render {id} superseded by {latest}")]
    Superseded {
        /// The abandoned request.
        id: RequestId,
        /// The newest request at the time of the check.
        latest: RequestId,
    },

    /// Drawing surface could not be allocated.
    #[error("Surface error: {0}")]
    Surface(String),

    /// A font file or directory could not be loaded.
    #[error("Font error: {0}")]
    Font(String),

    /// Encoding or writing the exported image failed.
    #[error("Export failed: {0}")]
    Export(String),
}
