//! Error types for compositor core operations.

use thiserror::Error;

use crate::state::RenderState;

/// Result type for compositor core operations.
pub type CompositorResult<T> = Result<T, CompositorError>;

/// Errors that can occur while building or tracking a render.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// The render request violates an invariant (e.g. a zero dimension).
    #[error("Invalid render request: {0}")]
    InvalidRequest(String),

    /// The background image payload could not be turned into bytes.
    #[error("Invalid image source: {0}")]
    ImageSource(String),

    /// No social template with the given name exists.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// A render job was asked to move to a state it cannot reach.
    #[error("Illegal render transition: {from} -> {to}")]
    InvalidTransition {
        /// State the job was in.
        from: RenderState,
        /// State that was requested.
        to: RenderState,
    },

    /// Manifest serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
