//! Render state machine.
//!
//! ```text
//! Idle ──► Decoding ──► Painting ──► Ready
//!              │            │
//!              └──► Failed ◄┘
//! ```
//!
//! `Ready` and `Failed` are terminal. A job is never reused; a new request
//! always starts a fresh [`RenderJob`].

use serde::{Deserialize, Serialize};

use crate::error::{CompositorError, CompositorResult};
use crate::request::RequestId;

/// Where a single render currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderState {
    /// Created, nothing started.
    #[default]
    Idle,
    /// Waiting for the background image to decode.
    Decoding,
    /// Drawing layers onto the surface.
    Painting,
    /// Surface complete and exportable.
    Ready,
    /// Render abandoned; no surface is exposed.
    Failed,
}

impl RenderState {
    /// Whether no further transitions are possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Whether `self -> next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Decoding)
                | (Self::Decoding, Self::Painting | Self::Failed)
                | (Self::Painting, Self::Ready | Self::Failed)
        )
    }
}

impl std::fmt::Display for RenderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Decoding => "decoding",
            Self::Painting => "painting",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the state of one tagged render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    id: RequestId,
    state: RenderState,
}

impl RenderJob {
    /// Start a job in `Idle`.
    #[must_use]
    pub fn new(id: RequestId) -> Self {
        Self {
            id,
            state: RenderState::Idle,
        }
    }

    /// The request this job renders.
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::InvalidTransition`] if the move is not
    /// allowed; the job keeps its current state.
    pub fn advance(&mut self, next: RenderState) -> CompositorResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(CompositorError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(request = %self.id, from = %self.state, to = %next, "render transition");
        self.state = next;
        Ok(())
    }

    /// Mark the job failed from any non-terminal state past `Idle`.
    ///
    /// Returns `false` if the job was already terminal or never started.
    pub fn fail(&mut self) -> bool {
        self.advance(RenderState::Failed).is_ok()
    }
}
