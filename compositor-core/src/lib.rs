//! # Design Compositor Core
//!
//! Core logic for compositing AI-generated social media graphics.
//! Everything here is pure: no pixels, no fonts, no I/O.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               compositor-core               │
//! ├─────────────────────────────────────────────┤
//! │  Request         │  Text Layout Engine      │
//! │  - RenderRequest │  - Greedy word wrap      │
//! │  - Manifests     │  - Vertical centering    │
//! │  - Templates     │  - TextMeasure seam      │
//! ├─────────────────────────────────────────────┤
//! │  Design          │  Render State            │
//! │  - Constants     │  - Idle → Decoding →     │
//! │  - Font sizing   │    Painting → Ready      │
//! │  - Cover fit     │  - Failed                │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod design;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod request;
pub mod source;
pub mod state;
pub mod style;
pub mod template;
pub mod text;

pub use design::DesignConfig;
pub use error::{CompositorError, CompositorResult};
pub use geometry::{cover_crop, Point, Rect};
pub use layout::{break_lines, center_lines, wrap_text, FixedAdvance, TextMeasure, WrappedLine};
pub use request::{RenderRequest, RequestId, RequestManifest};
pub use state::{RenderJob, RenderState};
pub use style::{Color, FillStyle, FontWeight, TextAlign, TextBaseline, TextStyle};
pub use template::SocialTemplate;

/// Compositor core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
