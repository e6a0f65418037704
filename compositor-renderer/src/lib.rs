//! # Compositor Renderer
//!
//! Raster side of the design compositor, built on tiny-skia.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   spawn_blocking    ┌──────────────┐
//! │ RenderRequest│ ──────────────────► │ decode image │  (bounded by timeout)
//! └──────────────┘                     └──────┬───────┘
//!                                             │ stale? ─► Superseded
//!                                             ▼
//!        ┌──────────────────────────────────────────────────────┐
//!        │ RenderSurface                                        │
//!        │  1. background, cover-fitted                         │
//!        │  2. black overlay, 50%, inset 5% of width            │
//!        │  3. caption, wrapped + vertically centered           │
//!        │  4. hashtag line, bottom centered                    │
//!        └──────────────────────────┬───────────────────────────┘
//!                                   ▼
//!                 preview slot (latest only) + DesignExporter
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compositor;
pub mod error;
pub mod export;
pub mod font;
pub mod image;
pub mod surface;

pub use crate::image::{BackgroundDecoder, DecodedImage, ImageCrateDecoder};
pub use compositor::{
    CompositeLayout, Compositor, CompositorConfig, RenderOutput, DEFAULT_DECODE_TIMEOUT,
};
pub use error::{RenderError, RenderResult};
pub use export::{preview_thumbnail, DesignExporter, ExportConfig, ExportFormat};
pub use font::FontBook;
pub use surface::RenderSurface;
