//! The design compositor.
//!
//! One [`Compositor`] serves any number of requests. Each call to
//! [`Compositor::composite`] is tagged with a fresh [`RequestId`]; once the
//! background has decoded, a render that is no longer the newest request is
//! abandoned. Only the newest finished render reaches the preview slot.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use compositor_core::layout::wrap_text;
use compositor_core::text::hashtag_line;
use compositor_core::{
    DesignConfig, Point, Rect, RenderJob, RenderRequest, RenderState, RequestId, TextStyle,
    WrappedLine,
};
use tokio::sync::watch;

use crate::error::{RenderError, RenderResult};
use crate::font::FontBook;
use crate::image::{BackgroundDecoder, DecodedImage, ImageCrateDecoder};
use crate::surface::RenderSurface;

/// Default bound on background decoding.
pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Compositor configuration.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Layout and paint constants.
    pub design: DesignConfig,
    /// How long to wait for a background to decode.
    pub decode_timeout: Duration,
    /// Extra directories to load fonts from.
    pub font_dirs: Vec<PathBuf>,
    /// Whether to load the fonts installed on this machine.
    pub load_system_fonts: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            design: DesignConfig::default(),
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
            font_dirs: Vec::new(),
            load_system_fonts: true,
        }
    }
}

/// Where each layer of a finished render was placed.
#[derive(Debug, Clone)]
pub struct CompositeLayout {
    /// The translucent overlay rectangle.
    pub overlay: Rect,
    /// Caption lines with their anchors.
    pub caption_lines: Vec<WrappedLine>,
    /// Style the caption was painted with.
    pub caption_style: TextStyle,
    /// The hashtag line as painted; empty when there were no tags.
    pub hashtag_text: String,
    /// Anchor of the hashtag line (center x, text bottom y).
    pub hashtag_anchor: Point,
    /// Style the hashtag line was painted with.
    pub hashtag_style: TextStyle,
    /// Whether glyphs were actually painted. `false` when no font face was
    /// available and the text layers were skipped.
    pub text_painted: bool,
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Request that produced this output.
    pub id: RequestId,
    /// Label used to name exports.
    pub label: String,
    /// The composited pixels.
    pub surface: Arc<RenderSurface>,
    /// Layer placement.
    pub layout: CompositeLayout,
}

/// Composites background, overlay, caption and hashtags into a raster.
///
/// Cloning is cheap; clones share fonts, the request counter and the preview
/// slot.
#[derive(Clone)]
pub struct Compositor {
    inner: Arc<Inner>,
}

struct Inner {
    config: CompositorConfig,
    fonts: Arc<FontBook>,
    decoder: Arc<dyn BackgroundDecoder>,
    latest_id: AtomicU64,
    state: watch::Sender<(RequestId, RenderState)>,
    preview: watch::Sender<Option<RenderOutput>>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("config", &self.inner.config)
            .field("fonts", &self.inner.fonts)
            .field("latest_id", &self.latest_id())
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Create a compositor, loading fonts as configured.
    #[must_use]
    pub fn new(config: CompositorConfig) -> Self {
        let mut fonts = if config.load_system_fonts {
            FontBook::system()
        } else {
            FontBook::new()
        };
        for dir in &config.font_dirs {
            fonts.load_dir(dir);
        }
        Self::with_fonts(config, fonts)
    }

    /// Create a compositor with an already populated font book.
    #[must_use]
    pub fn with_fonts(config: CompositorConfig, fonts: FontBook) -> Self {
        Self::with_decoder(config, fonts, ImageCrateDecoder)
    }

    /// Create a compositor with a custom background decoder.
    #[must_use]
    pub fn with_decoder(
        config: CompositorConfig,
        fonts: FontBook,
        decoder: impl BackgroundDecoder + 'static,
    ) -> Self {
        if fonts.face_count() == 0 {
            tracing::warn!("No font faces loaded; captions and hashtags will not be painted");
        }

        let (state, _) = watch::channel((RequestId::new(0), RenderState::Idle));
        let (preview, _) = watch::channel(None);

        Self {
            inner: Arc::new(Inner {
                config,
                fonts: Arc::new(fonts),
                decoder: Arc::new(decoder),
                latest_id: AtomicU64::new(0),
                state,
                preview,
            }),
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.inner.config
    }

    /// Fonts used for measuring and painting.
    #[must_use]
    pub fn fonts(&self) -> &FontBook {
        &self.inner.fonts
    }

    /// The most recently issued request id (`#0` before any request).
    #[must_use]
    pub fn latest_id(&self) -> RequestId {
        RequestId::new(self.inner.latest_id.load(Ordering::SeqCst))
    }

    /// Observe state transitions of the newest render.
    ///
    /// Transitions of a request older than the last published one are not
    /// sent, so a superseded render never overwrites its successor's state.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<(RequestId, RenderState)> {
        self.inner.state.subscribe()
    }

    /// Observe the preview slot; it holds the newest finished render.
    #[must_use]
    pub fn subscribe_preview(&self) -> watch::Receiver<Option<RenderOutput>> {
        self.inner.preview.subscribe()
    }

    /// Current contents of the preview slot.
    #[must_use]
    pub fn preview(&self) -> Option<RenderOutput> {
        self.inner.preview.borrow().clone()
    }

    /// Composite `request` into a new surface.
    ///
    /// Decoding runs on a blocking worker and is the only point at which this
    /// future waits. Painting happens only if this request is still the
    /// newest once decoding finishes.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Core`] if the request is invalid.
    /// - [`RenderError::Surface`] if the canvas cannot be allocated.
    /// - [`RenderError::Decode`] if the background cannot be decoded.
    /// - [`RenderError::DecodeTimeout`] if decoding takes too long.
    /// - [`RenderError::Superseded`] if a newer request was issued meanwhile.
    pub async fn composite(&self, request: RenderRequest) -> RenderResult<RenderOutput> {
        request.validate()?;
        let mut surface = RenderSurface::new(request.canvas_width, request.canvas_height)?;

        let id = self.issue_id();
        let mut job = RenderJob::new(id);
        self.transition(&mut job, RenderState::Decoding)?;

        let image = match self.decode(Arc::clone(&request.background_image)).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(request = %id, "Background decode failed: {e}");
                self.fail(&mut job);
                return Err(e);
            }
        };

        let latest = self.latest_id();
        if latest != id {
            tracing::debug!(request = %id, latest = %latest, "Discarding stale render");
            self.fail(&mut job);
            return Err(RenderError::Superseded { id, latest });
        }

        self.transition(&mut job, RenderState::Painting)?;
        let layout = match self.paint(&mut surface, &request, &image) {
            Ok(layout) => layout,
            Err(e) => {
                self.fail(&mut job);
                return Err(e);
            }
        };
        self.transition(&mut job, RenderState::Ready)?;

        let output = RenderOutput {
            id,
            label: request.template_label,
            surface: Arc::new(surface),
            layout,
        };
        self.publish_preview(&output);

        tracing::debug!(
            request = %id,
            width = output.surface.width(),
            height = output.surface.height(),
            lines = output.layout.caption_lines.len(),
            "Render ready"
        );
        Ok(output)
    }

    fn issue_id(&self) -> RequestId {
        RequestId::new(self.inner.latest_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn transition(&self, job: &mut RenderJob, next: RenderState) -> RenderResult<()> {
        job.advance(next)?;
        self.publish_state(job.id(), next);
        Ok(())
    }

    fn fail(&self, job: &mut RenderJob) {
        if job.fail() {
            self.publish_state(job.id(), RenderState::Failed);
        }
    }

    /// Observers only ever see the newest request; older ids are dropped.
    fn publish_state(&self, id: RequestId, state: RenderState) {
        let published = self.inner.state.send_if_modified(|current| {
            if id >= current.0 {
                *current = (id, state);
                true
            } else {
                false
            }
        });
        if !published {
            tracing::trace!(request = %id, ?state, "State of older request not published");
        }
    }

    async fn decode(&self, data: Arc<[u8]>) -> RenderResult<DecodedImage> {
        let decoder = Arc::clone(&self.inner.decoder);
        let limit = self.inner.config.decode_timeout;
        let task = tokio::task::spawn_blocking(move || decoder.decode(&data));

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(RenderError::Decode(format!(
                "decode worker failed: {join_error}"
            ))),
            Err(_) => Err(RenderError::DecodeTimeout(limit)),
        }
    }

    fn paint(
        &self,
        surface: &mut RenderSurface,
        request: &RenderRequest,
        image: &DecodedImage,
    ) -> RenderResult<CompositeLayout> {
        let design = &self.inner.config.design;
        let fonts = self.inner.fonts.as_ref();
        let (width, height) = (request.canvas_width, request.canvas_height);

        surface.draw_cover(image)?;

        let overlay = design.overlay_rect(width, height);
        surface.fill_rect(overlay, &design.overlay_fill());

        let caption_style = design.caption_style(width);
        let caption_lines = wrap_text(
            &request.caption,
            design.caption_anchor(width, height),
            design.caption_max_width(width),
            design.line_height(caption_style.size),
            fonts,
            &caption_style,
        );

        let mut text_painted = true;
        for line in &caption_lines {
            let anchor = Point::new(line.x, line.y);
            text_painted &= surface.fill_text(&line.content, anchor, &caption_style, fonts);
        }

        let hashtag_text = hashtag_line(&request.hashtags);
        let hashtag_style = design.hashtag_style(width);
        let hashtag_anchor = design.hashtag_anchor(width, height);
        if !hashtag_text.is_empty() {
            text_painted &=
                surface.fill_text(&hashtag_text, hashtag_anchor, &hashtag_style, fonts);
        }

        if !text_painted {
            tracing::warn!("No font face matched; text layers were skipped");
        }

        Ok(CompositeLayout {
            overlay,
            caption_lines,
            caption_style,
            hashtag_text,
            hashtag_anchor,
            hashtag_style,
            text_painted,
        })
    }

    fn publish_preview(&self, output: &RenderOutput) {
        let latest = self.latest_id();
        let published = self.inner.preview.send_if_modified(|slot| {
            let newer_than_slot = match slot {
                Some(current) => current.id < output.id,
                None => true,
            };
            if output.id == latest && newer_than_slot {
                *slot = Some(output.clone());
                true
            } else {
                false
            }
        });
        if !published {
            tracing::debug!(request = %output.id, "Render finished but preview kept newer result");
        }
    }
}
