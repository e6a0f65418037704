//! Raster drawing surface.
//!
//! A thin wrapper over a `tiny_skia::Pixmap` exposing the three primitives
//! the compositor needs: draw a background image, fill a rectangle and fill
//! a line of text.

use compositor_core::{FillStyle, Point, Rect, TextStyle};
use image::RgbaImage;
use tiny_skia::{ColorU8, FillRule, Paint, Pixmap, PixmapPaint, Transform};

use crate::error::{RenderError, RenderResult};
use crate::font::FontBook;
use crate::image::{cover_fit, DecodedImage};

/// An RGBA raster the size of the output canvas.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    pixmap: Pixmap,
}

impl RenderSurface {
    /// Allocate a transparent surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if either dimension is zero or the
    /// allocation is too large.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Surface(format!("cannot allocate {width}x{height} surface"))
        })?;
        Ok(Self { pixmap })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// The underlying pixmap.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Draw `image` scaled and cropped to cover the whole surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if the fitted image cannot be staged.
    pub fn draw_cover(&mut self, image: &DecodedImage) -> RenderResult<()> {
        let fitted = cover_fit(&image.pixels, self.width(), self.height());
        let source = pixmap_from_rgba(&fitted)?;
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Fill `rect` with a solid color. Empty rectangles draw nothing.
    pub fn fill_rect(&mut self, rect: Rect, fill: &FillStyle) {
        let Some(area) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        else {
            return;
        };
        let paint = solid_paint(fill.color);
        self.pixmap
            .fill_rect(area, &paint, Transform::identity(), None);
    }

    /// Fill one line of text anchored at `anchor`.
    ///
    /// Returns `false` if no font face is available; nothing is drawn then.
    pub fn fill_text(
        &mut self,
        text: &str,
        anchor: Point,
        style: &TextStyle,
        fonts: &FontBook,
    ) -> bool {
        let Some(run) = fonts.text_run(text, anchor, style) else {
            return false;
        };
        if let Some(path) = run.path {
            let paint = solid_paint(style.color);
            self.pixmap.fill_path(
                &path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        true
    }

    /// Straight-alpha RGBA of the pixel at (`x`, `y`).
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Copy into a straight-alpha `image` buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if the buffer cannot be built.
    pub fn to_rgba_image(&self) -> RenderResult<RgbaImage> {
        let mut raw = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        RgbaImage::from_raw(self.width(), self.height(), raw)
            .ok_or_else(|| RenderError::Surface("pixel buffer size mismatch".to_string()))
    }

    /// Encode the surface as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}

fn solid_paint(color: compositor_core::Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(tiny_skia::Color::from_rgba8(
        color.r,
        color.g,
        color.b,
        color.alpha_u8(),
    ));
    paint.anti_alias = true;
    paint
}

fn pixmap_from_rgba(image: &RgbaImage) -> RenderResult<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height()).ok_or_else(|| {
        RenderError::Surface(format!(
            "cannot stage {}x{} image",
            image.width(),
            image.height()
        ))
    })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}
