//! Design export to PNG/JPEG bytes, download files and preview thumbnails.

use std::path::{Path, PathBuf};

use compositor_core::template::preview_size;
use compositor_core::text::download_file_name;
use image::{ImageEncoder, RgbaImage};

use crate::compositor::RenderOutput;
use crate::error::{RenderError, RenderResult};
use crate::image::thumbnail;
use crate::surface::RenderSurface;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// PNG image (lossless, keeps alpha).
    #[default]
    Png,
    /// JPEG image (alpha flattened onto the background color).
    Jpeg,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Configuration for design export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output format.
    pub format: ExportFormat,
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
    /// Color transparent pixels are flattened onto for JPEG (default: black).
    pub background: [u8; 3],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            jpeg_quality: 85,
            background: [0, 0, 0],
        }
    }
}

/// Encodes finished renders and writes download files.
#[derive(Debug, Clone, Default)]
pub struct DesignExporter {
    config: ExportConfig,
}

impl DesignExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Exporter configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encode `surface` in the configured format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding fails.
    pub fn encode(&self, surface: &RenderSurface) -> RenderResult<Vec<u8>> {
        match self.config.format {
            ExportFormat::Png => surface.encode_png(),
            ExportFormat::Jpeg => self.encode_jpeg(surface),
        }
    }

    /// Encode `surface` as JPEG, flattening alpha onto the background color.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn encode_jpeg(&self, surface: &RenderSurface) -> RenderResult<Vec<u8>> {
        let rgba = surface.to_rgba_image()?;
        let (width, height) = rgba.dimensions();
        let bg = &self.config.background;

        let mut rgb_data = Vec::with_capacity(rgb_len(width, height));
        for pixel in rgba.pixels() {
            let alpha = f32::from(pixel[3]) / 255.0;
            let inv = 1.0 - alpha;
            for channel in 0..3 {
                let value = f32::from(pixel[channel]).mul_add(alpha, f32::from(bg[channel]) * inv);
                rgb_data.push(value.round() as u8);
            }
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Download file name for a render labelled `label`.
    #[must_use]
    pub fn file_name(&self, label: &str) -> String {
        download_file_name(label, self.config.format.extension())
    }

    /// Encode `output` and write it into `dir` under its download name.
    ///
    /// The directory is created if missing. Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding or writing fails.
    pub fn save(&self, output: &RenderOutput, dir: impl AsRef<Path>) -> RenderResult<PathBuf> {
        let dir = dir.as_ref();
        let bytes = self.encode(&output.surface)?;

        std::fs::create_dir_all(dir)
            .map_err(|e| RenderError::Export(format!("{}: {e}", dir.display())))?;
        let path = dir.join(self.file_name(&output.label));
        std::fs::write(&path, &bytes)
            .map_err(|e| RenderError::Export(format!("{}: {e}", path.display())))?;

        tracing::info!(
            request = %output.id,
            bytes = bytes.len(),
            "Exported design to {}",
            path.display()
        );
        Ok(path)
    }
}

/// Downscale `surface` to on-screen preview size (at most 400 px wide, half
/// the canvas width for smaller canvases).
///
/// # Errors
///
/// Returns [`RenderError::Surface`] if the pixels cannot be copied.
pub fn preview_thumbnail(surface: &RenderSurface) -> RenderResult<RgbaImage> {
    let (width, height) = preview_size(surface.width(), surface.height());
    let rgba = surface.to_rgba_image()?;
    Ok(thumbnail(&rgba, width, height))
}

/// Byte length of a packed RGB buffer, computed without `u32` overflow.
fn rgb_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use compositor_core::{Color, FillStyle, Rect};

    fn half_transparent_surface(width: u32, height: u32) -> RenderSurface {
        let mut surface = RenderSurface::new(width, height).expect("surface");
        #[allow(clippy::cast_precision_loss)]
        let right_half = Rect::new(width as f32 / 2.0, 0.0, width as f32 / 2.0, height as f32);
        surface.fill_rect(right_half, &FillStyle::new(Color::rgb(255, 255, 255)));
        surface
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_rgb_len_exceeds_u32() {
        assert_eq!(rgb_len(40_000, 40_000), 4_800_000_000);
        assert_eq!(rgb_len(2, 3), 18);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
        assert_eq!(ExportFormat::default(), ExportFormat::Png);
    }

    #[test]
    fn test_png_export_produces_valid_bytes() {
        let exporter = DesignExporter::with_defaults();
        let png = exporter.encode(&half_transparent_surface(16, 8)).expect("png");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);

        let decoded = image::load_from_memory(&png).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert_eq!(decoded.get_pixel(15, 0).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_jpeg_export_flattens_alpha() {
        let exporter = DesignExporter::new(ExportConfig {
            format: ExportFormat::Jpeg,
            jpeg_quality: 95,
            ..ExportConfig::default()
        });
        let jpeg = exporter.encode(&half_transparent_surface(32, 16)).expect("jpeg");
        assert_eq!(&jpeg[0..3], &[0xFF, 0xD8, 0xFF]);

        let decoded = image::load_from_memory(&jpeg).expect("decode").to_rgb8();
        assert_eq!(decoded.dimensions(), (32, 16));
        // Transparent half lands on black, opaque half stays white.
        assert!(decoded.get_pixel(2, 8).0[0] < 30);
        assert!(decoded.get_pixel(29, 8).0[0] > 225);
    }

    #[test]
    fn test_file_name_follows_format() {
        let png = DesignExporter::with_defaults();
        assert_eq!(png.file_name("Instagram Post"), "lotaya-ai-instagram-post.png");

        let jpeg = DesignExporter::new(ExportConfig {
            format: ExportFormat::Jpeg,
            ..ExportConfig::default()
        });
        assert_eq!(jpeg.file_name("Facebook Cover"), "lotaya-ai-facebook-cover.jpg");
    }

    #[test]
    fn test_preview_thumbnail_size() {
        let story = RenderSurface::new(1080, 1920).expect("surface");
        assert_eq!(preview_thumbnail(&story).expect("thumb").dimensions(), (400, 711));

        let board = RenderSurface::new(600, 600).expect("surface");
        assert_eq!(preview_thumbnail(&board).expect("thumb").dimensions(), (300, 300));
    }
}
