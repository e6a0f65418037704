//! Background image decoding and cover fitting.

use compositor_core::cover_crop;
use image::imageops::FilterType;
use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// Decoded background image in straight-alpha RGBA.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixel data.
    pub pixels: RgbaImage,
    /// Format detected from the encoded bytes.
    pub format: ImageFormat,
}

impl DecodedImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }
}

/// Decodes encoded background bytes into pixels.
///
/// The compositor runs decoders on a blocking worker, so implementations may
/// take as long as they need; the compositor bounds the wait.
pub trait BackgroundDecoder: Send + Sync {
    /// Decode `data`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Decode`] if the bytes are not a supported image.
    fn decode(&self, data: &[u8]) -> RenderResult<DecodedImage>;
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl BackgroundDecoder for ImageCrateDecoder {
    fn decode(&self, data: &[u8]) -> RenderResult<DecodedImage> {
        load_image_from_bytes(data)
    }
}

/// Load an image from raw bytes.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<DecodedImage> {
    let format = ImageFormat::from_magic_bytes(data);

    let img = image::load_from_memory(data).map_err(|e| RenderError::Decode(e.to_string()))?;

    let pixels = img.to_rgba8();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(RenderError::Decode("image has no pixels".to_string()));
    }

    tracing::trace!(
        "Decoded {format:?} background {}x{}",
        pixels.width(),
        pixels.height()
    );

    Ok(DecodedImage { pixels, format })
}

/// Scale and crop `image` so it exactly covers `width` × `height`.
///
/// The image is scaled uniformly; overflow on the longer dimension is cropped
/// equally from both sides.
#[must_use]
pub fn cover_fit(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (x, y, crop_w, crop_h) = cover_crop(image.width(), image.height(), width, height);
    let cropped = image::imageops::crop_imm(image, x, y, crop_w, crop_h).to_image();

    if cropped.dimensions() == (width, height) {
        return cropped;
    }

    image::imageops::resize(&cropped, width, height, FilterType::Lanczos3)
}

/// Downscale an image to fit within `max_width` × `max_height`, keeping its
/// aspect ratio.
///
/// Returns a copy if the image already fits.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn thumbnail(image: &RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    if image.width() <= max_width && image.height() <= max_height {
        return image.clone();
    }

    let scale_x = f64::from(max_width.max(1)) / f64::from(image.width());
    let scale_y = f64::from(max_height.max(1)) / f64::from(image.height());
    let scale = scale_x.min(scale_y);

    let new_width = ((f64::from(image.width()) * scale).round() as u32).max(1);
    let new_height = ((f64::from(image.height()) * scale).round() as u32).max(1);

    image::imageops::thumbnail(image, new_width, new_height)
}
