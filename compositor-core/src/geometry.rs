//! Points, rectangles and the cover-fit crop.

use serde::{Deserialize, Serialize};

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Pixels from the left edge.
    pub x: f32,
    /// Pixels from the top edge.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Region of a `src_width` × `src_height` image that, scaled uniformly, exactly
/// covers a `dst_width` × `dst_height` target.
///
/// The crop is centered on the source; overflow on the longer dimension is
/// discarded. Returned as `(x, y, width, height)` in source pixels, each at
/// least 1.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn cover_crop(
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> (u32, u32, u32, u32) {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return (0, 0, src_width.max(1), src_height.max(1));
    }

    let src_aspect = f64::from(src_width) / f64::from(src_height);
    let dst_aspect = f64::from(dst_width) / f64::from(dst_height);

    if src_aspect > dst_aspect {
        // Source is wider: keep full height, crop the sides.
        let crop_w = (f64::from(src_height) * dst_aspect).round() as u32;
        let crop_w = crop_w.clamp(1, src_width);
        ((src_width - crop_w) / 2, 0, crop_w, src_height)
    } else {
        // Source is taller (or equal): keep full width, crop top and bottom.
        let crop_h = (f64::from(src_width) / dst_aspect).round() as u32;
        let crop_h = crop_h.clamp(1, src_height);
        (0, (src_height - crop_h) / 2, src_width, crop_h)
    }
}
