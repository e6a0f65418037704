//! Design constants and the sizing rules derived from them.
//!
//! All proportions are relative to the canvas width so that a banner and a
//! story get typography that scales with the output resolution.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::style::{Color, FillStyle, FontWeight, TextAlign, TextBaseline, TextStyle};

/// Opacity of the black readability overlay.
pub const OVERLAY_OPACITY: f32 = 0.5;
/// Overlay inset on every side, as a fraction of canvas width.
pub const OVERLAY_INSET_RATIO: f32 = 0.05;
/// Smallest caption font size in pixels.
pub const CAPTION_FONT_FLOOR: u32 = 24;
/// Caption font size is `width / CAPTION_FONT_DIVISOR` above the floor.
pub const CAPTION_FONT_DIVISOR: u32 = 25;
/// Caption line height as a multiple of font size.
pub const LINE_HEIGHT_MULTIPLIER: f32 = 1.2;
/// Maximum caption line width as a fraction of canvas width.
pub const CAPTION_MAX_WIDTH_RATIO: f32 = 0.8;
/// Smallest hashtag font size in pixels.
pub const HASHTAG_FONT_FLOOR: u32 = 12;
/// Hashtag font size is `width / HASHTAG_FONT_DIVISOR` above the floor.
pub const HASHTAG_FONT_DIVISOR: u32 = 60;
/// Gap between the hashtag line and the bottom edge, as a fraction of width.
pub const HASHTAG_MARGIN_RATIO: f32 = 0.025;
/// Opacity of the hashtag text.
pub const HASHTAG_OPACITY: f32 = 0.9;
/// Font families used for both text layers.
pub const FONT_FAMILIES: &[&str] = &["Inter", "sans-serif"];

/// The full set of design constants used by one compositor.
///
/// `Default` yields the published constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Overlay opacity.
    pub overlay_opacity: f32,
    /// Overlay inset ratio.
    pub overlay_inset_ratio: f32,
    /// Caption font floor (px).
    pub caption_font_floor: u32,
    /// Caption font divisor.
    pub caption_font_divisor: u32,
    /// Line height multiplier.
    pub line_height_multiplier: f32,
    /// Caption max width ratio.
    pub caption_max_width_ratio: f32,
    /// Hashtag font floor (px).
    pub hashtag_font_floor: u32,
    /// Hashtag font divisor.
    pub hashtag_font_divisor: u32,
    /// Hashtag bottom margin ratio.
    pub hashtag_margin_ratio: f32,
    /// Hashtag opacity.
    pub hashtag_opacity: f32,
    /// Font families in preference order.
    pub font_families: Vec<String>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            overlay_opacity: OVERLAY_OPACITY,
            overlay_inset_ratio: OVERLAY_INSET_RATIO,
            caption_font_floor: CAPTION_FONT_FLOOR,
            caption_font_divisor: CAPTION_FONT_DIVISOR,
            line_height_multiplier: LINE_HEIGHT_MULTIPLIER,
            caption_max_width_ratio: CAPTION_MAX_WIDTH_RATIO,
            hashtag_font_floor: HASHTAG_FONT_FLOOR,
            hashtag_font_divisor: HASHTAG_FONT_DIVISOR,
            hashtag_margin_ratio: HASHTAG_MARGIN_RATIO,
            hashtag_opacity: HASHTAG_OPACITY,
            font_families: FONT_FAMILIES.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

impl DesignConfig {
    /// Caption font size: `max(floor, floor(width / divisor))`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn caption_font_size(&self, width: u32) -> f32 {
        scaled_font_size(width, self.caption_font_divisor, self.caption_font_floor) as f32
    }

    /// Hashtag font size: `max(floor, floor(width / divisor))`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hashtag_font_size(&self, width: u32) -> f32 {
        scaled_font_size(width, self.hashtag_font_divisor, self.hashtag_font_floor) as f32
    }

    /// Line height for a given font size.
    #[must_use]
    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_multiplier
    }

    /// Widest a caption line may measure.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn caption_max_width(&self, width: u32) -> f32 {
        width as f32 * self.caption_max_width_ratio
    }

    /// Overlay inset in pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overlay_inset(&self, width: u32) -> f32 {
        width as f32 * self.overlay_inset_ratio
    }

    /// The readability overlay rectangle.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn overlay_rect(&self, width: u32, height: u32) -> Rect {
        let inset = self.overlay_inset(width);
        Rect::new(
            inset,
            inset,
            (width as f32 - inset * 2.0).max(0.0),
            (height as f32 - inset * 2.0).max(0.0),
        )
    }

    /// Fill used for the overlay.
    #[must_use]
    pub fn overlay_fill(&self) -> FillStyle {
        FillStyle::new(Color::BLACK.with_alpha(self.overlay_opacity))
    }

    /// Center of the caption block.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn caption_anchor(&self, width: u32, height: u32) -> Point {
        Point::new(width as f32 / 2.0, height as f32 / 2.0)
    }

    /// Anchor of the hashtag line: horizontally centered, text bottom one
    /// margin above the canvas bottom.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hashtag_anchor(&self, width: u32, height: u32) -> Point {
        Point::new(
            width as f32 / 2.0,
            height as f32 - width as f32 * self.hashtag_margin_ratio,
        )
    }

    /// Style for the caption: bold white, centered, middle baseline.
    #[must_use]
    pub fn caption_style(&self, width: u32) -> TextStyle {
        TextStyle {
            families: self.font_families.clone(),
            size: self.caption_font_size(width),
            weight: FontWeight::Bold,
            color: Color::WHITE,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }

    /// Style for the hashtag line: regular, translucent white, bottom baseline.
    #[must_use]
    pub fn hashtag_style(&self, width: u32) -> TextStyle {
        TextStyle {
            families: self.font_families.clone(),
            size: self.hashtag_font_size(width),
            weight: FontWeight::Normal,
            color: Color::WHITE.with_alpha(self.hashtag_opacity),
            align: TextAlign::Center,
            baseline: TextBaseline::Bottom,
        }
    }
}

fn scaled_font_size(width: u32, divisor: u32, floor: u32) -> u32 {
    (width / divisor.max(1)).max(floor)
}
