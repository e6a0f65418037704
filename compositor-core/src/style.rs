//! Paint styles.
//!
//! Every paint call carries its own style value. Nothing about fonts or fill
//! colors is remembered between calls.

use serde::{Deserialize, Serialize};

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color with the given opacity (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different opacity.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Opacity as an 8-bit value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Font weight used when resolving a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight (400).
    #[default]
    Normal,
    /// Bold weight (700).
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    #[must_use]
    pub fn value(self) -> u16 {
        match self {
            Self::Normal => 400,
            Self::Bold => 700,
        }
    }
}

/// Horizontal alignment of a text run relative to its anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor is the left edge.
    Left,
    /// Anchor is the horizontal center.
    #[default]
    Center,
    /// Anchor is the right edge.
    Right,
}

/// Vertical alignment of a text run relative to its anchor y.
///
/// Mirrors the 2D canvas baselines: `Top`, `Middle` and `Bottom` refer to the
/// em box, `Alphabetic` to the font baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// Anchor is the top of the em box.
    Top,
    /// Anchor is the middle of the em box.
    #[default]
    Middle,
    /// Anchor is the alphabetic baseline.
    Alphabetic,
    /// Anchor is the bottom of the em box.
    Bottom,
}

/// Complete description of how to paint a text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font families in preference order. Generic names (`sans-serif`,
    /// `serif`, `monospace`) are recognized.
    pub families: Vec<String>,
    /// Font size in pixels.
    pub size: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Fill color.
    pub color: Color,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// A white, centered, middle-aligned style at the given size.
    #[must_use]
    pub fn new(families: &[&str], size: f32, weight: FontWeight) -> Self {
        Self {
            families: families.iter().map(|f| (*f).to_string()).collect(),
            size,
            weight,
            color: Color::WHITE,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }

    /// Replace the fill color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Replace the horizontal alignment.
    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Replace the vertical alignment.
    #[must_use]
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Style for solid rectangle fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    /// Fill color.
    pub color: Color,
}

impl FillStyle {
    /// Create a fill style.
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_u8_rounds() {
        assert_eq!(Color::BLACK.with_alpha(0.5).alpha_u8(), 128);
        assert!((229..=230).contains(&Color::WHITE.with_alpha(0.9).alpha_u8()));
        assert_eq!(Color::WHITE.alpha_u8(), 255);
    }

    #[test]
    fn test_rgba_clamps_opacity() {
        assert!((Color::rgba(1, 2, 3, 4.0).a - 1.0).abs() < f32::EPSILON);
        assert!(Color::rgba(1, 2, 3, -1.0).a.abs() < f32::EPSILON);
    }

    #[test]
    fn test_text_style_builders() {
        let style = TextStyle::new(&["Inter", "sans-serif"], 20.0, FontWeight::Bold)
            .with_align(TextAlign::Left)
            .with_baseline(TextBaseline::Bottom)
            .with_color(Color::BLACK);
        assert_eq!(style.families, vec!["Inter", "sans-serif"]);
        assert_eq!(style.align, TextAlign::Left);
        assert_eq!(style.baseline, TextBaseline::Bottom);
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(style.weight.value(), 700);
    }
}
