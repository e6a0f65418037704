//! Text layout engine.
//!
//! Greedy word wrap followed by vertical centering. Measurement goes through
//! the [`TextMeasure`] trait so the engine works against real font metrics in
//! the renderer and against fixed advances in tests.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::style::TextStyle;

/// Anything that can report the pixel width of a string under a style.
pub trait TextMeasure {
    /// Width in pixels of `text` painted with `style`.
    fn measure(&self, text: &str, style: &TextStyle) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &TextStyle) -> f32,
{
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        self(text, style)
    }
}

/// Measures every character as a fixed fraction of the font size.
///
/// Used as a fallback when no font face is available for a style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    /// Advance per character, in em.
    pub em_per_char: f32,
}

impl FixedAdvance {
    /// Half an em per character, a reasonable average for sans-serif text.
    pub const DEFAULT: Self = Self { em_per_char: 0.5 };
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TextMeasure for FixedAdvance {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        text.chars().count() as f32 * style.size * self.em_per_char
    }
}

/// One line of wrapped text with its paint position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedLine {
    /// Line text, without leading or trailing whitespace.
    pub content: String,
    /// Anchor x (the horizontal center for centered text).
    pub x: f32,
    /// Anchor y.
    pub y: f32,
}

/// Break `text` into lines no wider than `max_width`.
///
/// Words are taken in order. Each word is tentatively appended together with
/// a trailing separator and the result is measured. When that exceeds
/// `max_width` and the line already holds a word, the line is committed and
/// the word starts the next one. A single word wider than `max_width` is
/// never split; it ends up alone on its line.
///
/// Whitespace-only input produces no lines.
pub fn break_lines<M>(text: &str, max_width: f32, metrics: &M, style: &TextStyle) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = format!("{line}{word} ");
        if !line.is_empty() && metrics.measure(&candidate, style) > max_width {
            lines.push(line.trim_end().to_string());
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line.trim_end().to_string());
    }

    lines
}

/// Position `lines` as a block vertically centered on `anchor`.
///
/// The first line sits at `anchor.y - (n - 1) * line_height / 2` and each
/// following line one `line_height` lower. Every line shares `anchor.x`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn center_lines(lines: Vec<String>, anchor: Point, line_height: f32) -> Vec<WrappedLine> {
    let block_height = lines.len().saturating_sub(1) as f32 * line_height;
    let top = anchor.y - block_height / 2.0;

    lines
        .into_iter()
        .enumerate()
        .map(|(index, content)| WrappedLine {
            content,
            x: anchor.x,
            y: top + index as f32 * line_height,
        })
        .collect()
}

/// Wrap `text` to `max_width` and center the result on `anchor`.
///
/// Returns an empty list for empty or whitespace-only text.
pub fn wrap_text<M>(
    text: &str,
    anchor: Point,
    max_width: f32,
    line_height: f32,
    metrics: &M,
    style: &TextStyle,
) -> Vec<WrappedLine>
where
    M: TextMeasure + ?Sized,
{
    let lines = break_lines(text, max_width, metrics, style);
    tracing::trace!(
        lines = lines.len(),
        max_width,
        line_height,
        "wrapped caption"
    );
    center_lines(lines, anchor, line_height)
}
