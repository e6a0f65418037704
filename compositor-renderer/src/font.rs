//! Font resolution, measurement and glyph outlines.
//!
//! Faces come from a `fontdb` database. Advances and outlines are read with
//! `ttf-parser`; outlines are turned into `tiny-skia` paths in surface space.

use std::path::Path;

use compositor_core::layout::{FixedAdvance, TextMeasure};
use compositor_core::{Point, TextAlign, TextBaseline, TextStyle};
use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::{RenderError, RenderResult};

/// A text run positioned on the surface and ready to fill.
#[derive(Debug, Clone)]
pub struct TextRun {
    /// Glyph outlines in surface coordinates; `None` for blank runs.
    pub path: Option<tiny_skia::Path>,
    /// Advance width in pixels.
    pub width: f32,
    /// Left end of the baseline.
    pub origin: Point,
}

/// Font database plus the fallback used when no face matches.
pub struct FontBook {
    db: Database,
    fallback: FixedAdvance,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// An empty font book. Measurement uses the fixed-advance fallback and no
    /// text is painted until fonts are loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            db: Database::new(),
            fallback: FixedAdvance::DEFAULT,
        }
    }

    /// A font book populated with the fonts installed on this machine.
    #[must_use]
    pub fn system() -> Self {
        let mut book = Self::new();
        book.db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", book.db.len());
        book
    }

    /// Load every font found (recursively) in `dir`.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) {
        let before = self.db.len();
        self.db.load_fonts_dir(dir.as_ref());
        tracing::debug!(
            "Loaded {} font faces from {}",
            self.db.len() - before,
            dir.as_ref().display()
        );
    }

    /// Load a single font file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] if the file cannot be read.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        self.db
            .load_font_file(path)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))
    }

    /// Load a font from memory.
    pub fn load_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Number of loaded faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Find the face to use for `style`.
    ///
    /// Tries the style's families in order; if none match, any loaded face is
    /// used so text still renders.
    #[must_use]
    pub fn resolve(&self, style: &TextStyle) -> Option<ID> {
        let mut families: Vec<Family<'_>> = style
            .families
            .iter()
            .map(|name| generic_family(name))
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        let query = Query {
            families: &families,
            weight: Weight(style.weight.value()),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        self.db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|face| face.id))
    }

    /// Lay out `text` as a single run anchored at `anchor` according to the
    /// style's alignment and baseline.
    ///
    /// Returns `None` when no face is available.
    #[must_use]
    pub fn text_run(&self, text: &str, anchor: Point, style: &TextStyle) -> Option<TextRun> {
        self.with_face(style, |face| {
            let scale = style.size / f32::from(face.units_per_em());
            let width = advance_width(face, text, scale);
            let ascender = f32::from(face.ascender()) * scale;
            let descender = f32::from(face.descender()) * scale;

            let left = match style.align {
                TextAlign::Left => anchor.x,
                TextAlign::Center => anchor.x - width / 2.0,
                TextAlign::Right => anchor.x - width,
            };
            let baseline = match style.baseline {
                TextBaseline::Top => anchor.y + ascender,
                TextBaseline::Middle => anchor.y + (ascender + descender) / 2.0,
                TextBaseline::Alphabetic => anchor.y,
                TextBaseline::Bottom => anchor.y + descender,
            };

            let mut builder = GlyphPathBuilder::new(scale, baseline);
            let mut pen = left;
            for c in text.chars() {
                let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
                builder.origin_x = pen;
                // Glyphs without outlines (spaces) just advance the pen.
                let _ = face.outline_glyph(glyph, &mut builder);
                pen += f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
            }

            TextRun {
                path: builder.finish(),
                width,
                origin: Point::new(left, baseline),
            }
        })
    }

    fn with_face<T>(&self, style: &TextStyle, f: impl FnOnce(&Face<'_>) -> T) -> Option<T> {
        let id = self.resolve(style)?;
        self.db
            .with_face_data(id, |data, index| {
                Face::parse(data, index).ok().map(|face| f(&face))
            })
            .flatten()
    }
}

impl TextMeasure for FontBook {
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        self.with_face(style, |face| {
            advance_width(face, text, style.size / f32::from(face.units_per_em()))
        })
        .unwrap_or_else(|| self.fallback.measure(text, style))
    }
}

fn generic_family(name: &str) -> Family<'_> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name.trim()),
    }
}

fn advance_width(face: &Face<'_>, text: &str, scale: f32) -> f32 {
    text.chars()
        .map(|c| {
            let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
            f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale
        })
        .sum()
}

/// Converts ttf-parser outlines (font units, y up) into one tiny-skia path in
/// surface pixels (y down).
struct GlyphPathBuilder {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    origin_x: f32,
    baseline: f32,
}

impl GlyphPathBuilder {
    fn new(scale: f32, baseline: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            origin_x: 0.0,
            baseline,
        }
    }

    fn transform_x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale // Flip Y axis
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1),
            self.transform_y(y1),
            self.transform_x(x),
            self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1),
            self.transform_y(y1),
            self.transform_x(x2),
            self.transform_y(y2),
            self.transform_x(x),
            self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compositor_core::FontWeight;

    const TUFFY: &[u8] = include_bytes!("../tests/fixtures/Tuffy.ttf");

    fn style(size: f32) -> TextStyle {
        TextStyle::new(&["Inter", "sans-serif"], size, FontWeight::Bold)
    }

    fn tuffy() -> FontBook {
        let mut book = FontBook::new();
        book.load_data(TUFFY.to_vec());
        book
    }

    #[test]
    fn test_empty_book_falls_back_to_fixed_advance() {
        let book = FontBook::new();
        assert_eq!(book.face_count(), 0);
        assert!(book.resolve(&style(20.0)).is_none());
        assert!(book.text_run("hi", Point::new(0.0, 0.0), &style(20.0)).is_none());
        // 4 chars * 20px * 0.5em
        assert!((book.measure("abcd", &style(20.0)) - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let mut book = FontBook::new();
        let result = book.load_file("/definitely/not/a/font.ttf");
        assert!(matches!(result, Err(RenderError::Font(_))));
    }

    #[test]
    fn test_garbage_font_data_is_ignored() {
        let mut book = FontBook::new();
        book.load_data(b"not a font".to_vec());
        assert_eq!(book.face_count(), 0);
    }

    #[test]
    fn test_generic_family_mapping() {
        assert_eq!(generic_family("sans-serif"), Family::SansSerif);
        assert_eq!(generic_family(" Serif "), Family::Serif);
        assert_eq!(generic_family("Inter"), Family::Name("Inter"));
    }

    #[test]
    fn test_unmatched_family_falls_back_to_loaded_face() {
        let book = tuffy();
        assert_eq!(book.face_count(), 1);
        assert!(book.resolve(&style(20.0)).is_some());
    }

    #[test]
    fn test_measure_scales_with_size() {
        let book = tuffy();
        let small = book.measure("Hello world", &style(20.0));
        let large = book.measure("Hello world", &style(40.0));
        assert!(small > 0.0);
        assert!((large - small * 2.0).abs() < 0.01 * large);
        // Glyph advances, not the fixed fallback.
        assert!((small - 110.0).abs() > f32::EPSILON);
    }

    #[test]
    fn test_text_run_alignment() {
        let book = tuffy();
        let anchor = Point::new(200.0, 100.0);
        let centered = book.text_run("Coffee", anchor, &style(30.0)).expect("run");
        assert!((centered.origin.x - (200.0 - centered.width / 2.0)).abs() < 1e-3);
        assert!(centered.path.is_some());

        let left = book
            .text_run("Coffee", anchor, &style(30.0).with_align(TextAlign::Left))
            .expect("run");
        assert!((left.origin.x - 200.0).abs() < 1e-3);

        let right = book
            .text_run("Coffee", anchor, &style(30.0).with_align(TextAlign::Right))
            .expect("run");
        assert!((right.origin.x + right.width - 200.0).abs() < 1e-3);

        let blank = book.text_run("   ", anchor, &style(30.0)).expect("run");
        assert!(blank.path.is_none());
    }

    #[test]
    fn test_text_run_baselines() {
        let book = tuffy();
        let anchor = Point::new(0.0, 100.0);
        let bounds = |baseline: TextBaseline| {
            book.text_run("HEX", anchor, &style(40.0).with_baseline(baseline))
                .and_then(|run| run.path)
                .map(|path| path.bounds())
                .expect("outline")
        };

        // Capitals sit on the baseline and rise above it.
        let alphabetic = bounds(TextBaseline::Alphabetic);
        assert!((alphabetic.bottom() - 100.0).abs() < 0.5);
        assert!(alphabetic.top() < 80.0);

        // Bottom: ink ends at or above the anchor line.
        let bottom = bounds(TextBaseline::Bottom);
        assert!(bottom.bottom() <= 100.0 + 1e-3);
        assert!(bottom.bottom() < alphabetic.bottom());

        // Top: ink starts at or below the anchor line.
        let top = bounds(TextBaseline::Top);
        assert!(top.top() >= 100.0 - 1e-3);

        // Middle: ink straddles the anchor line.
        let middle = bounds(TextBaseline::Middle);
        assert!(middle.top() < 100.0 && middle.bottom() > 100.0);
    }
}
