//! Social media canvas presets.

use serde::Serialize;

/// A named canvas size for a social platform slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialTemplate {
    /// Display name, also used as the export label.
    pub name: &'static str,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Human readable aspect ratio.
    pub aspect_ratio: &'static str,
}

/// Widest on-screen preview, in CSS pixels.
pub const PREVIEW_MAX_WIDTH: u32 = 400;

/// All built-in presets.
pub const SOCIAL_TEMPLATES: &[SocialTemplate] = &[
    SocialTemplate::new("Facebook Cover", 1200, 630, "1.91:1"),
    SocialTemplate::new("YouTube Banner", 2560, 1440, "16:9"),
    SocialTemplate::new("LinkedIn Banner", 1584, 396, "4:1"),
    SocialTemplate::new("Twitter Header", 1500, 500, "3:1"),
    SocialTemplate::new("Twitch Banner", 1200, 480, "2.5:1"),
    SocialTemplate::new("Pinterest Board Cover", 600, 600, "1:1"),
    SocialTemplate::new("Instagram Post", 1080, 1080, "1:1"),
    SocialTemplate::new("Instagram Story", 1080, 1920, "9:16"),
];

impl SocialTemplate {
    const fn new(name: &'static str, width: u32, height: u32, aspect_ratio: &'static str) -> Self {
        Self {
            name,
            width,
            height,
            aspect_ratio,
        }
    }

    /// Every built-in preset.
    #[must_use]
    pub fn all() -> &'static [SocialTemplate] {
        SOCIAL_TEMPLATES
    }

    /// Look up a preset by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find(name: &str) -> Option<&'static SocialTemplate> {
        let wanted = name.trim();
        SOCIAL_TEMPLATES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(wanted))
    }

    /// Size of the on-screen preview: half the canvas width, capped at
    /// [`PREVIEW_MAX_WIDTH`], with the height following the aspect ratio.
    #[must_use]
    pub fn preview_size(&self) -> (u32, u32) {
        preview_size(self.width, self.height)
    }
}

/// Preview size for an arbitrary canvas. Both dimensions are at least 1.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn preview_size(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }
    let preview_w = (f64::from(width) * 0.5).min(f64::from(PREVIEW_MAX_WIDTH));
    let aspect = f64::from(width) / f64::from(height);
    let preview_h = preview_w / aspect;
    (
        (preview_w.round() as u32).max(1),
        (preview_h.round() as u32).max(1),
    )
}
