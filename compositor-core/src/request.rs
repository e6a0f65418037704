//! Render requests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CompositorError, CompositorResult};
use crate::source::decode_image_source;
use crate::template::SocialTemplate;

/// Monotonically increasing tag for one submitted render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    /// Create from a raw counter value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to composite one design.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Encoded background image (JPEG, PNG or WebP).
    pub background_image: Arc<[u8]>,
    /// Caption painted in the middle of the canvas.
    pub caption: String,
    /// Hashtags painted along the bottom, without the leading `#`.
    pub hashtags: Vec<String>,
    /// Output width in pixels.
    pub canvas_width: u32,
    /// Output height in pixels.
    pub canvas_height: u32,
    /// Label used to name the downloaded file.
    pub template_label: String,
}

impl RenderRequest {
    /// Create a request with explicit dimensions.
    #[must_use]
    pub fn new(
        background_image: impl Into<Arc<[u8]>>,
        caption: impl Into<String>,
        hashtags: Vec<String>,
        canvas_width: u32,
        canvas_height: u32,
        template_label: impl Into<String>,
    ) -> Self {
        Self {
            background_image: background_image.into(),
            caption: caption.into(),
            hashtags,
            canvas_width,
            canvas_height,
            template_label: template_label.into(),
        }
    }

    /// Create a request sized and labelled by a social template.
    #[must_use]
    pub fn for_template(
        template: &SocialTemplate,
        background_image: impl Into<Arc<[u8]>>,
        caption: impl Into<String>,
        hashtags: Vec<String>,
    ) -> Self {
        Self::new(
            background_image,
            caption,
            hashtags,
            template.width,
            template.height,
            template.name,
        )
    }

    /// Check the request invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or there is no image data.
    pub fn validate(&self) -> CompositorResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(CompositorError::InvalidRequest(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.background_image.is_empty() {
            return Err(CompositorError::InvalidRequest(
                "background image is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// JSON description of a render, as handed over by the content generator.
///
/// Either `template` or both `width` and `height` must be present; explicit
/// dimensions win over the template's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestManifest {
    /// Base64 image or `data:` URI.
    pub image: String,
    /// Caption text.
    #[serde(default)]
    pub caption: String,
    /// Hashtags.
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Template name.
    #[serde(default)]
    pub template: Option<String>,
    /// Canvas width override.
    #[serde(default)]
    pub width: Option<u32>,
    /// Canvas height override.
    #[serde(default)]
    pub height: Option<u32>,
    /// Export label; defaults to the template name, then `"design"`.
    #[serde(default)]
    pub label: Option<String>,
}

impl RequestManifest {
    /// Parse a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a manifest.
    pub fn from_json(json: &str) -> CompositorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the manifest into a validated request.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown template, missing dimensions, an
    /// undecodable image payload, or an invalid resulting request.
    pub fn into_request(self) -> CompositorResult<RenderRequest> {
        let template = match self.template.as_deref() {
            Some(name) => Some(
                SocialTemplate::find(name)
                    .ok_or_else(|| CompositorError::UnknownTemplate(name.to_string()))?,
            ),
            None => None,
        };

        let width = self.width.or(template.map(|t| t.width));
        let height = self.height.or(template.map(|t| t.height));
        let (Some(width), Some(height)) = (width, height) else {
            return Err(CompositorError::InvalidRequest(
                "manifest needs a template or both width and height".to_string(),
            ));
        };

        let label = self
            .label
            .or_else(|| template.map(|t| t.name.to_string()))
            .unwrap_or_else(|| "design".to_string());

        let image = decode_image_source(&self.image)?;
        let request = RenderRequest::new(image, self.caption, self.hashtags, width, height, label);
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1X1: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let request = RenderRequest::new(vec![1u8, 2, 3], "hi", vec![], 0, 100, "x");
        assert!(matches!(
            request.validate(),
            Err(CompositorError::InvalidRequest(_))
        ));
        let request = RenderRequest::new(vec![1u8, 2, 3], "hi", vec![], 100, 0, "x");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_image() {
        let request = RenderRequest::new(Vec::<u8>::new(), "hi", vec![], 10, 10, "x");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_for_template() {
        let template = SocialTemplate::find("Twitter Header").expect("preset");
        let request = RenderRequest::for_template(template, vec![0u8; 4], "cap", vec![]);
        assert_eq!(request.canvas_width, 1500);
        assert_eq!(request.canvas_height, 500);
        assert_eq!(request.template_label, "Twitter Header");
    }

    #[test]
    fn test_manifest_with_template() {
        let json = format!(
            r#"{{"image": "{PNG_1X1}", "caption": "Hello", "hashtags": ["a"], "template": "instagram post"}}"#
        );
        let request = RequestManifest::from_json(&json)
            .expect("parse")
            .into_request()
            .expect("request");
        assert_eq!((request.canvas_width, request.canvas_height), (1080, 1080));
        assert_eq!(request.template_label, "Instagram Post");
        assert_eq!(request.hashtags, vec!["a"]);
    }

    #[test]
    fn test_manifest_explicit_dimensions_and_default_label() {
        let json = format!(r#"{{"image": "data:image/png;base64,{PNG_1X1}", "width": 320, "height": 200}}"#);
        let request = RequestManifest::from_json(&json)
            .expect("parse")
            .into_request()
            .expect("request");
        assert_eq!((request.canvas_width, request.canvas_height), (320, 200));
        assert_eq!(request.template_label, "design");
        assert!(request.caption.is_empty());
    }

    #[test]
    fn test_manifest_errors() {
        let unknown = RequestManifest {
            image: PNG_1X1.to_string(),
            caption: String::new(),
            hashtags: vec![],
            template: Some("Nope".to_string()),
            width: None,
            height: None,
            label: None,
        };
        assert!(matches!(
            unknown.clone().into_request(),
            Err(CompositorError::UnknownTemplate(_))
        ));

        let no_size = RequestManifest {
            template: None,
            width: Some(100),
            ..unknown.clone()
        };
        assert!(matches!(
            no_size.into_request(),
            Err(CompositorError::InvalidRequest(_))
        ));

        let zero = RequestManifest {
            template: None,
            width: Some(0),
            height: Some(10),
            ..unknown
        };
        assert!(zero.into_request().is_err());

        assert!(matches!(
            RequestManifest::from_json("{}"),
            Err(CompositorError::Serialization(_))
        ));
    }

    #[test]
    fn test_request_id_display_and_order() {
        assert_eq!(RequestId::new(7).to_string(), "#7");
        assert!(RequestId::new(2) > RequestId::new(1));
    }
}
