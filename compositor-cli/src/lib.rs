//! # Compositor CLI
//!
//! Renders a captioned social media graphic from the command line.
//!
//! ## Usage
//!
//! ```bash
//! compositor photo.jpg --caption "A special offer for a new coffee blend" \
//!     --hashtag coffee,offer,newblend --template "Instagram Post"
//! ```
//!
//! ## From a JSON manifest:
//!
//! ```bash
//! compositor --manifest design.json --format jpeg --output-dir out/
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved configuration for one run
//! - `build_request` - Turns the configuration into a `RenderRequest`
//! - `run` - Composites, exports and optionally writes a preview

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use compositor_core::source::decode_image_source;
use compositor_core::text::share_text;
use compositor_core::{RenderRequest, RequestManifest, SocialTemplate};
use compositor_renderer::image::ImageFormat;
use compositor_renderer::{
    preview_thumbnail, Compositor, CompositorConfig, DesignExporter, ExportConfig, ExportFormat,
};

/// Template used when neither a template nor dimensions are given.
pub const DEFAULT_TEMPLATE: &str = "Instagram Post";

/// Command-line arguments for the compositor.
#[derive(Debug, Clone, Parser)]
#[command(name = "compositor")]
#[command(about = "Composite a background image, caption and hashtags into a social media graphic")]
#[command(version)]
pub struct CliArgs {
    /// Background image file (PNG, JPEG or WebP; a file holding base64 or a
    /// data URI also works)
    #[arg(required_unless_present_any = ["manifest", "list_templates"])]
    pub image: Option<PathBuf>,

    /// JSON manifest describing the whole design
    #[arg(long, short = 'm', conflicts_with = "image")]
    pub manifest: Option<PathBuf>,

    /// Caption painted in the middle of the design
    #[arg(long, short = 'c', default_value = "")]
    pub caption: String,

    /// Hashtags painted along the bottom (repeat or comma-separate)
    #[arg(long = "hashtag", short = 't', value_delimiter = ',')]
    pub hashtags: Vec<String>,

    /// Social template name (e.g. "Instagram Story")
    #[arg(long, short = 'T')]
    pub template: Option<String>,

    /// Canvas width in pixels (overrides the template)
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels (overrides the template)
    #[arg(long)]
    pub height: Option<u32>,

    /// Label used for the output file name (defaults to the template name)
    #[arg(long)]
    pub label: Option<String>,

    /// Directory the design is written to
    #[arg(long, short = 'o', env = "COMPOSITOR_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// JPEG quality (1-100)
    #[arg(long, default_value = "85", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Background decode timeout in milliseconds
    #[arg(long, env = "COMPOSITOR_DECODE_TIMEOUT_MS", default_value = "10000")]
    pub decode_timeout_ms: u64,

    /// Extra directory to load fonts from
    #[arg(long, env = "COMPOSITOR_FONT_DIR")]
    pub font_dir: Option<PathBuf>,

    /// Do not load the fonts installed on this machine
    #[arg(long)]
    pub no_system_fonts: bool,

    /// Also write a downscaled preview next to the design
    #[arg(long)]
    pub preview: bool,

    /// Print caption and hashtags as one block for sharing
    #[arg(long)]
    pub share_text: bool,

    /// List the available templates as JSON and exit
    #[arg(long)]
    pub list_templates: bool,
}

/// Output format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// PNG (lossless).
    Png,
    /// JPEG.
    #[value(alias = "jpg")]
    Jpeg,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Png => Self::Png,
            OutputFormat::Jpeg => Self::Jpeg,
        }
    }
}

/// Where the design comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A background image plus command-line options.
    Image(PathBuf),
    /// A JSON manifest.
    Manifest(PathBuf),
    /// Nothing to render (e.g. listing templates).
    None,
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where the design comes from.
    pub source: InputSource,
    /// Caption text.
    pub caption: String,
    /// Hashtags.
    pub hashtags: Vec<String>,
    /// Template name.
    pub template: Option<String>,
    /// Width override.
    pub width: Option<u32>,
    /// Height override.
    pub height: Option<u32>,
    /// Output file label.
    pub label: Option<String>,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Export settings.
    pub export: ExportConfig,
    /// Compositor settings.
    pub compositor: CompositorConfig,
    /// Write a preview thumbnail.
    pub write_preview: bool,
    /// Print share text.
    pub print_share_text: bool,
    /// List templates and exit.
    pub list_templates: bool,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let source = match (args.image, args.manifest) {
            (_, Some(manifest)) => InputSource::Manifest(manifest),
            (Some(image), None) => InputSource::Image(image),
            (None, None) => InputSource::None,
        };

        Self {
            source,
            caption: args.caption,
            hashtags: args
                .hashtags
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            template: args.template,
            width: args.width,
            height: args.height,
            label: args.label,
            output_dir: args.output_dir,
            export: ExportConfig {
                format: args.format.into(),
                jpeg_quality: args.jpeg_quality,
                ..ExportConfig::default()
            },
            compositor: CompositorConfig {
                decode_timeout: Duration::from_millis(args.decode_timeout_ms),
                font_dirs: args.font_dir.into_iter().collect(),
                load_system_fonts: !args.no_system_fonts,
                ..CompositorConfig::default()
            },
            write_preview: args.preview,
            print_share_text: args.share_text,
            list_templates: args.list_templates,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The exported design.
    pub design: PathBuf,
    /// The preview thumbnail, if requested.
    pub preview: Option<PathBuf>,
    /// Caption and hashtags for sharing.
    pub share_text: String,
}

/// Build the render request described by `config`.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the template is unknown or
/// the dimensions are missing.
pub fn build_request(config: &CliConfig) -> anyhow::Result<RenderRequest> {
    match &config.source {
        InputSource::Manifest(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read manifest {}", path.display()))?;
            let manifest = RequestManifest::from_json(&json)
                .with_context(|| format!("Invalid manifest {}", path.display()))?;
            Ok(manifest.into_request()?)
        }
        InputSource::Image(path) => {
            let image = read_image(path)?;
            let (width, height, label) = resolve_canvas(config)?;
            let request = RenderRequest::new(
                image,
                config.caption.clone(),
                config.hashtags.clone(),
                width,
                height,
                label,
            );
            request.validate()?;
            Ok(request)
        }
        InputSource::None => bail!("No background image or manifest given"),
    }
}

/// Render, export and report.
///
/// # Errors
///
/// Returns an error if the request cannot be built, rendering fails or the
/// output cannot be written.
pub async fn run(config: &CliConfig) -> anyhow::Result<RunSummary> {
    let request = build_request(config)?;
    let share = share_text(&request.caption, &request.hashtags);
    tracing::info!(
        "Rendering {}x{} design \"{}\"",
        request.canvas_width,
        request.canvas_height,
        request.template_label
    );

    let compositor = Compositor::new(config.compositor.clone());
    let output = compositor
        .composite(request)
        .await
        .context("Failed to render design")?;

    let exporter = DesignExporter::new(config.export.clone());
    let design = exporter
        .save(&output, &config.output_dir)
        .context("Failed to export design")?;

    let preview = if config.write_preview {
        let path = preview_path(&design);
        preview_thumbnail(&output.surface)?
            .save(&path)
            .with_context(|| format!("Failed to write preview {}", path.display()))?;
        tracing::info!("Wrote preview to {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(RunSummary {
        design,
        preview,
        share_text: share,
    })
}

/// Templates as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn templates_json() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(SocialTemplate::all())?)
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;

    if ImageFormat::from_magic_bytes(&bytes) != ImageFormat::Unknown {
        return Ok(bytes);
    }

    // Not a recognised binary image: accept base64 or a data URI.
    match std::str::from_utf8(&bytes) {
        Ok(text) => Ok(decode_image_source(text.trim())
            .with_context(|| format!("{} is neither an image nor base64", path.display()))?),
        Err(_) => Ok(bytes),
    }
}

fn resolve_canvas(config: &CliConfig) -> anyhow::Result<(u32, u32, String)> {
    let template_name = config.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
    let template = SocialTemplate::find(template_name);

    let (width, height) = match (config.width, config.height, template) {
        (Some(w), Some(h), _) => (w, h),
        (w, h, Some(t)) => (w.unwrap_or(t.width), h.unwrap_or(t.height)),
        (_, _, None) => bail!("Unknown template \"{template_name}\" and no explicit size"),
    };

    let label = config
        .label
        .clone()
        .or_else(|| template.map(|t| t.name.to_string()))
        .unwrap_or_else(|| template_name.to_string());

    Ok((width, height, label))
}

fn preview_path(design: &Path) -> PathBuf {
    let stem = design
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("design");
    design.with_file_name(format!("{stem}-preview.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["compositor"];
        argv.extend_from_slice(args);
        CliConfig::from(CliArgs::try_parse_from(argv).expect("parse"))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["bg.png"]);
        assert_eq!(config.source, InputSource::Image(PathBuf::from("bg.png")));
        assert_eq!(config.export.format, ExportFormat::Png);
        assert_eq!(config.export.jpeg_quality, 85);
        assert!(config.compositor.load_system_fonts);
        assert!(config.hashtags.is_empty());
        assert!(!config.write_preview);
    }

    #[test]
    fn test_hashtags_repeat_and_split() {
        let config = parse(&["bg.png", "-t", "coffee, offer", "--hashtag", "newblend", "-t", ","]);
        assert_eq!(config.hashtags, vec!["coffee", "offer", "newblend"]);
    }

    #[test]
    fn test_format_and_fonts() {
        let config = parse(&[
            "bg.png",
            "--format",
            "jpg",
            "--jpeg-quality",
            "70",
            "--no-system-fonts",
            "--font-dir",
            "/opt/fonts",
            "--decode-timeout-ms",
            "250",
        ]);
        assert_eq!(config.export.format, ExportFormat::Jpeg);
        assert_eq!(config.export.jpeg_quality, 70);
        assert!(!config.compositor.load_system_fonts);
        assert_eq!(config.compositor.font_dirs, vec![PathBuf::from("/opt/fonts")]);
        assert_eq!(config.compositor.decode_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        assert!(CliArgs::try_parse_from(["compositor", "bg.png", "--jpeg-quality", "0"]).is_err());
    }

    #[test]
    fn test_requires_an_input() {
        assert!(CliArgs::try_parse_from(["compositor"]).is_err());
        let config = parse(&["--list-templates"]);
        assert_eq!(config.source, InputSource::None);
        assert!(config.list_templates);
    }

    #[test]
    fn test_image_and_manifest_conflict() {
        assert!(CliArgs::try_parse_from(["compositor", "bg.png", "--manifest", "m.json"]).is_err());
    }

    #[test]
    fn test_resolve_canvas_from_template() {
        let config = parse(&["bg.png", "--template", "instagram story"]);
        let (w, h, label) = resolve_canvas(&config).expect("canvas");
        assert_eq!((w, h), (1080, 1920));
        assert_eq!(label, "Instagram Story");
    }

    #[test]
    fn test_resolve_canvas_overrides() {
        let config = parse(&["bg.png", "--width", "640", "--label", "Spring Sale"]);
        let (w, h, label) = resolve_canvas(&config).expect("canvas");
        assert_eq!((w, h), (640, 1080));
        assert_eq!(label, "Spring Sale");

        let config = parse(&["bg.png", "--template", "Nope", "--width", "10", "--height", "20"]);
        let (w, h, label) = resolve_canvas(&config).expect("canvas");
        assert_eq!((w, h, label.as_str()), (10, 20, "Nope"));

        let config = parse(&["bg.png", "--template", "Nope"]);
        assert!(resolve_canvas(&config).is_err());
    }

    #[test]
    fn test_preview_path() {
        assert_eq!(
            preview_path(Path::new("/tmp/out/lotaya-ai-instagram-post.png")),
            PathBuf::from("/tmp/out/lotaya-ai-instagram-post-preview.png")
        );
    }

    #[test]
    fn test_templates_json_lists_presets() {
        let json = templates_json().expect("json");
        assert!(json.contains("\"Facebook Cover\""));
        assert!(json.contains("\"9:16\""));
    }
}
