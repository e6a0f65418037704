//! CLI Integration Tests
//!
//! Runs the full command pipeline against files in a temporary directory.

use std::path::Path;

use clap::Parser;
use compositor_cli::{build_request, run, CliArgs, CliConfig};
use image::{Rgba, RgbaImage};

const PNG_1X1_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([200, 120, 40, 255]))
        .save(path)
        .expect("write png");
}

fn config(args: &[&str]) -> CliConfig {
    let mut argv = vec!["compositor", "--no-system-fonts"];
    argv.extend_from_slice(args);
    CliConfig::from(CliArgs::try_parse_from(argv).expect("parse"))
}

#[tokio::test]
async fn test_renders_png_with_preview() {
    let dir = tempfile::tempdir().expect("tempdir");
    let background = dir.path().join("bg.png");
    write_png(&background, 40, 30);
    let out = dir.path().join("out");

    let config = config(&[
        background.to_str().expect("utf-8 path"),
        "--caption",
        "A special offer for a new coffee blend",
        "--hashtag",
        "coffee,offer,newblend",
        "--template",
        "Pinterest Board Cover",
        "--output-dir",
        out.to_str().expect("utf-8 path"),
        "--preview",
    ]);

    let summary = run(&config).await.expect("run");

    assert_eq!(
        summary.design,
        out.join("lotaya-ai-pinterest-board-cover.png")
    );
    let design = image::open(&summary.design).expect("design").to_rgba8();
    assert_eq!(design.dimensions(), (600, 600));

    let preview_path = summary.preview.expect("preview path");
    let preview = image::open(&preview_path).expect("preview").to_rgba8();
    assert_eq!(preview.dimensions(), (300, 300));

    assert_eq!(
        summary.share_text,
        "A special offer for a new coffee blend\n\n#coffee #offer #newblend"
    );
}

#[tokio::test]
async fn test_renders_jpeg_with_custom_size() {
    let dir = tempfile::tempdir().expect("tempdir");
    let background = dir.path().join("bg.png");
    write_png(&background, 10, 10);

    let config = config(&[
        background.to_str().expect("utf-8 path"),
        "--width",
        "120",
        "--height",
        "60",
        "--label",
        "Spring Sale",
        "--format",
        "jpeg",
        "--output-dir",
        dir.path().to_str().expect("utf-8 path"),
    ]);

    let summary = run(&config).await.expect("run");
    assert_eq!(
        summary.design.file_name().and_then(|n| n.to_str()),
        Some("lotaya-ai-spring-sale.jpg")
    );
    let design = image::open(&summary.design).expect("design").to_rgb8();
    assert_eq!(design.dimensions(), (120, 60));
    assert!(summary.preview.is_none());
}

#[test]
fn test_manifest_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let manifest = dir.path().join("design.json");
    let json = serde_json::json!({
        "image": format!("data:image/png;base64,{PNG_1X1_BASE64}"),
        "caption": "Hello",
        "hashtags": ["one", "two"],
        "template": "Twitter Header",
    });
    std::fs::write(&manifest, json.to_string()).expect("write manifest");

    let config = config(&["--manifest", manifest.to_str().expect("utf-8 path")]);
    let request = build_request(&config).expect("request");

    assert_eq!((request.canvas_width, request.canvas_height), (1500, 500));
    assert_eq!(request.template_label, "Twitter Header");
    assert_eq!(request.hashtags, vec!["one", "two"]);
    assert!(request.background_image.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
}

#[test]
fn test_base64_image_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let encoded = dir.path().join("bg.b64");
    std::fs::write(&encoded, format!("{PNG_1X1_BASE64}\n")).expect("write");

    let config = config(&[encoded.to_str().expect("utf-8 path")]);
    let request = build_request(&config).expect("request");
    assert!(request.background_image.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    assert_eq!(request.template_label, "Instagram Post");
}

#[tokio::test]
async fn test_undecodable_background_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let background = dir.path().join("bg.png");
    std::fs::write(&background, [0u8, 159, 146, 150, 1, 2, 3]).expect("write");

    let config = config(&[
        background.to_str().expect("utf-8 path"),
        "--output-dir",
        dir.path().to_str().expect("utf-8 path"),
    ]);
    let err = run(&config).await.unwrap_err();
    assert!(format!("{err:#}").contains("decode"), "got {err:#}");
    assert!(!dir.path().join("lotaya-ai-instagram-post.png").exists());
}

#[test]
fn test_missing_manifest_is_reported() {
    let config = config(&["--manifest", "/definitely/missing.json"]);
    let err = build_request(&config).unwrap_err();
    assert!(err.to_string().contains("Failed to read manifest"));
}
