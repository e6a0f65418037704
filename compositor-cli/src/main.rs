//! # Compositor
//!
//! Command-line design compositor.

use clap::Parser;
use compositor_cli::{run, templates_json, CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with environment-based configuration.
///
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,compositor_renderer=debug,compositor_cli=debug")
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = CliConfig::from(CliArgs::parse());

    if config.list_templates {
        println!("{}", templates_json()?);
        return Ok(());
    }

    let summary = run(&config).await?;

    println!("{}", summary.design.display());
    if let Some(preview) = &summary.preview {
        println!("{}", preview.display());
    }
    if config.print_share_text {
        println!("\n{}", summary.share_text);
    }

    tracing::info!("Design written to {}", summary.design.display());
    Ok(())
}
