//! Boot a gamehub page from the command line
//!
//! Probes a page's HTML for section markers, loads the sections it finds
//! and prints the filled markup (or the JSON report).

use clap::{Parser, ValueEnum};
use gamehub_pages::{
    build_section_table, render_page, CachedLoader, HtmlProbe, PageOrchestrator, Result, Section,
    SiteConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use timed_store::{Clock, FileStore, KeyValueStore, SystemClock, TimedStore};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "gamehub-pages")]
#[command(about = "Load the content sections of a gamehub page")]
struct Args {
    /// Page HTML to probe for section markers
    #[arg(long)]
    page: Option<PathBuf>,

    /// Section to load (label or marker class), repeatable; ignored with --page
    #[arg(long = "section")]
    sections: Vec<Section>,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    format: OutputFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::from_default_env().add_directive("gamehub_pages=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };

    let args = Args::parse();
    let config = SiteConfig::from_env();
    info!(
        ttl_minutes = config.cache_ttl_minutes,
        cache_dir = %config.cache_dir.display(),
        "Booting page"
    );

    let files = FileStore::new(config.cache_dir.clone());
    files.init().await?;
    let store = TimedStore::with_clock(
        Arc::new(files) as Arc<dyn KeyValueStore>,
        Arc::new(SystemClock) as Arc<dyn Clock>,
    );
    let loader = CachedLoader::with_stale_multiplier(store, config.stale_multiplier);

    let fetcher = bounded_fetch::BoundedFetcher::new();
    let orchestrator = PageOrchestrator::new(loader, build_section_table(&config, &fetcher));

    let report = match (&args.page, args.sections.is_empty()) {
        (Some(path), _) => {
            let html = tokio::fs::read_to_string(path).await?;
            orchestrator.boot(&HtmlProbe::from_html(&html)).await
        }
        (None, false) => orchestrator.boot(args.sections.as_slice()).await,
        (None, true) => orchestrator.boot(&Section::ALL[..]).await,
    };

    for section in report.failed() {
        warn!(%section, "Section failed to load");
    }

    match args.format {
        OutputFormat::Html => println!("{}", render_page(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
