use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cache_async_image::infrastructure::{AppConfig, CliArgs, ImageFetchCache};
use cache_async_image::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let log_path = config.effective_log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    info!(path = %log_path.display(), "Logging initialized");

    Ok(())
}

async fn create_app() -> Result<App> {
    let config = AppConfig::load(CliArgs::parse())?;

    init_logging(&config)?;

    info!(version = cache_async_image::VERSION, "Starting {}", cache_async_image::NAME);

    let url = config.image_url()?;
    let cache_dir = config.effective_cache_dir();
    info!(cache_dir = %cache_dir.display(), url = ?url, "Opening image cache");

    let cache = Arc::new(ImageFetchCache::with_defaults(cache_dir, config.timeout()).await?);

    Ok(App::new(url, cache))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app = create_app().await?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
