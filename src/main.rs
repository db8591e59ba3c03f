use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kpiboard::api::{self, AppState};
use kpiboard::config::Config;
use kpiboard::report::ViewOptions;
use kpiboard::storage::{CachedSource, HttpSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration ({} sites)", config.sites.len());

    let url = config
        .source
        .url
        .clone()
        .context("KPIBOARD_SOURCE_URL must be set")?;
    let http = HttpSource::new(url, Duration::from_secs(config.source.timeout_secs))?;

    match config.source.cache_path {
        Some(ref path) => info!("Dataset cache file: {}", path.display()),
        None => info!("Dataset disk cache disabled"),
    }
    let source = Arc::new(CachedSource::new(
        Arc::new(http),
        config.source.cache_path.clone(),
    ));

    let state = Arc::new(AppState::new(
        source,
        config.sites.clone(),
        ViewOptions::from_config(&config.view),
    ));

    // A dataset that cannot be loaded at startup is fatal
    info!("Loading dataset...");
    let snapshot = state.load().await.context("Failed to load dataset")?;
    info!(
        "Dataset loaded for {} ({} collections, {} page rows)",
        snapshot.month,
        snapshot.dataset.collection_names().count(),
        snapshot.dataset.pages().len()
    );

    let router = api::create_api_router(state);

    let addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 API server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
