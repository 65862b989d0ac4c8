mod config;
mod errors;
mod geo;
mod geocoding;
mod listings;
mod llm_client;
mod models;
mod office;
mod ranking;
mod recommendation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Intern Housing API v{}", env!("CARGO_PKG_VERSION"));
    config.warn_missing_keys();

    // One HTTP client shared by every provider integration
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    info!(
        "Provider HTTP client initialized (timeout: {}s, LLM model: {})",
        config.upstream_timeout_secs,
        llm_client::MODEL
    );

    if let Some(dir) = &config.static_dir {
        info!("Serving client bundle from {}", dir.display());
    }

    let state = AppState::new(config.clone(), http);

    // The browser client is served from a different origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
