//! Newsroom API - Main entry point
//!
//! Serves the site's content API:
//! - news, videos and trending collections in one content document
//! - article text stored per filename
//! - newsletter subscriptions
//! - an upload acknowledgement endpoint
//!
//! All state lives in the blob store; the process itself keeps nothing
//! between requests.

mod config;
mod content;
mod handlers;
mod path;
mod router;
mod runtime;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::content::seed::load_seed;
use crate::runtime::services::{BlobStore, Services};
use crate::runtime::{Context, RequestId};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub services: Services,
}

impl AppState {
    /// Per-request handler context
    pub fn context(&self, request_id: RequestId) -> Context {
        Context::with_request_id(self.services.clone(), request_id)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,newsroom_api=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Newsroom API");

    // Load configuration
    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let seed = load_seed(config.seed_file.as_deref()).await?;

    let blobs = BlobStore::start(config.blob_config())
        .await
        .context("starting blob store")?;
    tracing::info!("Blob store started: {:?}", blobs);

    let services = Services::new(blobs.clone(), seed);

    // Write the seed into a fresh store. Requests still fall back to the
    // seed if this fails.
    match services.content().provision().await {
        Ok(true) => tracing::info!("Content store provisioned with seed content"),
        Ok(false) => tracing::debug!("Content store already provisioned"),
        Err(e) => tracing::warn!("Could not provision content store: {}", e),
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        services,
    });

    let app = router::create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = blobs.shutdown().await {
        tracing::warn!("Blob store did not shut down cleanly: {}", e);
    }
    tracing::info!("Newsroom API stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
