mod app;
mod handlers;
mod models;
mod services;
mod utils;

use anyhow::Context;
use app::config::Config;
use app::router::build_router;
use services::{GatewayClient, InMemoryTrackingStore, PixService, UtmifyClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    info!("Starting PIX relay on port {}", config.server_port);

    let gateway = Arc::new(GatewayClient::new(&config).context("failed to build gateway client")?);
    let notifier = Arc::new(UtmifyClient::new(&config).context("failed to build Utmify client")?);
    // UTMs vivem só em memória, perdidas ao reiniciar
    let tracking = Arc::new(InMemoryTrackingStore::new());

    let pix_service = Arc::new(PixService::new(gateway, notifier, tracking));
    let app = build_router(pix_service);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
