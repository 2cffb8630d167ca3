//! Slotwise - calendar-backed availability service
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use slotwise_api::{router, AppContext};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env before config so SLOTWISE_* overrides apply
    let dotenv = dotenvy::dotenv();

    let config = slotwise_infra::config::load().context("failed to load configuration")?;
    slotwise_infra::init_tracing(&config.logging).context("failed to initialise logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => info!(error = %err, "no .env file loaded"),
    }

    let bind_address = config.server.bind_address.clone();
    let ctx = Arc::new(AppContext::new_with_config(config).await.context("failed to build application context")?);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(address = %listener.local_addr()?, "slotwise listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("slotwise stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
