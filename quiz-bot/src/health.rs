//! Liveness endpoint for hosting platforms that expect an open HTTP port.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Body returned by every health route.
pub const HEALTH_BODY: &str = "Bot is running";

async fn health() -> &'static str {
    HEALTH_BODY
}

/// `GET /` and `GET /health`.
pub fn router() -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
}

/// Binds `0.0.0.0:port`. Done before anything else starts so a taken port fails startup.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind health endpoint on {}", addr))?;
    info!(addr = %addr, "Health endpoint listening");
    Ok(listener)
}

/// Serves the health routes on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
        .context("Health endpoint failed")?;
    Ok(())
}
