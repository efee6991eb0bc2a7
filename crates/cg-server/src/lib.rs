//! cg-server: HTTP surface for the metadata gateway.
//!
//! - Axum router with correlation-id middleware, CORS, request tracing and
//!   an OpenAPI/Swagger UI
//! - Locale and correlation extractors that never reject
//! - Background cache sweeper
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod sweeper;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;

use cg_core::config::Config;

use crate::context::AppContext;

/// Start the cinegate server.
///
/// Builds the [`AppContext`], spawns the cache sweeper and serves HTTP until
/// a shutdown signal arrives.
pub async fn start(config: Config, metrics: Option<PrometheusHandle>) -> cg_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let ctx = AppContext::new(config.clone(), metrics)?;
    let cancel = CancellationToken::new();

    let sweeper_handle = match config.cache.sweep_interval() {
        Some(interval) => Some(tokio::spawn(sweeper::run_sweeper(
            ctx.cache.clone(),
            interval,
            cancel.clone(),
        ))),
        None => {
            tracing::info!("Cache sweeper disabled; expired entries are dropped on read");
            None
        }
    };

    let host = config.server.host.as_str();
    let port = config.server.port;
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| cg_core::Error::Internal(format!("Failed to bind to {host}:{port}: {e}")))?;
    let addr = listener.local_addr()?;

    tracing::info!("Starting server on {addr}");

    let app = router::build_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    if let Some(handle) = sweeper_handle {
        let _ = handle.await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}
