//! HTTP listener and graceful shutdown.

use anyhow::Context;
use axum::ServiceExt;
use axum::extract::Request;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::AppConfig;
use crate::routes::App;

/// Binds `HOST:PORT` from `config` and serves `app` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the connection loop
/// fails.
pub async fn serve(config: &AppConfig, app: App) -> anyhow::Result<()> {
    let address = config.server.bind_address();

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    let local_address = listener.local_addr()?;
    tracing::info!(
        address = %local_address,
        environment = ?config.environment,
        storage_mode = ?config.repository.storage_mode,
        "Task CRUD API listening"
    );

    serve_until(listener, app, shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Serves `app` on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an I/O error if the connection loop fails.
pub async fn serve_until<F>(listener: TcpListener, app: App, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await
}

// =============================================================================
// Shutdown Signal
// =============================================================================

async fn interrupt() {
    if let Err(error) = signal::ctrl_c().await {
        tracing::error!(%error, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            tracing::error!(%error, "SIGTERM handler unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

async fn shutdown_signal() {
    let signal_name = tokio::select! {
        () = interrupt() => "SIGINT",
        () = terminate() => "SIGTERM",
    };

    tracing::info!(signal = signal_name, "Draining connections before exit");
}

// =============================================================================
// Tests
// =============================================================================
