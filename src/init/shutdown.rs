use axum_server::Handle;
use std::{io, time::Duration};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Wait for Ctrl+C or SIGTERM, then stop the server.
///
/// Cancels `shutdown` so in-flight requests observe it, and gives open
/// connections `grace` to drain before they are closed.
pub async fn shutdown_on_signal(handle: Handle, shutdown: CancellationToken, grace: Duration) {
    if let Err(e) = wait_for_signal().await {
        tracing::error!(error = %e, "failed to listen for shutdown signals");
        return;
    }

    tracing::info!(?grace, "shutdown signal received, draining connections");
    trigger_shutdown(&handle, &shutdown, grace);
}

pub fn trigger_shutdown(handle: &Handle, shutdown: &CancellationToken, grace: Duration) {
    shutdown.cancel();
    handle.graceful_shutdown(Some(grace));
}

async fn wait_for_signal() -> io::Result<()> {
    tokio::select! {
        result = signal::ctrl_c() => result,
        result = wait_sigterm() => result,
    }
}

#[cfg(unix)]
async fn wait_sigterm() -> io::Result<()> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_sigterm() -> io::Result<()> {
    std::future::pending().await
}
