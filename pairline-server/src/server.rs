use crate::config::ServerConfig;
use crate::signaling::{SignalingService, router};
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

/// Serves signaling until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let bind_addr = config.bind_addr.clone();
    let service = SignalingService::new(config);
    let app = router(service.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Signaling server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!(
        "Signaling server stopped with {} connections and {} rooms still live",
        service.hub().connection_count(),
        service.hub().room_count()
    );
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
