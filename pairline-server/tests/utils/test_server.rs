use anyhow::{Context, Result};
use axum::Router;
use axum::body::{self, Body, Bytes};
use axum::http::{Request, StatusCode};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::util::ServiceExt;

use pairline_server::{ServerConfig, SignalingService, router};

/// Runs the real router on an ephemeral port.
pub async fn spawn_server(config: ServerConfig) -> Result<(SocketAddr, SignalingService)> {
    let service = SignalingService::new(config);
    let app = router(service.clone());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("[TestServer] {}", e);
        }
    });

    Ok((addr, service))
}

/// Sends one bodiless request straight through `app`.
pub async fn call(app: Router, method: &str, uri: &str) -> Result<(StatusCode, Bytes)> {
    let response = app
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .context("Failed to read response body")?;
    Ok((status, bytes))
}

/// Polls until `check` holds, for at most a second.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    check()
}
