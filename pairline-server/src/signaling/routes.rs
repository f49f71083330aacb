use crate::config::ServerConfig;
use crate::signaling::{SignalingService, ws_handler};
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use pairline_core::RoomKey;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

pub fn router(service: SignalingService) -> Router {
    let cors = cors_layer(service.config());

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/rooms", post(create_room))
        .route("/rooms/{room}", get(room_status))
        .route("/health", get(health))
        .layer(cors)
        .with_state(service)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let Some(origin) = config.allowed_origin.as_deref() else {
        return layer.allow_origin(Any);
    };
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            warn!("Ignoring invalid allowed_origin {:?}: {}", origin, e);
            layer.allow_origin(Any)
        }
    }
}

/// Hands out a fresh key for the "create meeting" flow. The room itself only
/// exists once somebody joins it.
async fn create_room() -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(json!({ "room": RoomKey::generate() })),
    )
}

async fn room_status(
    Path(room): Path<String>,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    match service.hub().room_snapshot(&RoomKey::from(room)) {
        Some(snapshot) => Json(snapshot).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}
