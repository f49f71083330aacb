use crate::integration::init_tracing;
use crate::utils::*;
use axum::http::StatusCode;
use pairline_core::Slot;
use pairline_server::{ServerConfig, router};
use serde_json::Value;

#[tokio::test]
async fn test_room_endpoints() -> anyhow::Result<()> {
    init_tracing();
    let (addr, service) = spawn_server(ServerConfig::default()).await?;
    let app = router(service.clone());

    let (status, body) = call(app.clone(), "GET", "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"OK");

    let (status, body) = call(app.clone(), "POST", "/rooms").await?;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&body)?;
    let room = created["room"].as_str().expect("room key").to_string();
    assert_eq!(room.len(), 10);

    // Nothing exists until somebody joins.
    let (status, _) = call(app.clone(), "GET", &format!("/rooms/{}", room)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut alice = TestClient::connect(addr).await?;
    join_as(&mut alice, &room, "Alice", Slot::Initiator).await?;

    let (status, body) = call(app, "GET", &format!("/rooms/{}", room)).await?;
    assert_eq!(status, StatusCode::OK);
    let snapshot: Value = serde_json::from_slice(&body)?;
    assert_eq!(snapshot["room"], room.as_str());
    assert_eq!(snapshot["participants"], 1);
    assert_eq!(snapshot["phase"], "waiting");

    Ok(())
}
