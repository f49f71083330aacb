use crate::integration::init_tracing;
use crate::utils::*;
use pairline_core::{RejectReason, RoomKey, ServerMessage};
use pairline_server::ServerConfig;

#[tokio::test]
async fn test_third_peer_rejected() -> anyhow::Result<()> {
    init_tracing();
    let (addr, service) = spawn_server(ServerConfig::default()).await?;

    let mut alice = TestClient::connect(addr).await?;
    let mut bob = TestClient::connect(addr).await?;
    pair_up(&mut alice, &mut bob, "abc123", "Alice", "Bob").await?;

    let mut carol = TestClient::connect(addr).await?;
    carol.send(&join("abc123", "Carol")).await?;
    assert_eq!(
        carol.recv().await?,
        ServerMessage::JoinRejected {
            room: RoomKey::from("abc123"),
            reason: RejectReason::RoomFull,
        }
    );

    // The pair is undisturbed.
    alice.expect_silence().await?;
    bob.expect_silence().await?;
    assert_eq!(
        service
            .hub()
            .room_snapshot(&RoomKey::from("abc123"))
            .map(|s| s.participants),
        Some(2)
    );

    // Carol is still connected and may use another room.
    join_as(&mut carol, "other", "Carol", pairline_core::Slot::Initiator).await?;

    Ok(())
}
