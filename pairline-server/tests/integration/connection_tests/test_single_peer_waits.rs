use crate::integration::init_tracing;
use crate::utils::*;
use pairline_core::{HandshakePhase, RoomKey, Slot};
use pairline_server::ServerConfig;

#[tokio::test]
async fn test_single_peer_waits() -> anyhow::Result<()> {
    init_tracing();
    let (addr, service) = spawn_server(ServerConfig::default()).await?;

    let mut alice = TestClient::connect(addr).await?;
    join_as(&mut alice, "abc123", "Alice", Slot::Initiator).await?;

    // Nobody to pair with yet.
    alice.expect_silence().await?;
    let snapshot = service
        .hub()
        .room_snapshot(&RoomKey::from("abc123"))
        .expect("room exists");
    assert_eq!(snapshot.participants, 1);
    assert_eq!(snapshot.phase, HandshakePhase::Waiting);

    Ok(())
}
