use crate::integration::init_tracing;
use crate::utils::*;
use pairline_core::{RoomKey, ServerMessage, Slot};
use pairline_server::ServerConfig;

#[tokio::test]
async fn test_peer_disconnect_notifies_survivor() -> anyhow::Result<()> {
    init_tracing();
    let (addr, service) = spawn_server(ServerConfig::default()).await?;

    let mut alice = TestClient::connect(addr).await?;
    let mut bob = TestClient::connect(addr).await?;
    pair_up(&mut alice, &mut bob, "abc123", "Alice", "Bob").await?;

    bob.close().await?;

    assert_eq!(
        alice.recv().await?,
        ServerMessage::PeerLeft {
            name: "Bob".to_string()
        }
    );
    alice.expect_silence().await?;

    let hub = service.hub();
    assert!(eventually(|| hub.room_snapshot(&RoomKey::from("abc123")).is_none()).await);
    assert!(eventually(|| hub.connection_count() == 1).await);

    // The key is free again; Carol starts a new session as initiator.
    let mut carol = TestClient::connect(addr).await?;
    join_as(&mut carol, "abc123", "Carol", Slot::Initiator).await?;

    // Alice was released by the teardown and can rejoin as the responder.
    join_as(&mut alice, "abc123", "Alice", Slot::Responder).await?;
    assert_eq!(
        carol.recv().await?,
        ServerMessage::PeerJoined {
            name: "Alice".to_string()
        }
    );

    Ok(())
}
