use crate::integration::init_tracing;
use crate::utils::*;
use pairline_core::{ClientMessage, RoomKey, ServerMessage, Slot};
use pairline_server::ServerConfig;

#[tokio::test]
async fn test_explicit_leave() -> anyhow::Result<()> {
    init_tracing();
    let (addr, service) = spawn_server(ServerConfig::default()).await?;

    let mut alice = TestClient::connect(addr).await?;
    let mut bob = TestClient::connect(addr).await?;
    pair_up(&mut alice, &mut bob, "abc123", "Alice", "Bob").await?;

    bob.send(&ClientMessage::LeaveRoom {
        room: RoomKey::from("abc123"),
    })
    .await?;
    assert_eq!(
        alice.recv().await?,
        ServerMessage::PeerLeft {
            name: "Bob".to_string()
        }
    );

    // Bob keeps his connection and can start somewhere else.
    join_as(&mut bob, "elsewhere", "Bob", Slot::Initiator).await?;
    assert_eq!(service.hub().connection_count(), 2);

    // A later disconnect produces nothing further for Alice.
    bob.close().await?;
    alice.expect_silence().await?;

    Ok(())
}
