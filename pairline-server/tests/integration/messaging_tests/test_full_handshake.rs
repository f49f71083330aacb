use crate::integration::init_tracing;
use crate::utils::*;
use pairline_core::{ClientMessage, HandshakePhase, RoomKey, ServerMessage};
use pairline_server::ServerConfig;
use serde_json::json;

#[tokio::test]
async fn test_full_handshake() -> anyhow::Result<()> {
    init_tracing();
    let (addr, service) = spawn_server(ServerConfig::default()).await?;
    let room = RoomKey::from("abc123");

    let mut alice = TestClient::connect(addr).await?;
    let mut bob = TestClient::connect(addr).await?;
    pair_up(&mut alice, &mut bob, "abc123", "Alice", "Bob").await?;

    let offer_sdp = json!({"type": "offer", "sdp": "v=0 alice"});
    alice.send(&offer("abc123", offer_sdp.clone())).await?;
    assert_eq!(bob.recv().await?, ServerMessage::Offer { sdp: offer_sdp });

    bob.send(&ClientMessage::RemoteDescriptionApplied { room: room.clone() })
        .await?;

    let answer_sdp = json!({"type": "answer", "sdp": "v=0 bob"});
    bob.send(&answer("abc123", answer_sdp.clone())).await?;
    assert_eq!(alice.recv().await?, ServerMessage::Answer { sdp: answer_sdp });

    alice
        .send(&ClientMessage::RemoteDescriptionApplied { room: room.clone() })
        .await?;

    // Both sides applied: candidates now flow straight through.
    let c = json!({"candidate": "candidate:1 1 udp 2122260223 10.0.0.1 5000 typ host"});
    alice.send(&candidate("abc123", c.clone())).await?;
    assert_eq!(
        bob.recv().await?,
        ServerMessage::IceCandidate {
            candidate: c,
            seq: 0
        }
    );

    assert!(
        eventually(|| {
            service.hub().room_snapshot(&room).map(|s| s.phase) == Some(HandshakePhase::Established)
        })
        .await
    );

    Ok(())
}
