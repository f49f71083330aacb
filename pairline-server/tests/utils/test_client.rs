use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use pairline_core::{ClientMessage, ConnectionId, ServerMessage};

use super::signal_helpers::{SIGNAL_TIMEOUT_MS, SILENCE_MS};

/// Browser stand-in speaking the signaling protocol over a real WebSocket.
pub struct TestClient {
    /// Id announced by the server's welcome frame.
    pub connection_id: ConnectionId,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connects to `/ws` and consumes the welcome frame.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (stream, _) = connect_async(format!("ws://{}/ws", addr))
            .await
            .context("Failed to open WebSocket")?;
        let mut client = Self {
            connection_id: ConnectionId::default(),
            stream,
        };

        match client.recv().await? {
            ServerMessage::Welcome { connection_id } => client.connection_id = connection_id,
            other => anyhow::bail!("Expected welcome, got {:?}", other),
        }
        tracing::debug!("[TestClient] Connected as {}", client.connection_id);
        Ok(client)
    }

    pub async fn send(&mut self, msg: &ClientMessage) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        self.send_raw(&json).await
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(Message::text(text.to_string()))
            .await
            .context("Failed to send frame")
    }

    /// Next signaling frame, skipping control frames.
    pub async fn recv(&mut self) -> Result<ServerMessage> {
        tokio::time::timeout(Duration::from_millis(SIGNAL_TIMEOUT_MS), self.next_message())
            .await
            .context("Timeout waiting for server frame")?
    }

    /// Succeeds if no signaling frame arrives for a short while.
    pub async fn expect_silence(&mut self) -> Result<()> {
        match tokio::time::timeout(Duration::from_millis(SILENCE_MS), self.next_message()).await {
            Err(_) => Ok(()),
            Ok(Ok(msg)) => anyhow::bail!("Expected silence, got {:?}", msg),
            Ok(Err(e)) => Err(e),
        }
    }

    async fn next_message(&mut self) -> Result<ServerMessage> {
        loop {
            let frame = self
                .stream
                .next()
                .await
                .context("WebSocket closed")?
                .context("WebSocket error")?;
            match frame {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).context("Undecodable server frame");
                }
                Message::Close(_) => anyhow::bail!("Server closed the connection"),
                _ => continue,
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream
            .close(None)
            .await
            .context("Failed to close WebSocket")
    }
}
