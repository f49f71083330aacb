use crate::config::ServerConfig;
use crate::hub::SignalingHub;
use crate::signaling::SignalingOutput;
use axum::extract::ws::Message;
use dashmap::DashMap;
use pairline_core::{ConnectionId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Outbound WebSocket queues, one per live connection.
#[derive(Default)]
pub struct ConnectionSinks {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

impl ConnectionSinks {
    fn add(&self, id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(id, tx);
    }

    fn remove(&self, id: &ConnectionId) {
        self.peers.remove(id);
    }
}

impl SignalingOutput for ConnectionSinks {
    fn send(&self, connection_id: &ConnectionId, message: ServerMessage) {
        if let Some(peer) = self.peers.get(connection_id) {
            match serde_json::to_string(&message) {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", connection_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize signal message: {}", e),
            }
        } else {
            warn!(
                "Attempted to send signal to disconnected connection {}",
                connection_id
            );
        }
    }
}

/// Axum state shared by every handler.
#[derive(Clone)]
pub struct SignalingService {
    hub: Arc<SignalingHub>,
    sinks: Arc<ConnectionSinks>,
    config: Arc<ServerConfig>,
}

impl SignalingService {
    pub fn new(config: ServerConfig) -> Self {
        let sinks = Arc::new(ConnectionSinks::default());
        let hub = Arc::new(SignalingHub::new(&config, sinks.clone()));
        Self {
            hub,
            sinks,
            config: Arc::new(config),
        }
    }

    pub fn hub(&self) -> &SignalingHub {
        &self.hub
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registers a new connection and its outbound queue. Everything is
    /// released when the returned session is dropped.
    pub fn attach(&self, tx: mpsc::UnboundedSender<Message>) -> ConnectionSession {
        let id = self.hub.connect();
        self.sinks.add(id, tx);
        self.sinks.send(&id, ServerMessage::Welcome { connection_id: id });
        ConnectionSession {
            id,
            service: self.clone(),
        }
    }

    fn detach(&self, id: &ConnectionId) {
        self.hub.disconnect(id);
        self.sinks.remove(id);
        info!("Connection {} released", id);
    }
}

/// Scoped registration of one WebSocket connection.
pub struct ConnectionSession {
    id: ConnectionId,
    service: SignalingService,
}

impl ConnectionSession {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionSession {
    fn drop(&mut self) {
        self.service.detach(&self.id);
    }
}
