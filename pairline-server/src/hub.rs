use crate::config::ServerConfig;
use crate::error::SignalingError;
use crate::registry::ConnectionRegistry;
use crate::room::{HandshakeCoordinator, JoinPolicy, RoomSnapshot, RoomState};
use crate::signaling::{LifecycleManager, RelayDispatcher, RelayMessage, SignalingOutput};
use pairline_core::{ClientMessage, ConnectionId, RoomKey, ServerMessage};
use std::sync::Arc;
use tracing::warn;

/// Owns the registry and room map for the lifetime of the process and routes
/// every client frame to the component responsible for it.
pub struct SignalingHub {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomState>,
    coordinator: HandshakeCoordinator,
    relay: RelayDispatcher,
    lifecycle: LifecycleManager,
    output: Arc<dyn SignalingOutput>,
}

impl SignalingHub {
    pub fn new(config: &ServerConfig, output: Arc<dyn SignalingOutput>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let rooms = Arc::new(RoomState::new());
        let relay = RelayDispatcher::new(
            rooms.clone(),
            output.clone(),
            config.max_pending_candidates,
        );
        let coordinator = HandshakeCoordinator::new(
            registry.clone(),
            rooms.clone(),
            relay.clone(),
            output.clone(),
            JoinPolicy::from(config),
        );
        let lifecycle = LifecycleManager::new(registry.clone(), rooms.clone(), output.clone());

        Self {
            registry,
            rooms,
            coordinator,
            relay,
            lifecycle,
            output,
        }
    }

    pub fn connect(&self) -> ConnectionId {
        self.registry.register()
    }

    pub fn disconnect(&self, id: &ConnectionId) -> bool {
        self.lifecycle.on_disconnect(id)
    }

    /// Decodes one text frame and handles it.
    pub fn handle_text(&self, id: &ConnectionId, text: &str) -> Result<(), SignalingError> {
        let message = serde_json::from_str::<ClientMessage>(text)?;
        self.handle_message(id, message)
    }

    pub fn handle_message(
        &self,
        id: &ConnectionId,
        mut message: ClientMessage,
    ) -> Result<(), SignalingError> {
        // Rooms are stored under the trimmed key; every frame must agree.
        let room = message.room_mut();
        *room = room.trimmed();

        match message {
            ClientMessage::JoinRoom { room, name } => {
                match self.coordinator.join(id, room.clone(), &name) {
                    Ok(_) => Ok(()),
                    Err(e) => {
                        warn!("Rejecting join of {} to room '{}': {}", id, room, e);
                        self.output.send(
                            id,
                            ServerMessage::JoinRejected {
                                room,
                                reason: e.reject_reason(),
                            },
                        );
                        Err(e)
                    }
                }
            }
            ClientMessage::ReturnName { room, name } => {
                self.coordinator.return_name(id, &room, &name)
            }
            ClientMessage::Offer { room, sdp } => self
                .relay
                .relay(&room, id, RelayMessage::Offer(sdp))
                .map(|_| ()),
            ClientMessage::Answer { room, sdp } => self
                .relay
                .relay(&room, id, RelayMessage::Answer(sdp))
                .map(|_| ()),
            ClientMessage::IceCandidate { room, candidate } => self
                .relay
                .relay(&room, id, RelayMessage::IceCandidate(candidate))
                .map(|_| ()),
            ClientMessage::RemoteDescriptionApplied { room } => self
                .coordinator
                .remote_description_applied(id, &room)
                .map(|_| ()),
            ClientMessage::LeaveRoom { room } => self.lifecycle.on_leave(id, &room),
        }
    }

    pub fn room_snapshot(&self, key: &RoomKey) -> Option<RoomSnapshot> {
        self.rooms.snapshot(key)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
