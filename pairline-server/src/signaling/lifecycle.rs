use crate::error::SignalingError;
use crate::registry::{Binding, ConnectionRegistry};
use crate::room::{RoomState, lock_room};
use crate::signaling::SignalingOutput;
use pairline_core::{ConnectionId, HandshakePhase, RoomKey, ServerMessage};
use std::sync::Arc;
use tracing::{debug, info};

/// Unwinds room state when a participant disconnects or leaves.
///
/// Any departure closes the whole room: the survivor gets one `peer-left`,
/// loses its binding and may join again, but is never re-paired automatically.
pub struct LifecycleManager {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomState>,
    output: Arc<dyn SignalingOutput>,
}

impl LifecycleManager {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        rooms: Arc<RoomState>,
        output: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            registry,
            rooms,
            output,
        }
    }

    /// Returns whether a room was torn down. Repeated calls are no-ops.
    pub fn on_disconnect(&self, id: &ConnectionId) -> bool {
        let Some(conn) = self.registry.unregister(id) else {
            debug!("Disconnect for {} already handled", id);
            return false;
        };
        match conn.binding {
            Some(binding) => self.close_room(id, &binding),
            None => false,
        }
    }

    /// Explicit leave; the connection stays registered and may join again.
    pub fn on_leave(&self, id: &ConnectionId, key: &RoomKey) -> Result<(), SignalingError> {
        let current = self.registry.binding(id)?.ok_or(SignalingError::UnknownRoom)?;
        if current.room != *key {
            return Err(SignalingError::NotInRoom);
        }
        // A concurrent teardown by the peer may already have unbound us.
        let binding = self.registry.unbind(id).ok_or(SignalingError::UnknownRoom)?;
        if self.close_room(id, &binding) {
            Ok(())
        } else {
            Err(SignalingError::UnknownRoom)
        }
    }

    fn close_room(&self, id: &ConnectionId, binding: &Binding) -> bool {
        let Some(handle) = self.rooms.get(&binding.room) else {
            debug!("Room '{}' already gone for {}", binding.room, id);
            return false;
        };
        let mut room = lock_room(&handle);
        let Some(departed) = room.remove_participant(id) else {
            debug!("{} is no longer part of room '{}'", id, binding.room);
            return false;
        };
        room.phase = HandshakePhase::Closing;
        info!(
            "'{}' ({}) left room '{}'",
            departed.display_name, id, binding.room
        );

        for survivor in room.drain_participants() {
            if !survivor.pending_candidates.is_empty() {
                debug!(
                    "Discarding {} queued candidates for {}",
                    survivor.pending_candidates.len(),
                    survivor.id
                );
            }
            self.output.send(
                &survivor.id,
                ServerMessage::PeerLeft {
                    name: departed.display_name.clone(),
                },
            );
            self.registry.unbind(&survivor.id);
        }

        drop(room);
        self.rooms.remove_if_empty(&binding.room);
        true
    }
}
