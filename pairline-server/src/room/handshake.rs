use crate::config::ServerConfig;
use crate::error::SignalingError;
use crate::registry::ConnectionRegistry;
use crate::room::room::ROOM_CAPACITY;
use crate::room::{Room, RoomState, lock_room};
use crate::signaling::{RelayDispatcher, SignalingOutput};
use pairline_core::{
    ConnectionId, HandshakePhase, NegotiationState, RoomKey, ServerMessage, Slot,
};
use std::sync::{Arc, MutexGuard};
use tracing::{debug, info};

/// Input rules applied to joins and returned names.
#[derive(Debug, Clone)]
pub struct JoinPolicy {
    pub max_room_key_len: usize,
    pub max_display_name_len: usize,
    pub fallback_display_name: String,
}

impl From<&ServerConfig> for JoinPolicy {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_room_key_len: config.max_room_key_len,
            max_display_name_len: config.max_display_name_len,
            fallback_display_name: config.fallback_display_name.clone(),
        }
    }
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl JoinPolicy {
    pub fn room_key(&self, key: RoomKey) -> Result<RoomKey, SignalingError> {
        let trimmed = key.as_str().trim();
        if trimmed.is_empty() {
            return Err(SignalingError::MalformedPayload("empty room key".into()));
        }
        if trimmed.chars().count() > self.max_room_key_len {
            return Err(SignalingError::MalformedPayload(format!(
                "room key longer than {} characters",
                self.max_room_key_len
            )));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(SignalingError::MalformedPayload(
                "room key contains whitespace or control characters".into(),
            ));
        }
        Ok(RoomKey::from(trimmed))
    }

    pub fn display_name(&self, name: &str) -> String {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return self.fallback_display_name.clone();
        }
        trimmed.chars().take(self.max_display_name_len).collect()
    }
}

/// Assigns slots and drives name exchange and offer/answer sequencing.
///
/// Phases per room: `Waiting` with one participant, `Negotiating` once the
/// responder arrives, `Established` when both sides confirmed their remote
/// description. The initiator is told about the newcomer; the newcomer
/// hears nothing until the initiator returns its name.
pub struct HandshakeCoordinator {
    registry: Arc<ConnectionRegistry>,
    rooms: Arc<RoomState>,
    relay: RelayDispatcher,
    output: Arc<dyn SignalingOutput>,
    policy: JoinPolicy,
}

impl HandshakeCoordinator {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        rooms: Arc<RoomState>,
        relay: RelayDispatcher,
        output: Arc<dyn SignalingOutput>,
        policy: JoinPolicy,
    ) -> Self {
        Self {
            registry,
            rooms,
            relay,
            output,
            policy,
        }
    }

    pub fn join(
        &self,
        id: &ConnectionId,
        room_key: RoomKey,
        display_name: &str,
    ) -> Result<Slot, SignalingError> {
        let key = self.policy.room_key(room_key)?;
        let name = self.policy.display_name(display_name);
        if self.registry.binding(id)?.is_some() {
            return Err(SignalingError::AlreadyJoined);
        }

        loop {
            let handle = self.rooms.get_or_create(&key);
            let room = lock_room(&handle);
            if room.is_retired() {
                debug!("Room '{}' was deleted under {}, retrying", key, id);
                continue;
            }
            return self.admit(id, &key, name, room);
        }
    }

    /// Seats `id` in the locked `room` and announces it.
    fn admit(
        &self,
        id: &ConnectionId,
        key: &RoomKey,
        name: String,
        mut room: MutexGuard<'_, Room>,
    ) -> Result<Slot, SignalingError> {
        let slot = match room.add_participant(*id, name.clone()) {
            Ok(slot) => slot,
            Err(e) => {
                drop(room);
                self.rooms.remove_if_empty(key);
                return Err(e);
            }
        };
        if let Err(e) = self.registry.join(id, key, &name) {
            // Unregistered between the binding check and now.
            room.remove_participant(id);
            drop(room);
            self.rooms.remove_if_empty(key);
            return Err(e);
        }

        self.output.send(
            id,
            ServerMessage::Joined {
                room: key.clone(),
                slot,
            },
        );

        match slot {
            Slot::Initiator => {
                room.phase = HandshakePhase::Waiting;
                info!("'{}' ({}) is waiting in room '{}'", name, id, key);
            }
            Slot::Responder => {
                room.phase = HandshakePhase::Negotiating;
                if let Some(initiator) = room.participant_in(Slot::Initiator) {
                    self.output
                        .send(&initiator.id, ServerMessage::PeerJoined { name: name.clone() });
                }
                info!("'{}' ({}) joined room '{}', negotiating", name, id, key);
            }
        }
        Ok(slot)
    }

    /// One-shot relay of the initiator's name to the newcomer.
    pub fn return_name(
        &self,
        id: &ConnectionId,
        key: &RoomKey,
        display_name: &str,
    ) -> Result<(), SignalingError> {
        let handle = self.rooms.get(key).ok_or(SignalingError::UnknownRoom)?;
        let mut room = lock_room(&handle);
        let sender = room.participant(id).ok_or(SignalingError::NotInRoom)?;
        if sender.slot != Slot::Initiator {
            return Err(SignalingError::NotInitiator);
        }
        if room.name_returned {
            return Err(SignalingError::NameAlreadyReturned);
        }
        let newcomer = room
            .participant_in(Slot::Responder)
            .ok_or(SignalingError::NoPeer)?;

        let name = self.policy.display_name(display_name);
        self.output
            .send(&newcomer.id, ServerMessage::PeerName { name });
        room.name_returned = true;
        Ok(())
    }

    /// `id` applied the peer's session description: release its candidates.
    pub fn remote_description_applied(
        &self,
        id: &ConnectionId,
        key: &RoomKey,
    ) -> Result<usize, SignalingError> {
        let handle = self.rooms.get(key).ok_or(SignalingError::UnknownRoom)?;
        let mut room = lock_room(&handle);
        let participant = room.participant_mut(id).ok_or(SignalingError::NotInRoom)?;
        participant.remote_applied = true;
        let flushed = self.relay.flush_pending(participant);

        let both_applied =
            room.len() == ROOM_CAPACITY && room.participants().all(|p| p.remote_applied);
        if both_applied && room.phase != HandshakePhase::Established {
            for p in room.participants_mut() {
                p.state = NegotiationState::Connected;
            }
            room.phase = HandshakePhase::Established;
            info!("Room '{}' established", key);
        } else {
            debug!("{} applied its remote description in room '{}'", id, key);
        }
        Ok(flushed)
    }
}
