use crate::error::SignalingError;
use pairline_core::{ConnectionId, HandshakePhase, NegotiationState, Slot};
use serde_json::Value;
use std::collections::VecDeque;

/// Rooms pair exactly two participants.
pub const ROOM_CAPACITY: usize = 2;

/// Candidate held back until its receiver has applied a remote description.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCandidate {
    pub seq: u64,
    pub candidate: Value,
}

/// One occupied slot. References the connection by id; the registry owns it.
#[derive(Debug)]
pub struct Participant {
    pub id: ConnectionId,
    pub display_name: String,
    pub slot: Slot,
    pub state: NegotiationState,
    /// Set once this participant confirms it applied the peer's description.
    pub remote_applied: bool,
    /// Candidates addressed to this participant, in arrival order.
    pub pending_candidates: VecDeque<PendingCandidate>,
    candidates_sent: u64,
}

impl Participant {
    fn new(id: ConnectionId, display_name: String, slot: Slot) -> Self {
        Self {
            id,
            display_name,
            slot,
            state: NegotiationState::Pending,
            remote_applied: false,
            pending_candidates: VecDeque::new(),
            candidates_sent: 0,
        }
    }

    /// Ordinal of the next candidate this participant emits.
    pub fn next_candidate_seq(&mut self) -> u64 {
        let seq = self.candidates_sent;
        self.candidates_sent += 1;
        seq
    }
}

#[derive(Debug, Default)]
pub struct Room {
    participants: Vec<Participant>,
    pub phase: HandshakePhase,
    /// The initiator's name goes back to the newcomer once per session.
    pub name_returned: bool,
    retired: bool,
}

impl Room {
    pub fn new() -> Self {
        Self {
            participants: Vec::with_capacity(ROOM_CAPACITY),
            ..Self::default()
        }
    }

    /// Set once the room has been removed from the room map. A retired room
    /// must not admit anyone.
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub(crate) fn retire(&mut self) {
        self.retired = true;
    }

    /// Admits `id`. A full room is left untouched.
    pub fn add_participant(
        &mut self,
        id: ConnectionId,
        display_name: String,
    ) -> Result<Slot, SignalingError> {
        if self.contains(&id) {
            return Err(SignalingError::AlreadyJoined);
        }
        if self.participants.len() >= ROOM_CAPACITY {
            return Err(SignalingError::RoomFull);
        }
        if self.participants.is_empty() {
            // Could be a room left behind in Closing by a teardown that raced this join.
            self.phase = HandshakePhase::Empty;
            self.name_returned = false;
        }

        let slot = if self.slot_taken(Slot::Initiator) {
            Slot::Responder
        } else {
            Slot::Initiator
        };
        self.participants
            .push(Participant::new(id, display_name, slot));
        Ok(slot)
    }

    pub fn remove_participant(&mut self, id: &ConnectionId) -> Option<Participant> {
        let idx = self.position(id)?;
        Some(self.participants.remove(idx))
    }

    /// Empties the room, handing back whoever was still inside.
    pub fn drain_participants(&mut self) -> Vec<Participant> {
        std::mem::take(&mut self.participants)
    }

    pub fn participant(&self, id: &ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == *id)
    }

    pub fn participant_mut(&mut self, id: &ConnectionId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == *id)
    }

    pub fn participant_in(&self, slot: Slot) -> Option<&Participant> {
        self.participants.iter().find(|p| p.slot == slot)
    }

    /// The participant `id` and, if present, the other slot.
    pub fn sender_and_peer_mut(
        &mut self,
        id: &ConnectionId,
    ) -> Option<(&mut Participant, Option<&mut Participant>)> {
        let idx = self.position(id)?;
        let (head, tail) = self.participants.split_at_mut(1);
        match (idx, head, tail) {
            (0, [sender], []) => Some((sender, None)),
            (0, [sender], [peer, ..]) => Some((sender, Some(peer))),
            (_, [peer], [sender, ..]) => Some((sender, Some(peer))),
            _ => None,
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn participants_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.participants.iter_mut()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn slot_taken(&self, slot: Slot) -> bool {
        self.participants.iter().any(|p| p.slot == slot)
    }

    fn position(&self, id: &ConnectionId) -> Option<usize> {
        self.participants.iter().position(|p| p.id == *id)
    }
}
