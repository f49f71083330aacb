use crate::error::SignalingError;
use crate::room::{Participant, PendingCandidate, RoomState, lock_room};
use crate::signaling::SignalingOutput;
use pairline_core::{ConnectionId, NegotiationState, RoomKey, ServerMessage};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Payload kinds moved between the two participants of a room.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    Offer(Value),
    Answer(Value),
    IceCandidate(Value),
}

impl RelayMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Offer(_) => "offer",
            Self::Answer(_) => "answer",
            Self::IceCandidate(_) => "ice-candidate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Forwarded,
    /// Held for a receiver that has not applied a remote description yet.
    Queued,
    /// The receiver's candidate queue is full.
    Dropped,
}

/// Forwards signaling payloads verbatim to the other slot of a room.
#[derive(Clone)]
pub struct RelayDispatcher {
    rooms: Arc<RoomState>,
    output: Arc<dyn SignalingOutput>,
    max_pending_candidates: usize,
}

impl RelayDispatcher {
    pub fn new(
        rooms: Arc<RoomState>,
        output: Arc<dyn SignalingOutput>,
        max_pending_candidates: usize,
    ) -> Self {
        Self {
            rooms,
            output,
            max_pending_candidates,
        }
    }

    pub fn relay(
        &self,
        key: &RoomKey,
        sender: &ConnectionId,
        message: RelayMessage,
    ) -> Result<RelayOutcome, SignalingError> {
        let handle = self.rooms.get(key).ok_or(SignalingError::UnknownRoom)?;
        let mut room = lock_room(&handle);
        let (from, to) = room
            .sender_and_peer_mut(sender)
            .ok_or(SignalingError::NotInRoom)?;
        let Some(to) = to else {
            debug!(
                "Dropping {} from {} in room '{}': no peer yet",
                message.kind(),
                sender,
                key
            );
            return Err(SignalingError::NoPeer);
        };

        match message {
            RelayMessage::Offer(sdp) => {
                from.state = NegotiationState::OfferSent;
                self.output.send(&to.id, ServerMessage::Offer { sdp });
                Ok(RelayOutcome::Forwarded)
            }
            RelayMessage::Answer(sdp) => {
                from.state = NegotiationState::AnswerSent;
                self.output.send(&to.id, ServerMessage::Answer { sdp });
                Ok(RelayOutcome::Forwarded)
            }
            RelayMessage::IceCandidate(candidate) => {
                let seq = from.next_candidate_seq();
                if to.remote_applied {
                    self.output
                        .send(&to.id, ServerMessage::IceCandidate { candidate, seq });
                    return Ok(RelayOutcome::Forwarded);
                }
                if to.pending_candidates.len() >= self.max_pending_candidates {
                    warn!(
                        "Candidate queue for {} in room '{}' is full, dropping candidate #{}",
                        to.id, key, seq
                    );
                    return Ok(RelayOutcome::Dropped);
                }
                debug!(
                    "Queueing candidate #{} for {} until its remote description is applied",
                    seq, to.id
                );
                to.pending_candidates
                    .push_back(PendingCandidate { seq, candidate });
                Ok(RelayOutcome::Queued)
            }
        }
    }

    /// Delivers everything queued for `receiver`, oldest first.
    pub fn flush_pending(&self, receiver: &mut Participant) -> usize {
        let mut flushed = 0;
        while let Some(pending) = receiver.pending_candidates.pop_front() {
            self.output.send(
                &receiver.id,
                ServerMessage::IceCandidate {
                    candidate: pending.candidate,
                    seq: pending.seq,
                },
            );
            flushed += 1;
        }
        if flushed > 0 {
            debug!("Flushed {} queued candidates to {}", flushed, receiver.id);
        }
        flushed
    }
}
