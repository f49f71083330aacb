use crate::model::connection::ConnectionId;
use crate::model::room::{RoomKey, Slot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames a browser client sends to the broker.
///
/// Session descriptions and candidates are carried as opaque JSON and are
/// never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRoom {
        room: RoomKey,
        name: String,
    },
    ReturnName {
        room: RoomKey,
        name: String,
    },
    Offer {
        room: RoomKey,
        sdp: Value,
    },
    Answer {
        room: RoomKey,
        sdp: Value,
    },
    IceCandidate {
        room: RoomKey,
        candidate: Value,
    },
    RemoteDescriptionApplied {
        room: RoomKey,
    },
    LeaveRoom {
        room: RoomKey,
    },
}

impl ClientMessage {
    /// The room every client frame names.
    pub fn room_mut(&mut self) -> &mut RoomKey {
        match self {
            Self::JoinRoom { room, .. }
            | Self::ReturnName { room, .. }
            | Self::Offer { room, .. }
            | Self::Answer { room, .. }
            | Self::IceCandidate { room, .. }
            | Self::RemoteDescriptionApplied { room }
            | Self::LeaveRoom { room } => room,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    AlreadyJoined,
    RoomFull,
    Malformed,
}

/// Frames the broker sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ServerMessage {
    Welcome {
        connection_id: ConnectionId,
    },
    Joined {
        room: RoomKey,
        slot: Slot,
    },
    JoinRejected {
        room: RoomKey,
        reason: RejectReason,
    },
    PeerJoined {
        name: String,
    },
    PeerName {
        name: String,
    },
    Offer {
        sdp: Value,
    },
    Answer {
        sdp: Value,
    },
    IceCandidate {
        candidate: Value,
        seq: u64,
    },
    PeerLeft {
        name: String,
    },
}
