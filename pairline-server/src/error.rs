use pairline_core::RejectReason;
use thiserror::Error;

/// Failures of the signaling core. None of them is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalingError {
    #[error("connection already joined a room")]
    AlreadyJoined,

    #[error("room already holds two participants")]
    RoomFull,

    /// The room was torn down, possibly a moment ago. Treated as a no-op.
    #[error("unknown room")]
    UnknownRoom,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unknown connection")]
    UnknownConnection,

    #[error("sender is not a participant of the room")]
    NotInRoom,

    #[error("room has no other participant yet")]
    NoPeer,

    #[error("display name was already returned for this session")]
    NameAlreadyReturned,

    #[error("only the initiator returns its name")]
    NotInitiator,
}

impl SignalingError {
    /// Reason reported to a client whose join was refused.
    pub fn reject_reason(&self) -> RejectReason {
        match self {
            Self::AlreadyJoined => RejectReason::AlreadyJoined,
            Self::RoomFull => RejectReason::RoomFull,
            _ => RejectReason::Malformed,
        }
    }

    /// Errors that can legitimately race with a teardown and are not worth a warning.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::UnknownRoom | Self::NoPeer)
    }
}

impl From<serde_json::Error> for SignalingError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedPayload(e.to_string())
    }
}
