use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of keys produced by [`RoomKey::generate`].
pub const GENERATED_KEY_LEN: usize = 10;

/// Caller-supplied token that pairs two participants.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomKey(pub String);

impl RoomKey {
    /// Fresh key for the "create meeting" flow. Joins never call this.
    pub fn generate() -> Self {
        let mut key = Uuid::new_v4().simple().to_string();
        key.truncate(GENERATED_KEY_LEN);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key without surrounding whitespace, as rooms are stored.
    pub fn trimmed(&self) -> Self {
        Self::from(self.0.trim())
    }
}

impl From<&str> for RoomKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a participant inside a room.
///
/// The first participant is the `Initiator`: it is told when a peer arrives,
/// returns its name and sends the session offer. The newcomer is the
/// `Responder` and answers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    Initiator,
    Responder,
}

/// Per-participant progress through offer/answer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NegotiationState {
    #[default]
    Pending,
    OfferSent,
    AnswerSent,
    Connected,
}

/// Room-level handshake state. `Empty` is what a room holds before its first
/// join, or after a teardown left it without participants.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HandshakePhase {
    #[default]
    Empty,
    Waiting,
    Negotiating,
    Established,
    Closing,
}
