mod connection;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use room::{HandshakePhase, NegotiationState, RoomKey, Slot};
pub use signaling::{ClientMessage, RejectReason, ServerMessage};
