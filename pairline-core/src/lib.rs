pub mod model;

pub use model::{
    ClientMessage, ConnectionId, HandshakePhase, NegotiationState, RejectReason, RoomKey,
    ServerMessage, Slot,
};
