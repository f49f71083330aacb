use pairline_core::{ConnectionId, ServerMessage};

/// Implemented by the transport so the core can push frames to clients.
///
/// Called while a room is locked, so implementations must not block and must
/// keep per-connection order.
pub trait SignalingOutput: Send + Sync {
    fn send(&self, connection_id: &ConnectionId, message: ServerMessage);
}
