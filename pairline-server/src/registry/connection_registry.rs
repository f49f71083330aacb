use crate::error::SignalingError;
use dashmap::DashMap;
use pairline_core::{ConnectionId, RoomKey};
use std::time::Instant;
use tracing::debug;

/// Room membership of a connection, set by a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room: RoomKey,
    pub display_name: String,
}

/// One live transport channel.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub binding: Option<Binding>,
    pub connected_at: Instant,
}

/// Owns every live connection and the room it joined.
///
/// Entry guards are never held while a room is locked from here. The only
/// nesting allowed is room -> connection.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.insert(
            id,
            Connection {
                id,
                binding: None,
                connected_at: Instant::now(),
            },
        );
        debug!("Registered connection {}", id);
        id
    }

    /// Records that `id` joined `room` under `display_name`.
    pub fn join(
        &self,
        id: &ConnectionId,
        room: &RoomKey,
        display_name: &str,
    ) -> Result<(), SignalingError> {
        let mut conn = self
            .connections
            .get_mut(id)
            .ok_or(SignalingError::UnknownConnection)?;
        if conn.binding.is_some() {
            return Err(SignalingError::AlreadyJoined);
        }
        conn.binding = Some(Binding {
            room: room.clone(),
            display_name: display_name.to_string(),
        });
        Ok(())
    }

    pub fn binding(&self, id: &ConnectionId) -> Result<Option<Binding>, SignalingError> {
        self.connections
            .get(id)
            .map(|conn| conn.binding.clone())
            .ok_or(SignalingError::UnknownConnection)
    }

    /// Clears the room membership but keeps the connection registered.
    pub fn unbind(&self, id: &ConnectionId) -> Option<Binding> {
        self.connections.get_mut(id)?.binding.take()
    }

    /// Removes the connection. A second call for the same id is a no-op.
    pub fn unregister(&self, id: &ConnectionId) -> Option<Connection> {
        let (_, conn) = self.connections.remove(id)?;
        debug!(
            "Unregistered connection {} after {:?}",
            id,
            conn.connected_at.elapsed()
        );
        Some(conn)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
