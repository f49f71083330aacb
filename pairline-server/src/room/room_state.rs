use crate::room::room::Room;
use dashmap::DashMap;
use pairline_core::{ConnectionId, HandshakePhase, RoomKey};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Read-only view of a room for status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    pub room: RoomKey,
    pub participants: usize,
    pub phase: HandshakePhase,
}

/// Shared handle to one room. Lock it with [`lock_room`].
pub type RoomHandle = Arc<Mutex<Room>>;

/// Locks a room, recovering the state if a previous holder panicked.
pub fn lock_room(room: &Mutex<Room>) -> MutexGuard<'_, Room> {
    room.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live rooms keyed by room key.
///
/// Every room sits behind its own mutex, which serializes joins, relays and
/// leaves for that room only. Map shards are held just long enough to clone
/// a handle, so rooms never wait on each other. The map shard is never
/// requested while a room is locked, except by [`RoomState::remove_if_empty`]
/// which takes the shard first.
#[derive(Default)]
pub struct RoomState {
    rooms: DashMap<RoomKey, RoomHandle>,
}

impl RoomState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only allocation path for rooms. The handle may be retired by the
    /// time it is locked; callers check [`Room::is_retired`] and retry.
    pub fn get_or_create(&self, key: &RoomKey) -> RoomHandle {
        let entry = self.rooms.entry(key.clone()).or_insert_with(|| {
            info!("Creating room '{}'", key);
            Arc::new(Mutex::new(Room::new()))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, key: &RoomKey) -> Option<RoomHandle> {
        self.rooms.get(key).map(|room| Arc::clone(room.value()))
    }

    /// Drops `id` from the room and deletes the room once nobody is left.
    pub fn remove_participant(&self, key: &RoomKey, id: &ConnectionId) -> bool {
        let Some(handle) = self.get(key) else {
            return false;
        };
        let removed = lock_room(&handle).remove_participant(id).is_some();
        self.remove_if_empty(key);
        removed
    }

    /// Deletes the room if it has no participants. Must not be called while
    /// holding that room's lock.
    pub fn remove_if_empty(&self, key: &RoomKey) -> bool {
        let removed = self
            .rooms
            .remove_if(key, |_, handle| {
                let mut room = lock_room(handle);
                if room.is_empty() {
                    room.retire();
                    true
                } else {
                    false
                }
            })
            .is_some();
        if removed {
            info!("Room '{}' deleted", key);
        }
        removed
    }

    pub fn snapshot(&self, key: &RoomKey) -> Option<RoomSnapshot> {
        let handle = self.get(key)?;
        let room = lock_room(&handle);
        Some(RoomSnapshot {
            room: key.clone(),
            participants: room.len(),
            phase: room.phase,
        })
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
