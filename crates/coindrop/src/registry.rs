//! Room membership registry for the gateway.
//!
//! Tracks which connections are in which room's broadcast group. This
//! is transport-level bookkeeping only; coin state never lives here.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use coindrop_protocol::{RoomId, ServerEvent};
use tokio::sync::mpsc;

/// Counter for generating unique connection IDs.
static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for one WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

impl ConnId {
    /// Allocates the next connection ID.
    pub fn next() -> Self {
        Self(NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Channel sender delivering outbound events to one connection's
/// writer task.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Maps each room to the connections currently in its broadcast group.
///
/// A connection may be in any number of rooms. The mutex is held only
/// for map operations, never across an await; actual sends go through
/// unbounded channels and cannot block.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, HashMap<ConnId, EventSender>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room's broadcast group. Idempotent;
    /// re-joining replaces the stored sender.
    pub fn join(&self, room_id: &RoomId, conn_id: ConnId, sender: EventSender) {
        let mut rooms = self.rooms.lock().expect("registry mutex poisoned");
        rooms
            .entry(room_id.clone())
            .or_default()
            .insert(conn_id, sender);
    }

    /// Removes a connection from every room it joined. Called when the
    /// connection closes.
    pub fn leave_all(&self, conn_id: ConnId) {
        let mut rooms = self.rooms.lock().expect("registry mutex poisoned");
        rooms.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
    }

    /// Sends an event to every member of a room except `sender`.
    ///
    /// Members whose channel is gone (disconnecting) are dropped from
    /// the group. Returns the number of members the event reached.
    pub fn broadcast_except(
        &self,
        room_id: &RoomId,
        sender: ConnId,
        event: &ServerEvent,
    ) -> usize {
        let mut rooms = self.rooms.lock().expect("registry mutex poisoned");
        let Some(members) = rooms.get_mut(room_id) else {
            return 0;
        };

        let mut reached = 0;
        members.retain(|conn_id, tx| {
            if *conn_id == sender {
                return true;
            }
            match tx.send(event.clone()) {
                Ok(()) => {
                    reached += 1;
                    true
                }
                Err(_) => false,
            }
        });
        reached
    }

    /// Number of connections currently in the room's group.
    pub fn member_count(&self, room_id: &RoomId) -> usize {
        let rooms = self.rooms.lock().expect("registry mutex poisoned");
        rooms.get(room_id).map(|m| m.len()).unwrap_or(0)
    }
}
